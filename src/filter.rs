use std::collections::BTreeSet;

use crate::models::{Month, Transaction, TransactionTable};

/// Label shown for an unset quick client selector.
pub const ALL_CLIENTS: &str = "All Clients";
/// Label shown for an unset quick TBM selector.
pub const ALL_TBMS: &str = "All TBMs";

/// A read-only subset of the transaction table.
pub type View<'a> = Vec<&'a Transaction>;

/// State of one multi-select filter and its "select all" toggle.
///
/// `All` stands for the full option set, so it matches any row with a value
/// for the dimension; blank values are never options and never match. `Only`
/// matches rows whose value is present and picked; an empty set matches
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T: Ord> {
    All,
    Only(BTreeSet<T>),
}

impl<T: Ord + Clone> Selection<T> {
    /// Initial selection for a toggle state: everything, or nothing.
    pub fn from_toggle(all: bool) -> Self {
        if all {
            Selection::All
        } else {
            Selection::Only(BTreeSet::new())
        }
    }

    pub fn only<I: IntoIterator<Item = T>>(items: I) -> Self {
        Selection::Only(items.into_iter().collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Flip the "select all" toggle. Turning it off leaves nothing selected.
    pub fn toggle_all(&mut self) {
        *self = Selection::from_toggle(!self.is_all());
    }

    /// Pick or unpick one option. Unpicking from `All` keeps every other option.
    pub fn toggle_item(&mut self, item: &T, options: &[T]) {
        match self {
            Selection::All => {
                let rest = options.iter().filter(|o| *o != item).cloned();
                *self = Selection::only(rest);
            }
            Selection::Only(set) => {
                if !set.remove(item) {
                    set.insert(item.clone());
                }
            }
        }
    }

    /// Whether `item` shows as picked in the option list.
    pub fn is_picked(&self, item: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(set) => set.contains(item),
        }
    }

    /// Row predicate for this dimension.
    pub fn matches(&self, value: Option<&T>) -> bool {
        match self {
            Selection::All => value.is_some(),
            Selection::Only(set) => value.is_some_and(|v| set.contains(v)),
        }
    }

    /// Number of picked options out of `options`.
    pub fn picked_count(&self, options: &[T]) -> usize {
        options.iter().filter(|o| self.is_picked(o)).count()
    }
}

/// Every widget value that shapes the two filtered views.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub branches: Selection<String>,
    pub months: Selection<Month>,
    pub clients: Selection<String>,
    pub tbms: Selection<String>,
    /// `None` means "All Clients".
    pub quick_client: Option<String>,
    /// `None` means "All TBMs".
    pub quick_tbm: Option<String>,
}

impl Controls {
    pub fn new(select_all: bool) -> Self {
        Self {
            branches: Selection::from_toggle(select_all),
            months: Selection::from_toggle(select_all),
            clients: Selection::from_toggle(select_all),
            tbms: Selection::from_toggle(select_all),
            quick_client: None,
            quick_tbm: None,
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Option lists offered by each selector for the current state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub branches: Vec<String>,
    pub months: Vec<Month>,
    /// Clients present in branch-filtered rows.
    pub clients: Vec<String>,
    /// TBMs present in branch-filtered rows; empty when the sheet has no TBM.
    pub tbms: Vec<String>,
    pub quick_clients: Vec<String>,
    pub quick_tbms: Vec<String>,
}

fn distinct<'a, I, F>(rows: I, field: F) -> Vec<String>
where
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(&'a Transaction) -> Option<&'a String>,
{
    rows.into_iter()
        .filter_map(field)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn options(table: &TransactionTable, controls: &Controls) -> FilterOptions {
    let by_branch = branch_filtered(table, &controls.branches);
    let (tbms, quick_tbms) = if table.has_tbm {
        (
            distinct(by_branch.iter().copied(), |r| r.tbm.as_ref()),
            distinct(&table.rows, |r| r.tbm.as_ref()),
        )
    } else {
        (Vec::new(), Vec::new())
    };
    FilterOptions {
        branches: distinct(&table.rows, |r| r.branch.as_ref()),
        months: Month::ALL.to_vec(),
        clients: distinct(by_branch.iter().copied(), |r| r.customer.as_ref()),
        tbms,
        quick_clients: distinct(&table.rows, |r| r.customer.as_ref()),
        quick_tbms,
    }
}

pub fn branch_filtered<'a>(table: &'a TransactionTable, branches: &Selection<String>) -> View<'a> {
    table
        .rows
        .iter()
        .filter(|r| branches.matches(r.branch.as_ref()))
        .collect()
}

/// Rows passing the branch, client, month, and TBM multi-selects. The TBM
/// predicate is skipped when the sheet has no TBM column.
pub fn dashboard_view<'a>(table: &'a TransactionTable, controls: &Controls) -> View<'a> {
    table
        .rows
        .iter()
        .filter(|r| {
            controls.branches.matches(r.branch.as_ref())
                && controls.clients.matches(r.customer.as_ref())
                && controls.months.matches(Some(&r.month))
                && (!table.has_tbm || controls.tbms.matches(r.tbm.as_ref()))
        })
        .collect()
}

/// Rows for the quick client/TBM overrides, still bound by the branch and
/// month selections. Ignores the dashboard client/TBM multi-selects.
pub fn quick_view<'a>(table: &'a TransactionTable, controls: &Controls) -> View<'a> {
    let quick_tbm = if table.has_tbm {
        controls.quick_tbm.as_deref()
    } else {
        None
    };
    table
        .rows
        .iter()
        .filter(|r| {
            controls
                .quick_client
                .as_deref()
                .map_or(true, |c| r.customer.as_deref() == Some(c))
        })
        .filter(|r| quick_tbm.map_or(true, |t| r.tbm.as_deref() == Some(t)))
        .filter(|r| {
            controls.branches.matches(r.branch.as_ref()) && controls.months.matches(Some(&r.month))
        })
        .collect()
}

/// Step a quick selector through `[All, options...]`, wrapping at either end.
pub fn step_quick(current: &Option<String>, options: &[String], delta: isize) -> Option<String> {
    let len = options.len() as isize + 1;
    let pos = current
        .as_ref()
        .and_then(|c| options.iter().position(|o| o == c))
        .map_or(0, |i| i as isize + 1);
    let next = (pos + delta).rem_euclid(len);
    if next == 0 {
        None
    } else {
        Some(options[(next - 1) as usize].clone())
    }
}
