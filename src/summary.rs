use std::collections::BTreeMap;

use crate::filter::View;
use crate::models::{Month, Transaction};

/// Amount and transaction count for one group (branch or client).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub name: String,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthTotal {
    pub month: Month,
    pub total: f64,
    pub count: usize,
}

/// Aggregates over a non-empty view.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: f64,
    pub count: usize,
    pub average: f64,
    /// All twelve months in calendar order, zero-filled.
    pub monthly: Vec<MonthTotal>,
    /// Ascending by total.
    pub by_branch: Vec<GroupTotal>,
    /// Descending by total, at most `top_n` entries.
    pub top_clients: Vec<GroupTotal>,
    pub top_branch: Option<GroupTotal>,
}

/// Per-month and per-branch breakdown for a single client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSummary {
    pub client: String,
    /// All twelve months in calendar order, zero-filled.
    pub by_month: Vec<MonthTotal>,
    /// Descending by total.
    pub by_branch: Vec<GroupTotal>,
}

pub fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

fn month_totals(view: &View) -> [MonthTotal; 12] {
    let mut months = Month::ALL.map(|month| MonthTotal {
        month,
        total: 0.0,
        count: 0,
    });
    for r in view {
        let m = &mut months[r.month.index()];
        m.total += r.amount;
        m.count += 1;
    }
    months
}

/// Group by a string field, in name order. Rows with a blank key are skipped.
fn group_by<F>(view: &View, key: F) -> Vec<GroupTotal>
where
    F: Fn(&Transaction) -> Option<&str>,
{
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in view.iter().copied() {
        if let Some(k) = key(r) {
            let entry = groups.entry(k).or_default();
            entry.0 += r.amount;
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(name, (total, count))| GroupTotal {
            name: name.to_string(),
            total,
            count,
        })
        .collect()
}

/// First group holding the maximum total, in name order.
fn first_max(groups: &[GroupTotal]) -> Option<GroupTotal> {
    let mut best: Option<&GroupTotal> = None;
    for g in groups {
        if best.map_or(true, |b| g.total > b.total) {
            best = Some(g);
        }
    }
    best.cloned()
}

/// Compute the KPI panel for a view. Returns `None` for an empty view so
/// callers show the empty state instead of zeros.
pub fn summarize(view: &View, top_n: usize) -> Option<Summary> {
    if view.is_empty() {
        return None;
    }

    let total: f64 = view.iter().map(|r| r.amount).sum();
    let count = view.len();

    let branches = group_by(view, |r| r.branch.as_deref());
    let top_branch = first_max(&branches);

    let mut by_branch = branches;
    by_branch.sort_by(|a, b| a.total.total_cmp(&b.total));

    let mut top_clients = group_by(view, |r| r.customer.as_deref());
    top_clients.sort_by(|a, b| b.total.total_cmp(&a.total));
    top_clients.truncate(top_n);

    Some(Summary {
        total,
        count,
        average: average(total, count),
        monthly: month_totals(view).to_vec(),
        by_branch,
        top_clients,
        top_branch,
    })
}

pub fn client_summary(view: &View, client: &str) -> ClientSummary {
    let by_month = month_totals(view).to_vec();
    let mut by_branch = group_by(view, |r| r.branch.as_deref());
    by_branch.sort_by(|a, b| b.total.total_cmp(&a.total));
    ClientSummary {
        client: client.to_string(),
        by_month,
        by_branch,
    }
}

/// The view's rows, newest first.
pub fn newest_first<'a>(view: &View<'a>) -> View<'a> {
    let mut rows = view.clone();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate};

    use super::*;

    fn txn(branch: &str, customer: &str, date: (i32, u32, u32), amount: f64) -> Transaction {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        Transaction {
            branch: Some(branch.to_string()),
            customer: Some(customer.to_string()),
            tbm: None,
            dt: 0.0,
            amount,
            date,
            year: date.year(),
            month: Month::of(date),
        }
    }

    #[test]
    fn test_single_row_summary() {
        let rows = [txn("BranchA", "ClientX", (2025, 1, 15), 100.0)];
        let view: View = rows.iter().collect();
        let s = summarize(&view, 10).unwrap();
        assert_eq!(s.total, 100.0);
        assert_eq!(s.count, 1);
        assert_eq!(s.average, 100.0);
        assert_eq!(s.top_branch.unwrap().name, "BranchA");
    }

    #[test]
    fn test_empty_view_has_no_summary() {
        let view: View = Vec::new();
        assert!(summarize(&view, 10).is_none());
        assert_eq!(average(0.0, 0), 0.0);
    }

    #[test]
    fn test_monthly_totals_calendar_order() {
        let rows = [
            txn("A", "X", (2025, 12, 1), 5.0),
            txn("A", "X", (2025, 1, 1), 1.0),
            txn("A", "Y", (2025, 12, 20), 7.0),
        ];
        let view: View = rows.iter().collect();
        let s = summarize(&view, 10).unwrap();
        assert_eq!(s.monthly.len(), 12);
        assert_eq!(s.monthly[0].month, Month::January);
        assert_eq!(s.monthly[0].total, 1.0);
        assert_eq!(s.monthly[1].total, 0.0);
        assert_eq!(s.monthly[11].month, Month::December);
        assert_eq!(s.monthly[11].total, 12.0);
        assert_eq!(s.monthly[11].count, 2);
    }

    #[test]
    fn test_branch_totals_ascending() {
        let rows = [
            txn("North", "X", (2025, 1, 1), 300.0),
            txn("South", "X", (2025, 1, 1), 100.0),
            txn("East", "X", (2025, 1, 1), 200.0),
        ];
        let view: View = rows.iter().collect();
        let s = summarize(&view, 10).unwrap();
        let names: Vec<&str> = s.by_branch.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["South", "East", "North"]);
        assert_eq!(s.top_branch.unwrap().total, 300.0);
    }

    #[test]
    fn test_top_branch_tie_takes_first_by_name() {
        let rows = [
            txn("Zulu", "X", (2025, 1, 1), 50.0),
            txn("Alpha", "X", (2025, 1, 1), 50.0),
        ];
        let view: View = rows.iter().collect();
        let s = summarize(&view, 10).unwrap();
        assert_eq!(s.top_branch.unwrap().name, "Alpha");
    }

    #[test]
    fn test_top_clients_limited_and_descending() {
        let rows: Vec<Transaction> = (0..12)
            .map(|i| txn("A", &format!("C{i:02}"), (2025, 1, 1), i as f64))
            .collect();
        let view: View = rows.iter().collect();
        let s = summarize(&view, 10).unwrap();
        assert_eq!(s.top_clients.len(), 10);
        assert_eq!(s.top_clients[0].name, "C11");
        assert_eq!(s.top_clients[9].name, "C02");
    }

    #[test]
    fn test_blank_branch_excluded_from_groups() {
        let mut row = txn("A", "X", (2025, 1, 1), 10.0);
        row.branch = None;
        let rows = [row, txn("B", "X", (2025, 1, 1), 5.0)];
        let view: View = rows.iter().collect();
        let s = summarize(&view, 10).unwrap();
        assert_eq!(s.total, 15.0);
        assert_eq!(s.by_branch.len(), 1);
        assert_eq!(s.top_branch.unwrap().name, "B");
    }

    #[test]
    fn test_client_summary() {
        let rows = [
            txn("North", "Acme", (2025, 3, 1), 10.0),
            txn("South", "Acme", (2025, 1, 5), 30.0),
            txn("North", "Acme", (2025, 3, 9), 5.0),
        ];
        let view: View = rows.iter().collect();
        let cs = client_summary(&view, "Acme");
        assert_eq!(cs.by_month.len(), 12);
        assert_eq!(cs.by_month[0].month, Month::January);
        assert_eq!(cs.by_month[0].total, 30.0);
        // months without sales stay in the table as zero rows
        assert_eq!(cs.by_month[1].month, Month::February);
        assert_eq!(cs.by_month[1].total, 0.0);
        assert_eq!(cs.by_month[1].count, 0);
        assert_eq!(cs.by_month[2].total, 15.0);
        assert_eq!(cs.by_month[2].count, 2);
        assert_eq!(cs.by_month[11].month, Month::December);
        assert_eq!(cs.by_branch[0].name, "South");
        assert_eq!(cs.by_branch[1].count, 2);
    }

    #[test]
    fn test_newest_first() {
        let rows = [
            txn("A", "X", (2025, 1, 1), 1.0),
            txn("A", "X", (2025, 6, 1), 2.0),
            txn("A", "X", (2025, 3, 1), 3.0),
        ];
        let view: View = rows.iter().collect();
        let sorted = newest_first(&view);
        let amounts: Vec<f64> = sorted.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![2.0, 3.0, 1.0]);
    }
}
