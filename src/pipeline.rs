use std::path::{Path, PathBuf};

use crate::derive::derive_table;
use crate::error::{Result, SalesError};
use crate::filter::{self, Controls, FilterOptions, View};
use crate::models::TransactionTable;
use crate::settings::Settings;
use crate::summary::{self, ClientSummary, Summary};
use crate::workbook::WorkbookCache;

pub const NO_WORKBOOK_DATA: &str = "No data loaded from workbook.";
pub const NO_VIEW_DATA: &str = "No data available for the selected filters or quick view.";

/// Everything one render pass shows, computed from the table and the
/// current widget values.
pub struct Render<'a> {
    pub options: FilterOptions,
    pub dashboard: View<'a>,
    /// `None` when the quick view is empty.
    pub summary: Option<Summary>,
    /// Present only when a single quick client is chosen and there is data.
    pub client_summary: Option<ClientSummary>,
    /// Quick-view rows, newest first.
    pub raw: View<'a>,
}

impl Render<'_> {
    pub fn dashboard_total(&self) -> f64 {
        self.dashboard.iter().map(|r| r.amount).sum()
    }
}

pub fn run<'a>(table: &'a TransactionTable, controls: &Controls, settings: &Settings) -> Render<'a> {
    let options = filter::options(table, controls);
    let dashboard = filter::dashboard_view(table, controls);
    let quick = filter::quick_view(table, controls);
    let summary = summary::summarize(&quick, settings.top_clients);

    let client_summary = match (&summary, &controls.quick_client) {
        (Some(_), Some(client)) => Some(summary::client_summary(&quick, client)),
        _ => None,
    };
    let raw = if summary.is_some() {
        summary::newest_first(&quick)
    } else {
        Vec::new()
    };

    Render {
        options,
        dashboard,
        summary,
        client_summary,
        raw,
    }
}

/// Decode (through the cache) and derive a workbook file.
pub fn load(cache: &mut WorkbookCache, path: &Path) -> Result<TransactionTable> {
    let raw = cache.load_path(path)?;
    if raw.is_empty() {
        return Err(SalesError::Other(NO_WORKBOOK_DATA.to_string()));
    }
    derive_table(&raw)
}

/// One open workbook for the lifetime of an interactive session.
pub struct Session {
    path: PathBuf,
    cache: WorkbookCache,
    table: std::result::Result<TransactionTable, String>,
}

impl Session {
    pub fn open(path: &Path) -> Self {
        let mut cache = WorkbookCache::new();
        let table = load(&mut cache, path).map_err(|e| {
            tracing::warn!(error = %e, "pipeline halted");
            e.to_string()
        });
        Self {
            path: path.to_path_buf(),
            cache,
            table,
        }
    }

    /// Re-read the file. Returns true when the content changed (or a
    /// previous failure cleared), false when the cached table still holds.
    pub fn reload(&mut self) -> bool {
        let before = self.cache.identity().cloned();
        match load(&mut self.cache, &self.path) {
            Ok(table) => {
                let unchanged = before.is_some()
                    && self.cache.identity() == before.as_ref()
                    && self.table.is_ok();
                if !unchanged {
                    self.table = Ok(table);
                }
                !unchanged
            }
            Err(e) => {
                tracing::warn!(error = %e, "pipeline halted");
                self.table = Err(e.to_string());
                true
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The derived table, or the message that halted the pipeline.
    pub fn table(&self) -> std::result::Result<&TransactionTable, &str> {
        self.table.as_ref().map_err(String::as_str)
    }

    pub fn decode_count(&self) -> usize {
        self.cache.decode_count()
    }
}
