use std::collections::BTreeSet;
use std::path::Path;

use crate::derive::derive_table;
use crate::error::Result;
use crate::fmt::number;
use crate::models::TransactionTable;
use crate::workbook::{RawTable, WorkbookCache, SHEET_NAME};

fn distinct<F>(table: &TransactionTable, field: F) -> usize
where
    F: Fn(&crate::models::Transaction) -> Option<&String>,
{
    table.rows.iter().filter_map(field).collect::<BTreeSet<_>>().len()
}

pub fn format_inspect(path: &Path, raw: &RawTable, table: &TransactionTable) -> String {
    let columns: Vec<&str> = raw
        .headers
        .iter()
        .map(|h| if h.is_empty() { "(blank)" } else { h.as_str() })
        .collect();

    let mut lines = vec![
        format!("File:        {}", path.display()),
        format!("Sheet:       {SHEET_NAME}"),
        format!("Columns:     {}", columns.join(", ")),
        format!("Data rows:   {}", number(raw.rows.len())),
        format!("Kept:        {}", number(table.rows.len())),
        format!("Dropped:     {}", number(table.dropped)),
        format!("TBM column:  {}", if table.has_tbm { "yes" } else { "no" }),
    ];

    match table.date_range() {
        Some((first, last)) => lines.push(format!("Date range:  {first} to {last}")),
        None => lines.push("Date range:  (none)".to_string()),
    }
    if let Some(year) = table.latest_year() {
        lines.push(format!("Latest year: {year}"));
    }

    lines.push(String::new());
    lines.push(format!("Branches:    {}", number(distinct(table, |r| r.branch.as_ref()))));
    lines.push(format!("Clients:     {}", number(distinct(table, |r| r.customer.as_ref()))));
    if table.has_tbm {
        lines.push(format!("TBMs:        {}", number(distinct(table, |r| r.tbm.as_ref()))));
    }
    lines.join("\n")
}

pub fn run(file: &Path) -> Result<()> {
    let mut cache = WorkbookCache::new();
    let raw = cache.load_path(file)?;
    let table = derive_table(&raw)?;
    println!("{}", format_inspect(file, &raw, &table));
    Ok(())
}
