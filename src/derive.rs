use chrono::{Datelike, Days, NaiveDate};

use crate::error::{Result, SalesError};
use crate::models::{Month, Transaction, TransactionTable};
use crate::workbook::{CellValue, RawTable};

pub const COL_DT: &str = "DT";
pub const COL_AMOUNT: &str = "USDAmt";
pub const COL_BRANCH: &str = "BranchName";
pub const COL_CUSTOMER: &str = "CustomerName";
pub const COL_TBM: &str = "TBM";

/// Coerce a cell to a number. Anything that isn't a number or numeric text is
/// missing rather than an error.
pub fn coerce_numeric(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Convert a spreadsheet serial day count to a calendar date.
/// Day 0 is 1899-12-30; fractional days (time of day) are discarded.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = serial.floor();
    if days.abs() > i32::MAX as f64 {
        return None;
    }
    let days = days as i64;
    if days >= 0 {
        epoch.checked_add_days(Days::new(days as u64))
    } else {
        epoch.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

fn require(raw: &RawTable, name: &str) -> Result<usize> {
    raw.column(name)
        .ok_or_else(|| SalesError::MissingColumn(name.to_string()))
}

/// Clean the raw sheet into transactions: coerce DT and USDAmt, derive
/// Date/Year/Month, and drop rows missing a Date or an amount.
pub fn derive_table(raw: &RawTable) -> Result<TransactionTable> {
    let dt_col = require(raw, COL_DT)?;
    let amount_col = require(raw, COL_AMOUNT)?;
    let branch_col = require(raw, COL_BRANCH)?;
    let customer_col = require(raw, COL_CUSTOMER)?;
    let tbm_col = raw.column(COL_TBM);

    let mut rows = Vec::with_capacity(raw.rows.len());
    let mut dropped = 0;
    for i in 0..raw.rows.len() {
        let dt = coerce_numeric(raw.cell(i, dt_col));
        let amount = coerce_numeric(raw.cell(i, amount_col));
        let date = dt.and_then(serial_to_date);

        let (Some(dt), Some(amount), Some(date)) = (dt, amount, date) else {
            dropped += 1;
            continue;
        };

        rows.push(Transaction {
            branch: raw.cell(i, branch_col).as_label(),
            customer: raw.cell(i, customer_col).as_label(),
            tbm: tbm_col.and_then(|c| raw.cell(i, c).as_label()),
            dt,
            amount,
            date,
            year: date.year(),
            month: Month::of(date),
        });
    }

    if dropped > 0 {
        tracing::info!(dropped, kept = rows.len(), "dropped rows with missing date or amount");
    }

    Ok(TransactionTable {
        rows,
        has_tbm: tbm_col.is_some(),
        dropped,
    })
}
