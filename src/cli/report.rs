use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::error::Result;
use crate::fmt::{money, number};
use crate::models::TransactionTable;
use crate::pipeline::{self, Render, NO_VIEW_DATA};
use crate::settings::Settings;
use crate::summary::{ClientSummary, GroupTotal, Summary};
use crate::workbook::WorkbookCache;

use super::FilterArgs;

fn amount_cell(val: f64) -> Cell {
    Cell::new(money(val)).set_alignment(CellAlignment::Right)
}

fn count_cell(val: usize) -> Cell {
    Cell::new(number(val)).set_alignment(CellAlignment::Right)
}

// ---------------------------------------------------------------------------
// Pure formatting functions (render → String)
// ---------------------------------------------------------------------------

pub fn format_kpis(summary: &Summary) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Total Sales", "Transactions", "Avg Sale Value"]);
    table.add_row(vec![
        amount_cell(summary.total),
        count_cell(summary.count),
        amount_cell(summary.average),
    ]);
    table.to_string()
}

pub fn format_monthly(summary: &Summary) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Month", "USDAmt"]);
    for m in &summary.monthly {
        table.add_row(vec![Cell::new(m.month.name()), amount_cell(m.total)]);
    }
    format!("Monthly Sales Trend\n{table}")
}

fn format_groups(title: &str, key: &str, groups: &[GroupTotal]) -> String {
    let mut table = Table::new();
    table.set_header(vec![key, "Total Sales", "Transactions"]);
    for g in groups {
        table.add_row(vec![
            Cell::new(&g.name),
            amount_cell(g.total),
            count_cell(g.count),
        ]);
    }
    format!("{title}\n{table}")
}

pub fn format_leading_branch(summary: &Summary) -> String {
    match &summary.top_branch {
        Some(top) => format!(
            "{} {} is the top performer with {} in sales.",
            "Leading Branch:".bold(),
            top.name.green().bold(),
            money(top.total).green().bold()
        ),
        None => "Leading Branch: (no branch totals)".to_string(),
    }
}

pub fn format_client_summary(cs: &ClientSummary) -> String {
    let mut months = Table::new();
    months.set_header(vec!["Month", "Total Sales", "Transactions"]);
    for m in &cs.by_month {
        months.add_row(vec![
            Cell::new(m.month.name()),
            amount_cell(m.total),
            count_cell(m.count),
        ]);
    }
    format!(
        "{}\n{months}\n\n{}",
        format!("Client Summary: {}", cs.client).bold(),
        format_groups("By Branch", "BranchName", &cs.by_branch)
    )
}

pub fn format_raw(render: &Render, has_tbm: bool, cap: usize) -> String {
    let mut header = vec!["Date", "BranchName", "CustomerName"];
    if has_tbm {
        header.push("TBM");
    }
    header.extend(["USDAmt", "DT"]);

    let mut table = Table::new();
    table.set_header(header);
    for r in render.raw.iter().take(cap) {
        let mut row = vec![
            Cell::new(r.date.format("%Y-%m-%d")),
            Cell::new(r.branch.as_deref().unwrap_or("")),
            Cell::new(r.customer.as_deref().unwrap_or("")),
        ];
        if has_tbm {
            row.push(Cell::new(r.tbm.as_deref().unwrap_or("")));
        }
        row.push(amount_cell(r.amount));
        row.push(Cell::new(r.dt));
        table.add_row(row);
    }

    let mut out = format!("Raw Data\n{table}");
    if render.raw.len() > cap {
        out.push_str(&format!(
            "\n({} of {} rows shown)",
            number(cap),
            number(render.raw.len())
        ));
    }
    out
}

/// The full text report for one render pass.
pub fn format_report(table: &TransactionTable, render: &Render, settings: &Settings) -> String {
    let mut sections = Vec::new();

    let title = match table.latest_year() {
        Some(year) => format!("Sales Dashboard: Data Overview for {year}"),
        None => "Sales Dashboard".to_string(),
    };
    sections.push(title.bold().to_string());

    sections.push(format!(
        "Dashboard view: {} rows, {}",
        number(render.dashboard.len()),
        money(render.dashboard_total())
    ));

    let Some(summary) = &render.summary else {
        sections.push(NO_VIEW_DATA.yellow().to_string());
        return sections.join("\n\n");
    };

    sections.push(format_kpis(summary));
    sections.push(format_monthly(summary));
    sections.push(format_groups("Sales by Branch", "BranchName", &summary.by_branch));
    sections.push(format_groups(
        &format!("Top {} Clients", settings.top_clients),
        "CustomerName",
        &summary.top_clients,
    ));
    sections.push(format_leading_branch(summary));
    if let Some(cs) = &render.client_summary {
        sections.push(format_client_summary(cs));
    }
    sections.push(format_raw(render, table.has_tbm, settings.raw_rows));

    sections.join("\n\n")
}

pub fn run(file: &Path, filters: &FilterArgs, settings: &Settings) -> Result<()> {
    let controls = filters.controls()?;
    let mut cache = WorkbookCache::new();
    let table = pipeline::load(&mut cache, file).inspect_err(|e| {
        tracing::warn!(error = %e, "pipeline halted");
    })?;
    let render = pipeline::run(&table, &controls, settings);
    println!("{}", format_report(&table, &render, settings));
    Ok(())
}
