//! End-to-end tests for the `salesdash` binary. Fixture workbooks are written
//! into a temp dir with rust_xlsxwriter; HOME points at the same dir so the
//! user's real settings file is never read.

#![allow(deprecated)] // Command::cargo_bin

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

enum Fx {
    S(&'static str),
    N(f64),
}
use Fx::*;

fn write_workbook(dir: &Path, name: &str, sheet: &str, rows: &[Vec<Fx>]) -> PathBuf {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name(sheet).unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell {
                S(s) => {
                    ws.write_string(r as u32, c as u16, *s).unwrap();
                }
                N(n) => {
                    ws.write_number(r as u32, c as u16, *n).unwrap();
                }
            }
        }
    }
    let path = dir.join(name);
    workbook.save(&path).unwrap();
    path
}

/// BranchA/ClientX 100 on 2025-01-15, BranchB/ClientY 200 on 2025-02-03.
fn two_branch_workbook(dir: &Path) -> PathBuf {
    write_workbook(
        dir,
        "sales.xlsx",
        "DATA_BK",
        &[
            vec![S("DT"), S("USDAmt"), S("BranchName"), S("CustomerName"), S("TBM")],
            vec![N(45672.0), N(100.0), S("BranchA"), S("ClientX"), S("Tom")],
            vec![N(45691.0), N(200.0), S("BranchB"), S("ClientY"), S("Ann")],
        ],
    )
}

fn salesdash(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("salesdash").unwrap();
    cmd.env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("SALESDASH_LOG");
    cmd
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    salesdash(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("inspect"));
}

// ═══════════════════════════════════════════════════════════════════════════
// REPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_report_full_selection() {
    let dir = TempDir::new().unwrap();
    let file = two_branch_workbook(dir.path());
    salesdash(&dir)
        .arg("report")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Data Overview for 2025"))
        .stdout(predicate::str::contains("$300.00"))
        .stdout(predicate::str::contains("$150.00"))
        .stdout(predicate::str::contains(
            "BranchB is the top performer with $200.00 in sales.",
        ));
}

#[test]
fn test_report_single_branch() {
    let dir = TempDir::new().unwrap();
    let file = two_branch_workbook(dir.path());
    salesdash(&dir)
        .arg("report")
        .arg(&file)
        .args(["--branch", "BranchA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard view: 1 rows, $100.00"))
        .stdout(predicate::str::contains(
            "BranchA is the top performer with $100.00 in sales.",
        ))
        .stdout(predicate::str::contains("ClientY").not());
}

#[test]
fn test_report_month_filter() {
    let dir = TempDir::new().unwrap();
    let file = two_branch_workbook(dir.path());
    salesdash(&dir)
        .arg("report")
        .arg(&file)
        .args(["--month", "February"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard view: 1 rows, $200.00"));
}

#[test]
fn test_report_none_shows_empty_state() {
    let dir = TempDir::new().unwrap();
    let file = two_branch_workbook(dir.path());
    salesdash(&dir)
        .arg("report")
        .arg(&file)
        .args(["--none", "branch"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No data available for the selected filters or quick view.",
        ))
        .stdout(predicate::str::contains("Leading Branch").not());
}

#[test]
fn test_report_quick_client_summary() {
    let dir = TempDir::new().unwrap();
    let file = two_branch_workbook(dir.path());
    salesdash(&dir)
        .arg("report")
        .arg(&file)
        .args(["--quick-client", "ClientX"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Client Summary: ClientX"))
        .stdout(predicate::str::contains("Dashboard view: 2 rows, $300.00"));
}

#[test]
fn test_report_unknown_month_fails() {
    let dir = TempDir::new().unwrap();
    let file = two_branch_workbook(dir.path());
    salesdash(&dir)
        .arg("report")
        .arg(&file)
        .args(["--month", "Smarch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown month: Smarch"));
}

// ═══════════════════════════════════════════════════════════════════════════
// DECODE AND DERIVE FAILURES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_sheet() {
    let dir = TempDir::new().unwrap();
    let file = write_workbook(
        dir.path(),
        "wrong.xlsx",
        "Sheet1",
        &[vec![S("DT")], vec![N(45672.0)]],
    );
    salesdash(&dir)
        .arg("report")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Sheet 'DATA_BK' not found in workbook"));
}

#[test]
fn test_missing_dt_column() {
    let dir = TempDir::new().unwrap();
    let file = write_workbook(
        dir.path(),
        "nodt.xlsx",
        "DATA_BK",
        &[
            vec![S("USDAmt"), S("BranchName"), S("CustomerName")],
            vec![N(10.0), S("BranchA"), S("ClientX")],
        ],
    );
    salesdash(&dir)
        .arg("report")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("DT column not found in sheet"));
}

#[test]
fn test_garbage_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("garbage.xlsb");
    std::fs::write(&file, b"definitely not a workbook").unwrap();
    salesdash(&dir)
        .arg("report")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ═══════════════════════════════════════════════════════════════════════════
// INSPECT AND CONFIG
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_inspect_reports_diagnostics() {
    let dir = TempDir::new().unwrap();
    let file = write_workbook(
        dir.path(),
        "sales.xlsx",
        "DATA_BK",
        &[
            vec![S("DT"), S("USDAmt"), S("BranchName"), S("CustomerName")],
            vec![N(45672.0), N(100.0), S("BranchA"), S("ClientX")],
            vec![N(45691.0), S("n/a"), S("BranchB"), S("ClientY")],
        ],
    );
    salesdash(&dir)
        .arg("inspect")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Data rows:   2"))
        .stdout(predicate::str::contains("Kept:        1"))
        .stdout(predicate::str::contains("Dropped:     1"))
        .stdout(predicate::str::contains("TBM column:  no"))
        .stdout(predicate::str::contains("Date range:  2025-01-15 to 2025-01-15"));
}

#[test]
fn test_config_persists_settings() {
    let dir = TempDir::new().unwrap();
    salesdash(&dir)
        .args(["config", "--top-clients", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("top_clients:     3"));

    let saved = dir.path().join(".config").join("salesdash").join("settings.json");
    let json = std::fs::read_to_string(saved).unwrap();
    assert!(json.contains("\"top_clients\": 3"));

    let file = two_branch_workbook(dir.path());
    salesdash(&dir)
        .arg("report")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Top 3 Clients"));
}
