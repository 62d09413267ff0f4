pub mod config;
pub mod dashboard;
pub mod inspect;
pub mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::error::Result;
use crate::filter::{Controls, Selection};
use crate::models::Month;

#[derive(Parser)]
#[command(
    name = "salesdash",
    version,
    about = "Terminal sales dashboard for DATA_BK workbooks.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Workbook to open in the dashboard when no subcommand is given
    pub file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive dashboard for a workbook.
    Dashboard {
        /// Path to the .xlsb (or .xlsx/.xls/.ods) workbook
        file: PathBuf,
    },
    /// Print KPIs and summary tables for a workbook.
    Report {
        /// Path to the workbook
        file: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show decode and cleaning diagnostics for a workbook.
    Inspect {
        /// Path to the workbook
        file: PathBuf,
    },
    /// Show or update settings.
    Config {
        /// Number of clients in the top-clients chart
        #[arg(long = "top-clients")]
        top_clients: Option<usize>,
        /// Row cap for the raw data table in reports
        #[arg(long = "raw-rows")]
        raw_rows: Option<usize>,
        /// Initial state of the select-all toggles: true or false
        #[arg(long = "select-all")]
        select_all: Option<bool>,
    },
}

/// A multi-select filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dimension {
    Branch,
    Month,
    Client,
    Tbm,
}

#[derive(Debug, Default, clap::Args)]
pub struct FilterArgs {
    /// Keep only this branch (repeatable)
    #[arg(long)]
    pub branch: Vec<String>,
    /// Keep only this month: name, abbreviation, or 1-12 (repeatable)
    #[arg(long)]
    pub month: Vec<String>,
    /// Keep only this client in the dashboard view (repeatable)
    #[arg(long)]
    pub client: Vec<String>,
    /// Keep only this TBM in the dashboard view (repeatable)
    #[arg(long)]
    pub tbm: Vec<String>,
    /// Turn off "select all" for a dimension, leaving nothing picked (repeatable)
    #[arg(long, value_enum)]
    pub none: Vec<Dimension>,
    /// Single client for the KPI panel and client summary
    #[arg(long = "quick-client")]
    pub quick_client: Option<String>,
    /// Single TBM for the KPI panel
    #[arg(long = "quick-tbm")]
    pub quick_tbm: Option<String>,
}

fn selection(picks: &[String], none: bool) -> Selection<String> {
    if none {
        Selection::from_toggle(false)
    } else if picks.is_empty() {
        Selection::All
    } else {
        Selection::only(picks.iter().cloned())
    }
}

impl FilterArgs {
    /// Widget values equivalent to these flags. An omitted dimension is
    /// "select all"; `--none` wins over explicit picks.
    pub fn controls(&self) -> Result<Controls> {
        let none = |d: Dimension| self.none.contains(&d);

        let months = if none(Dimension::Month) {
            Selection::from_toggle(false)
        } else if self.month.is_empty() {
            Selection::All
        } else {
            let parsed = self
                .month
                .iter()
                .map(|m| m.parse::<Month>())
                .collect::<Result<Vec<_>>>()?;
            Selection::only(parsed)
        };

        Ok(Controls {
            branches: selection(&self.branch, none(Dimension::Branch)),
            months,
            clients: selection(&self.client, none(Dimension::Client)),
            tbms: selection(&self.tbm, none(Dimension::Tbm)),
            quick_client: self.quick_client.clone(),
            quick_tbm: self.quick_tbm.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("salesdash").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_bare_file_opens_dashboard() {
        let cli = parse(&["sales.xlsb"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.file, Some(PathBuf::from("sales.xlsb")));
    }

    #[test]
    fn test_report_flags_build_controls() {
        let cli = parse(&[
            "report", "s.xlsb", "--branch", "North", "--branch", "South", "--month", "feb",
            "--none", "tbm", "--quick-client", "Acme",
        ]);
        let Some(Commands::Report { filters, .. }) = cli.command else {
            panic!("expected report");
        };
        let controls = filters.controls().unwrap();
        assert_eq!(
            controls.branches,
            Selection::only(["North".to_string(), "South".to_string()])
        );
        assert_eq!(controls.months, Selection::only([Month::February]));
        assert!(controls.clients.is_all());
        assert_eq!(controls.tbms, Selection::from_toggle(false));
        assert_eq!(controls.quick_client.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_no_flags_selects_everything() {
        let controls = FilterArgs::default().controls().unwrap();
        assert_eq!(controls, Controls::default());
    }

    #[test]
    fn test_bad_month_is_an_error() {
        let args = FilterArgs {
            month: vec!["Smarch".into()],
            ..FilterArgs::default()
        };
        assert!(args.controls().is_err());
    }
}
