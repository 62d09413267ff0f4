mod cli;
mod derive;
mod error;
mod filter;
mod fmt;
mod models;
mod pipeline;
mod settings;
mod summary;
mod tui;
mod workbook;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_logging() {
    let filter = EnvFilter::try_from_env("SALESDASH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let settings = settings::load_settings();

    let result = match cli.command {
        Some(Commands::Dashboard { file }) => cli::dashboard::run(&file, settings),
        Some(Commands::Report { file, filters }) => cli::report::run(&file, &filters, &settings),
        Some(Commands::Inspect { file }) => cli::inspect::run(&file),
        Some(Commands::Config {
            top_clients,
            raw_rows,
            select_all,
        }) => cli::config::run(top_clients, raw_rows, select_all),
        None => match cli.file {
            Some(file) => cli::dashboard::run(&file, settings),
            None => Cli::command().print_help().map_err(Into::into),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
