use std::path::Path;

use crate::error::Result;
use crate::settings::{load_settings_from, save_settings_to, settings_path, Settings};

/// Apply any given overrides. Returns true when something changed.
pub fn apply(
    settings: &mut Settings,
    top_clients: Option<usize>,
    raw_rows: Option<usize>,
    select_all: Option<bool>,
) -> bool {
    let before = settings.clone();
    if let Some(n) = top_clients {
        settings.top_clients = n;
    }
    if let Some(n) = raw_rows {
        settings.raw_rows = n;
    }
    if let Some(b) = select_all {
        settings.select_all_by_default = b;
    }
    *settings != before
}

pub fn format_settings(path: &Path, settings: &Settings) -> String {
    format!(
        "Settings:        {}\ntop_clients:     {}\nraw_rows:        {}\nselect_all:      {}",
        path.display(),
        settings.top_clients,
        settings.raw_rows,
        settings.select_all_by_default
    )
}

pub fn run(top_clients: Option<usize>, raw_rows: Option<usize>, select_all: Option<bool>) -> Result<()> {
    let path = settings_path();
    let mut settings = load_settings_from(&path);
    if apply(&mut settings, top_clients, raw_rows, select_all) {
        save_settings_to(&path, &settings)?;
        tracing::info!(path = %path.display(), "settings saved");
    }
    println!("{}", format_settings(&path, &settings));
    Ok(())
}
