use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SalesError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// How many clients the top-clients chart shows.
    #[serde(default = "default_top_clients")]
    pub top_clients: usize,
    /// Row cap for the raw data table in text reports.
    #[serde(default = "default_raw_rows")]
    pub raw_rows: usize,
    /// Initial state of every "select all" toggle.
    #[serde(default = "default_select_all")]
    pub select_all_by_default: bool,
}

fn default_top_clients() -> usize {
    10
}

fn default_raw_rows() -> usize {
    200
}

fn default_select_all() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            top_clients: default_top_clients(),
            raw_rows: default_raw_rows(),
            select_all_by_default: default_select_all(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("salesdash")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Load settings from `path`, falling back to defaults when the file is
/// missing or unreadable.
pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(path).unwrap_or_default();
    match serde_json::from_str(&content) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            Settings::default()
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SalesError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            top_clients: 5,
            raw_rows: 50,
            select_all_by_default: false,
        };
        save_settings_to(&path, &settings).unwrap();
        assert_eq!(load_settings_from(&path), settings);
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("nope.json"));
        assert_eq!(s.top_clients, 10);
        assert_eq!(s.raw_rows, 200);
        assert!(s.select_all_by_default);
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"top_clients": 3}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.top_clients, 3);
        assert_eq!(s.raw_rows, 200);
        assert!(s.select_all_by_default);
    }

    #[test]
    fn test_load_ignores_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load_settings_from(&path), Settings::default());
    }

    #[test]
    fn test_save_creates_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("settings.json");
        save_settings_to(&path, &Settings::default()).unwrap();
        assert!(path.exists());
    }
}
