//! Configuration module for docsearch
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load settings from an explicit path, the environment, or the default locations.
///
/// Falls back to defaults when no file is found. `DOCSEARCH_*` overrides are
/// applied last in every case.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match locate(explicit) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    Ok(settings)
}

fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("DOCSEARCH_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let candidates = [
        Some(PathBuf::from("settings.yml")),
        Some(PathBuf::from("config/settings.yml")),
        Some(PathBuf::from("/etc/docsearch/settings.yml")),
        dirs::config_dir().map(|p| p.join("docsearch/settings.yml")),
    ];

    candidates.into_iter().flatten().find(|path| path.exists())
}
