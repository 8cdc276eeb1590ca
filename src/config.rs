//! Configuration management for tasklist.
//!
//! This module handles the `config.yaml` file in the data directory, which
//! stores user settings for the command-line front end.

use crate::error::Result;
use crate::paths;
use crate::tasks::{FilterMode, SortMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Task list file, relative to the data directory unless absolute.
    /// None means `tasks.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,

    /// Filter used by `list` when none is given.
    #[serde(default)]
    pub default_filter: FilterMode,

    /// Sort used by `list` when none is given.
    #[serde(default)]
    pub default_sort: SortMode,

    /// Append every mutation to `events.jsonl` in the data directory.
    #[serde(default)]
    pub debug_logging: bool,
}

impl Config {
    /// Load config from a data directory, returning None if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(data_dir: &Path) -> Result<Option<Self>> {
        let config_path = paths::config_path(data_dir);
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Load config, falling back to defaults when it is missing or broken.
    ///
    /// A broken config is reported as a warning on stderr.
    #[must_use]
    pub fn load_or_default(data_dir: &Path) -> Self {
        match Self::load_from(data_dir) {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                eprintln!("Warning: Could not load config: {e}");
                Self::default()
            }
        }
    }

    /// Save config to a data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, data_dir: &Path) -> Result<()> {
        let config_path = paths::config_path(data_dir);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Path of the task list file for this config.
    #[must_use]
    pub fn tasks_path(&self, data_dir: &Path) -> PathBuf {
        self.data_file
            .as_deref()
            .map_or_else(|| paths::tasks_path(data_dir), |file| paths::resolve(data_dir, file))
    }
}

/// Ensure config exists in a data directory, creating it with defaults if not.
///
/// Returns the config (either loaded or newly created) and whether it was created.
///
/// # Errors
///
/// Returns an error if config cannot be loaded or saved.
pub fn ensure_config(data_dir: &Path) -> Result<(Config, bool)> {
    if let Some(config) = Config::load_from(data_dir)? {
        return Ok((config, false));
    }

    let config = Config::default();
    config.save_to(data_dir)?;
    Ok((config, true))
}
