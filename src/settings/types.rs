//! Settings data types.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::validation;
use crate::domain::loader::DEFAULT_MAX_PATTERN_LENGTH;
use crate::domain::LoaderOptions;

/// Main settings structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enable debug logging to file
    pub debug: bool,

    /// Path to log directory
    pub log_path: PathBuf,

    /// Init file used when a command is given no file argument
    pub init_file: Option<PathBuf>,

    /// Upper bound on pattern-layout text, in characters
    pub max_pattern_length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            log_path: default_log_path(),
            init_file: None,
            max_pattern_length: DEFAULT_MAX_PATTERN_LENGTH,
        }
    }
}

impl Settings {
    /// Validate settings and return errors if invalid.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Loader limits derived from these settings.
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            max_pattern_length: self.max_pattern_length,
        }
    }
}

/// Get default log path (relative to settings directory).
/// This returns a placeholder; the actual path is set by SettingsService based on file location.
pub fn default_log_path() -> PathBuf {
    default_log_path_for_settings_dir(None)
}

/// Get log path based on settings directory.
pub fn default_log_path_for_settings_dir(settings_dir: Option<&Path>) -> PathBuf {
    settings_dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
                .join("catconf")
        })
        .join("logs")
}
