//! Settings service for loading and generating settings files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::default_log_path_for_settings_dir;
use super::Settings;

/// Settings service.
pub struct SettingsService;

impl SettingsService {
    /// Get the default settings file path.
    /// Always uses ~/.config/catconf/settings.toml for cross-platform consistency.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("catconf")
            .join("settings.toml")
    }

    /// Load settings from file.
    ///
    /// If `path` is `None`, uses the default path.
    /// If the file doesn't exist, creates a default settings file.
    /// Log path defaults to the same directory as the settings file.
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        let settings_dir = path.parent();

        if !path.exists() {
            Self::generate_at(&path)?;
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        // log_path equal to the general default means it was not set in the file
        let general_default = default_log_path_for_settings_dir(None);
        if settings.log_path == general_default {
            settings.log_path = default_log_path_for_settings_dir(settings_dir);
        }

        settings
            .validate()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;

        Ok(settings)
    }

    /// Generate default settings file at the specified path.
    pub fn generate_at(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_settings_content())
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }

    /// Default settings content with comments.
    fn default_settings_content() -> String {
        r#"# catconf settings file

# Enable debug logging to file (default: false)
debug = false

# Path to log directory (default: same directory as settings.toml/logs)
# log_path = "~/.config/catconf/logs"

# Init file used by check/show/emit when no file argument is given
# init_file = "/etc/myapp/log.init"

# Maximum length of pattern-layout text in characters (default: 999)
# Longer patterns are truncated.
max_pattern_length = 999
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_creates_default_file() {
        let dir = env::temp_dir().join(format!("catconf-settings-{}", std::process::id()));
        let path = dir.join("settings.toml");
        let _ = fs::remove_dir_all(&dir);

        let settings = SettingsService::load(Some(&path)).unwrap();
        assert!(path.exists());
        assert!(!settings.debug);
        assert_eq!(settings.max_pattern_length, 999);
        assert_eq!(settings.log_path, dir.join("logs"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_rejects_invalid_settings() {
        let dir = env::temp_dir().join(format!("catconf-settings-bad-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        fs::write(&path, "max_pattern_length = 0\n").unwrap();

        let err = SettingsService::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("max_pattern_length"));

        fs::remove_dir_all(&dir).ok();
    }
}
