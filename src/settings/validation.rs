//! Settings validation.

use anyhow::{bail, Result};

use super::Settings;

/// Longest pattern text the loader will accept.
const MAX_PATTERN_LENGTH_LIMIT: usize = 64 * 1024;

/// Validate settings.
pub fn validate(settings: &Settings) -> Result<()> {
    // Validate log path
    if settings.log_path.to_string_lossy().contains('\0') {
        bail!("Invalid log_path: contains null character");
    }

    if let Some(init_file) = &settings.init_file {
        if init_file.as_os_str().is_empty() {
            bail!("init_file cannot be empty");
        }
    }

    if settings.max_pattern_length == 0 {
        bail!("max_pattern_length must be at least 1");
    }
    if settings.max_pattern_length > MAX_PATTERN_LENGTH_LIMIT {
        bail!(
            "max_pattern_length {} exceeds limit of {}",
            settings.max_pattern_length,
            MAX_PATTERN_LENGTH_LIMIT
        );
    }

    Ok(())
}
