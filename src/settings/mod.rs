//! Tool settings module.
//!
//! Handles TOML settings file loading, validation, and default generation.
//! These settings configure the `catconf` tool itself, not the categories
//! described by init files.

mod service;
mod types;
mod validation;

pub use service::SettingsService;
pub use types::Settings;
