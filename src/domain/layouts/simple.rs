//! Simple layout: priority and message only.

use super::Layout;
use crate::domain::LoggingEvent;

/// Compact layout.
#[derive(Debug, Default)]
pub struct SimpleLayout;

impl SimpleLayout {
    pub fn new() -> Self {
        Self
    }
}

impl Layout for SimpleLayout {
    fn format(&self, event: &LoggingEvent) -> String {
        format!("{:<8}: {}\n", event.priority.name(), event.message)
    }

    fn kind(&self) -> &'static str {
        "simple"
    }
}
