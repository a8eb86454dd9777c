//! Basic layout: timestamp, priority, category and message.

use super::Layout;
use crate::domain::LoggingEvent;

/// Minimal default-format layout.
#[derive(Debug, Default)]
pub struct BasicLayout;

impl BasicLayout {
    pub fn new() -> Self {
        Self
    }
}

impl Layout for BasicLayout {
    fn format(&self, event: &LoggingEvent) -> String {
        // No nested diagnostic context here, so the slot before ':' stays empty
        format!(
            "{} {} {} : {}\n",
            event.unix_seconds(),
            event.priority,
            event.category,
            event.message
        )
    }

    fn kind(&self) -> &'static str {
        "basic"
    }
}
