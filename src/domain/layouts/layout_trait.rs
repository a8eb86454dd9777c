//! Layout trait definition.

use std::fmt;

use crate::domain::LoggingEvent;

/// Formatting strategy owned by an appender.
pub trait Layout: Send + Sync + fmt::Debug {
    /// Render the event, including any trailing newline.
    fn format(&self, event: &LoggingEvent) -> String;

    /// Layout kind as written in init files.
    fn kind(&self) -> &'static str;

    /// Conversion pattern, for layouts that have one.
    fn conversion_pattern(&self) -> Option<&str> {
        None
    }
}
