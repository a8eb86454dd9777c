//! Appender trait definition.

use std::fmt;
use std::io;

use serde::Serialize;

use crate::domain::layouts::Layout;
use crate::domain::LoggingEvent;

/// Serializable summary of an attached appender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppenderInfo {
    /// Appender kind as written in init files
    pub kind: &'static str,
    /// Where output goes
    pub target: String,
    /// Layout kind
    pub layout: &'static str,
    /// Conversion pattern for pattern layouts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Trait for output sinks.
///
/// Appenders are bound to the name of the category that declared them and
/// own exactly one layout. Resources are acquired on the first `append`.
pub trait Appender: Send + Sync + fmt::Debug {
    /// Name of the declaring category.
    fn name(&self) -> &str;

    /// Appender kind as written in init files.
    fn kind(&self) -> &'static str;

    /// Human readable destination.
    fn target(&self) -> String;

    fn layout(&self) -> &dyn Layout;

    /// Replace the layout. The last one set wins.
    fn set_layout(&mut self, layout: Box<dyn Layout>);

    /// Format and write one event.
    fn append(&self, event: &LoggingEvent) -> io::Result<()>;

    fn describe(&self) -> AppenderInfo {
        AppenderInfo {
            kind: self.kind(),
            target: self.target(),
            layout: self.layout().kind(),
            pattern: self.layout().conversion_pattern().map(str::to_string),
        }
    }
}
