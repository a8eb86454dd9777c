//! Error types for init-file loading.

use std::fmt;

use thiserror::Error;

/// Category of a configuration failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The init file does not exist or cannot be read
    SourceUnreadable,
    /// A required token is missing
    MissingArgument,
    /// Unknown top-level command
    InvalidCommand,
    /// Unknown appender kind in an `appender` line
    InvalidAppenderKind,
    /// Unknown layout kind in an `appender` line
    InvalidLayoutKind,
    /// Priority name that does not resolve
    InvalidPriority,
    /// Conversion pattern that does not parse
    InvalidPattern,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::SourceUnreadable => "source unreadable",
            ErrorKind::MissingArgument => "missing argument",
            ErrorKind::InvalidCommand => "invalid command",
            ErrorKind::InvalidAppenderKind => "invalid appender kind",
            ErrorKind::InvalidLayoutKind => "invalid layout kind",
            ErrorKind::InvalidPriority => "invalid priority",
            ErrorKind::InvalidPattern => "invalid pattern",
        };
        f.write_str(name)
    }
}

/// Failure raised while loading an init file.
///
/// Every failure is fatal to the load. Whatever was applied to the
/// hierarchy before the failing line stays applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Configuration error ({kind}): {reason}")]
pub struct ConfigureError {
    kind: ErrorKind,
    reason: String,
}

impl ConfigureError {
    pub fn new(kind: ErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human readable reason naming the offending token and category.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub(crate) fn missing(what: &str, category: &str) -> Self {
        Self::new(
            ErrorKind::MissingArgument,
            format!("Missing {what} in logging configuration file for category: {category}"),
        )
    }
}
