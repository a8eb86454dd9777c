//! Logging event passed from categories to appenders and layouts.

use std::time::SystemTime;

use super::Priority;

/// A single log record.
#[derive(Debug, Clone)]
pub struct LoggingEvent {
    pub category: String,
    pub message: String,
    pub priority: Priority,
    pub thread_name: String,
    pub timestamp: SystemTime,
}

impl LoggingEvent {
    pub fn new(category: &str, message: &str, priority: Priority) -> Self {
        let thread = std::thread::current();
        let thread_name = thread
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:?}", thread.id()));
        Self {
            category: category.to_string(),
            message: message.to_string(),
            priority,
            thread_name,
            timestamp: SystemTime::now(),
        }
    }

    /// Seconds since the Unix epoch.
    pub fn unix_seconds(&self) -> u64 {
        self.timestamp
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
