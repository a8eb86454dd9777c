//! Priority levels and the priority name table.
//!
//! Lower values are more severe. A category forwards an event when the
//! event's value is less than or equal to the category's threshold.

use std::fmt;

use serde::Serialize;

/// Severity threshold or event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct Priority(pub(crate) i32);

impl Priority {
    pub const EMERG: Priority = Priority(0);
    pub const FATAL: Priority = Priority(0);
    pub const ALERT: Priority = Priority(100);
    pub const CRIT: Priority = Priority(200);
    pub const ERROR: Priority = Priority(300);
    pub const WARN: Priority = Priority(400);
    pub const NOTICE: Priority = Priority(500);
    pub const INFO: Priority = Priority(600);
    pub const DEBUG: Priority = Priority(700);
    pub const NOTSET: Priority = Priority(800);

    /// Names accepted in init files, in order of increasing value.
    const NAMES: &'static [(&'static str, Priority)] = &[
        ("EMERG", Priority::EMERG),
        ("FATAL", Priority::FATAL),
        ("ALERT", Priority::ALERT),
        ("CRIT", Priority::CRIT),
        ("ERROR", Priority::ERROR),
        ("WARN", Priority::WARN),
        ("NOTICE", Priority::NOTICE),
        ("INFO", Priority::INFO),
        ("DEBUG", Priority::DEBUG),
        ("NOTSET", Priority::NOTSET),
    ];

    /// Resolve a priority name (exact, case-sensitive) or a decimal value.
    pub fn from_name(name: &str) -> Option<Priority> {
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, p)| *p)
            .or_else(|| name.parse::<i32>().ok().map(Priority))
    }

    /// Display name. Values between named levels round to the next named
    /// level; anything beyond `NOTSET` is `NOTSET`.
    pub fn name(self) -> &'static str {
        match self.0 {
            v if v <= 0 => "FATAL",
            v => {
                let index = ((v - 1) / 100 + 1).min(8) as usize;
                ["FATAL", "ALERT", "CRIT", "ERROR", "WARN", "NOTICE", "INFO", "DEBUG", "NOTSET"]
                    [index]
            }
        }
    }

    /// Map to a syslog severity (0 = emergency .. 7 = debug).
    pub fn to_syslog_severity(self) -> i32 {
        (self.0.saturating_add(1) / 100).clamp(0, 7)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.name().to_string()
    }
}
