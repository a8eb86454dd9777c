//! Appenders: output sinks that receive formatted events.

mod appender_trait;
mod console;
mod file;
mod spec;
mod stream;
mod syslog;

pub use appender_trait::{Appender, AppenderInfo};
pub use console::ConsoleAppender;
pub use file::FileAppender;
pub use spec::AppenderSpec;
pub use stream::{StdStream, StreamAppender};
pub use syslog::{RemoteSyslogAppender, SyslogAppender, DEFAULT_SYSLOG_PORT, LOG_LOCAL7, LOG_USER};
