//! Parsed appender description, materialized once its layout is known.

use std::path::PathBuf;

use super::{
    Appender, ConsoleAppender, FileAppender, RemoteSyslogAppender, StdStream, StreamAppender,
    SyslogAppender,
};
use crate::domain::layouts::Layout;

/// Appender kind with its arguments, before any object is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppenderSpec {
    File {
        path: PathBuf,
    },
    Console,
    Stdout,
    Stderr,
    Syslog {
        identity: String,
        facility: i32,
    },
    RemoteSyslog {
        identity: String,
        relay_host: String,
        facility: i32,
        port: u16,
    },
}

impl AppenderSpec {
    /// Appender kind as written in init files.
    pub fn kind(&self) -> &'static str {
        match self {
            AppenderSpec::File { .. } => "file",
            AppenderSpec::Console => "console",
            AppenderSpec::Stdout => "stdout",
            AppenderSpec::Stderr => "stderr",
            AppenderSpec::Syslog { .. } => "syslog",
            AppenderSpec::RemoteSyslog { .. } => "remotesyslog",
        }
    }

    /// Construct the appender for category `name` with its layout attached.
    pub fn build(self, name: &str, layout: Box<dyn Layout>) -> Box<dyn Appender> {
        let mut appender: Box<dyn Appender> = match self {
            AppenderSpec::File { path } => Box::new(FileAppender::new(name, path)),
            AppenderSpec::Console => Box::new(ConsoleAppender::new(name)),
            AppenderSpec::Stdout => Box::new(StreamAppender::new(name, StdStream::Stdout)),
            AppenderSpec::Stderr => Box::new(StreamAppender::new(name, StdStream::Stderr)),
            AppenderSpec::Syslog { identity, facility } => {
                Box::new(SyslogAppender::new(name, &identity, facility))
            }
            AppenderSpec::RemoteSyslog {
                identity,
                relay_host,
                facility,
                port,
            } => Box::new(RemoteSyslogAppender::new(
                name,
                &identity,
                &relay_host,
                facility,
                port,
            )),
        };
        appender.set_layout(layout);
        appender
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layouts::{PatternLayout, SimpleLayout};

    #[test]
    fn test_build_attaches_layout() {
        let appender = AppenderSpec::File {
            path: PathBuf::from("/tmp/x.log"),
        }
        .build("app", Box::new(SimpleLayout::new()));
        assert_eq!(appender.name(), "app");
        assert_eq!(appender.kind(), "file");
        assert_eq!(appender.layout().kind(), "simple");
        assert_eq!(appender.target(), "/tmp/x.log");
    }

    #[test]
    fn test_describe_remote_syslog() {
        let spec = AppenderSpec::RemoteSyslog {
            identity: "myapp".to_string(),
            relay_host: "logs.example.net".to_string(),
            facility: 8,
            port: 514,
        };
        assert_eq!(spec.kind(), "remotesyslog");
        let info = spec
            .build("app", Box::new(PatternLayout::new("%m").unwrap()))
            .describe();
        assert_eq!(info.kind, "remotesyslog");
        assert_eq!(info.layout, "pattern");
        assert_eq!(info.pattern.as_deref(), Some("%m"));
        assert_eq!(info.target, "logs.example.net:514 (myapp, facility 8)");
    }
}
