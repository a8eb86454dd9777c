//! Console appender writing to the process's standard output stream.

use std::io::{self, Write};

use super::Appender;
use crate::domain::layouts::{BasicLayout, Layout};
use crate::domain::LoggingEvent;

#[derive(Debug)]
pub struct ConsoleAppender {
    name: String,
    layout: Box<dyn Layout>,
}

impl ConsoleAppender {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            layout: Box::new(BasicLayout::new()),
        }
    }
}

impl Appender for ConsoleAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "console"
    }

    fn target(&self) -> String {
        "<stdout stream>".to_string()
    }

    fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    fn set_layout(&mut self, layout: Box<dyn Layout>) {
        self.layout = layout;
    }

    fn append(&self, event: &LoggingEvent) -> io::Result<()> {
        let text = self.layout.format(event);
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}
