//! File appender writing to a path opened in append mode.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use super::Appender;
use crate::domain::layouts::{BasicLayout, Layout};
use crate::domain::LoggingEvent;

#[derive(Debug)]
pub struct FileAppender {
    name: String,
    path: PathBuf,
    layout: Box<dyn Layout>,
    file: Mutex<Option<File>>,
}

impl FileAppender {
    /// Create an appender for `path`. The file is opened on first append.
    pub fn new(name: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
            layout: Box::new(BasicLayout::new()),
            file: Mutex::new(None),
        }
    }
}

impl Appender for FileAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "file"
    }

    fn target(&self) -> String {
        self.path.display().to_string()
    }

    fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    fn set_layout(&mut self, layout: Box<dyn Layout>) {
        self.layout = layout;
    }

    fn append(&self, event: &LoggingEvent) -> io::Result<()> {
        let text = self.layout.format(event);
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("file appender lock poisoned"))?;
        if guard.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            *guard = Some(file);
        }
        match guard.as_mut() {
            Some(file) => file.write_all(text.as_bytes()),
            None => Ok(()),
        }
    }
}
