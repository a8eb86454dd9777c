//! Appender writing to a duplicated standard output or error descriptor.

use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;

use super::Appender;
use crate::domain::layouts::{BasicLayout, Layout};
use crate::domain::LoggingEvent;

/// Standard stream to duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Stdout,
    Stderr,
}

impl StdStream {
    fn kind(self) -> &'static str {
        match self {
            StdStream::Stdout => "stdout",
            StdStream::Stderr => "stderr",
        }
    }

    #[cfg(unix)]
    fn open(self) -> io::Result<File> {
        use std::os::fd::AsFd;

        let fd = match self {
            StdStream::Stdout => io::stdout().as_fd().try_clone_to_owned()?,
            StdStream::Stderr => io::stderr().as_fd().try_clone_to_owned()?,
        };
        Ok(File::from(fd))
    }

    #[cfg(windows)]
    fn open(self) -> io::Result<File> {
        use std::os::windows::io::AsHandle;

        let handle = match self {
            StdStream::Stdout => io::stdout().as_handle().try_clone_to_owned()?,
            StdStream::Stderr => io::stderr().as_handle().try_clone_to_owned()?,
        };
        Ok(File::from(handle))
    }
}

#[derive(Debug)]
pub struct StreamAppender {
    name: String,
    stream: StdStream,
    layout: Box<dyn Layout>,
    file: Mutex<Option<File>>,
}

impl StreamAppender {
    /// Create an appender for `stream`. The descriptor is duplicated on
    /// first append.
    pub fn new(name: &str, stream: StdStream) -> Self {
        Self {
            name: name.to_string(),
            stream,
            layout: Box::new(BasicLayout::new()),
            file: Mutex::new(None),
        }
    }
}

impl Appender for StreamAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        self.stream.kind()
    }

    fn target(&self) -> String {
        format!("<dup {}>", self.stream.kind())
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
            .map_err(|_| io::Error::other("stream appender lock poisoned"))?;
        if guard.is_none() {
            *guard = Some(self.stream.open()?);
        }
        match guard.as_mut() {
            Some(file) => {
                file.write_all(text.as_bytes())?;
                file.flush()
            }
            None => Ok(()),
        }
    }
}
