//! Domain layer containing the logging model and the init-file loader.
//!
//! This module contains:
//! - Priorities, events and the category hierarchy
//! - Layouts and appenders
//! - Tokenizer and loader for init files
//! - Diagnostic logging setup for the tool itself

pub mod appenders;
mod category;
mod error;
mod event;
pub mod layouts;
pub mod loader;
pub mod logger;
mod priority;
mod tokenizer;

pub use category::{Category, Hierarchy};
pub use error::{ConfigureError, ErrorKind};
pub use event::LoggingEvent;
pub use loader::{Configurator, LoaderOptions};
pub use priority::Priority;
