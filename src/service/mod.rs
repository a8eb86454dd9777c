//! Service layer orchestrating the loader for CLI commands.

mod configure_service;
mod report;

pub use configure_service::ConfigureService;
pub use report::ReportRenderer;
