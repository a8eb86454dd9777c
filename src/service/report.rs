//! Rendering of a loaded hierarchy for the `show` command.
//!
//! Supports:
//! - Text (default)
//! - JSON

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::debug;

use crate::cli::ReportFormat;
use crate::domain::appenders::AppenderInfo;
use crate::domain::{Hierarchy, Priority};

/// Snapshot of one category after loading.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Explicitly assigned priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Priority in effect after inheritance
    pub chained_priority: Priority,
    pub additivity: bool,
    pub appenders: Vec<AppenderInfo>,
}

impl CategoryReport {
    /// Snapshot every category in `hierarchy`, root first.
    pub fn collect(hierarchy: &Hierarchy) -> Vec<CategoryReport> {
        hierarchy
            .current_categories()
            .iter()
            .map(|category| CategoryReport {
                name: category.name().to_string(),
                parent: category.parent().map(|p| p.name().to_string()),
                priority: category.priority(),
                chained_priority: category.chained_priority(),
                additivity: category.additivity(),
                appenders: category.appenders(),
            })
            .collect()
    }
}

/// Renders category snapshots in the requested format.
pub struct ReportRenderer {
    format: ReportFormat,
}

impl ReportRenderer {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, reports: &[CategoryReport]) -> Result<String> {
        debug!(format = ?self.format, categories = reports.len(), "Rendering report");
        match self.format {
            ReportFormat::Text => Ok(Self::render_text(reports)),
            ReportFormat::Json => serde_json::to_string_pretty(reports)
                .map(|json| json + "\n")
                .map_err(|e| anyhow!("Failed to serialize report: {}", e)),
        }
    }

    fn render_text(reports: &[CategoryReport]) -> String {
        let mut out = String::new();
        for report in reports {
            let priority = match report.priority {
                Some(p) => p.to_string(),
                None => format!("inherited {}", report.chained_priority),
            };
            out.push_str(&format!("{} [{}]\n", report.name, priority));
            if report.appenders.is_empty() {
                out.push_str("  (no appenders)\n");
            }
            for appender in &report.appenders {
                out.push_str(&format!(
                    "  {} -> {} ({} layout",
                    appender.kind, appender.target, appender.layout
                ));
                if let Some(pattern) = &appender.pattern {
                    out.push_str(&format!(": \"{pattern}\""));
                }
                out.push_str(")\n");
            }
        }
        out
    }
}
