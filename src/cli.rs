//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Loader for line-oriented logging init files
#[derive(Parser)]
#[command(
    name = "catconf",
    version,
    about = "Loader for line-oriented logging init files",
    long_about = "Reads a logging init file and builds the category hierarchy it describes: \
                  appenders, layouts and priority thresholds per category."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to settings file
    #[arg(long, short = 's', global = true)]
    pub settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Output format for the `show` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// One block per category (default)
    #[default]
    Text,
    /// JSON array of categories
    Json,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Load an init file and report whether it is valid
    Check {
        /// Init file (defaults to `init_file` from settings)
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },
    /// Load an init file and print the resulting categories
    Show {
        /// Init file (defaults to `init_file` from settings)
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: ReportFormat,
    },
    /// Load an init file and log one message through a category
    Emit {
        /// Init file (defaults to `init_file` from settings)
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,

        /// Category to log through
        #[arg(long, short = 'c', default_value = "root")]
        category: String,

        /// Priority name or numeric value
        #[arg(long, short = 'p', default_value = "INFO")]
        priority: String,

        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Generate a sample init file
    Init {
        /// Path where to create the init file
        #[arg(long, short = 'p', default_value = "log.init")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Display version information
    Version,
}
