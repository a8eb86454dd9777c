//! catconf: logging init-file loader
//!
//! A CLI tool that reads a line-oriented logging init file and builds the
//! category hierarchy it describes, for validating, inspecting and trying out
//! logging configurations.

mod cli;
mod domain;
mod service;
mod settings;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use service::{ConfigureService, ReportRenderer};
use settings::SettingsService;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load settings
    let settings = SettingsService::load(cli.settings.as_deref())?;

    // Initialize logging if debug mode
    if cli.debug || settings.debug {
        domain::logger::init(&settings)?;
    }

    let service = ConfigureService::new(settings);

    // Execute command
    match cli.command {
        Commands::Check { file } => {
            service.check(file.as_deref())?;
            if !cli.quiet {
                eprintln!("Configuration is valid.");
            }
        }
        Commands::Show { file, format } => {
            let reports = service.show(file.as_deref())?;
            print!("{}", ReportRenderer::new(format).render(&reports)?);
        }
        Commands::Emit {
            file,
            category,
            priority,
            message,
        } => {
            service.emit(file.as_deref(), &category, &priority, &message.join(" "))?;
        }
        Commands::Init { path, force } => {
            ConfigureService::generate_sample(&path, force)?;
            if !cli.quiet {
                eprintln!("Init file created at: {}", path.display());
            }
        }
        Commands::Version => {
            println!("catconf {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
