//! depman CLI
//!
//! Lists and edits the dependencies declared in a project's requirements file.

mod cli;
mod commands;
mod error;
mod logging;
mod project;

use clap::Parser;
use colored::Colorize;
use depman_core::{ManagerConfig, ManagerKind};

use cli::{Cli, Commands};
use error::{CliError, Result};
use project::ProjectManager;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to set up logging: {e}", "warning".yellow());
    }
    tracing::debug!(root = %cli.root.display(), "Starting depman");

    let config = load_config(&cli)?;
    let handle = ProjectManager::new(&cli.root, config).instance()?;
    let mut manager = handle.lock()?;

    match cli.command {
        Commands::List { json } => commands::run_list(&manager, json),
        Commands::Add { specs, dry_run } => commands::run_add(&mut manager, &specs, dry_run),
        Commands::Remove { specs, dry_run } => {
            commands::run_remove(&mut manager, &specs, dry_run)
        }
    }
}

fn load_config(cli: &Cli) -> Result<ManagerConfig> {
    match &cli.config {
        Some(path) => {
            if !path.is_file() {
                return Err(CliError::user(format!(
                    "Configuration file {} does not exist",
                    path.display()
                )));
            }
            Ok(ManagerConfig::load(path)?)
        }
        None => Ok(ManagerConfig::discover(&cli.root)?),
    }
}
