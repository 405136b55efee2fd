//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// depman - Manage the dependencies declared in a requirements file
#[derive(Parser, Debug)]
#[command(name = "depman")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root to search for the dependency file
    #[arg(long, global = true, env = "DEPMAN_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Configuration file to use instead of <root>/.depman.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the dependency file and the requirements it declares
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Add requirements and rewrite the dependency file
    ///
    /// Specifiers that are already present or cannot be parsed are ignored.
    ///
    /// Examples:
    ///   depman add requests==2.31.0
    ///   depman add "black==23.7.*" "mypy~=1.4"
    ///   depman add my_pkg==1 --dry-run
    Add {
        /// Requirement specifiers to add
        #[arg(required = true)]
        specs: Vec<String>,

        /// Print the resulting file instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove requirements and rewrite the dependency file
    ///
    /// A specifier only matches an entry with the same name, extras,
    /// version clauses and marker.
    Remove {
        /// Requirement specifiers to remove
        #[arg(required = true)]
        specs: Vec<String>,

        /// Print the resulting file instead of writing it
        #[arg(long)]
        dry_run: bool,
    },
}
