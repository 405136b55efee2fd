//! List command implementation

use colored::Colorize;
use depman_core::{DependencyManager, ManagerKind, Requirement};
use depman_fs::NormalizedPath;
use serde::Serialize;

use crate::error::Result;

/// JSON document printed by `list --json`.
#[derive(Debug, Serialize)]
struct Listing<'a> {
    root: NormalizedPath,
    file: Option<NormalizedPath>,
    dependencies: Vec<&'a Requirement>,
}

/// Run the list command
pub fn run_list<K: ManagerKind>(manager: &DependencyManager<K>, json: bool) -> Result<()> {
    let dependencies = manager.dependencies()?;
    let root = NormalizedPath::new(manager.parent_directory());
    let file = manager.dependency_file().map(NormalizedPath::new);

    if json {
        let listing = Listing {
            root,
            file,
            dependencies: dependencies.iter().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    match file {
        Some(path) => println!("{}: {}", "File".dimmed(), path),
        None => {
            println!(
                "{} no {} under {}",
                "Not found:".yellow().bold(),
                manager.config().file_name,
                root
            );
            return Ok(());
        }
    }

    if dependencies.is_empty() {
        println!("  {}", "No dependencies".dimmed());
    }
    for req in dependencies {
        println!("  {} {}", "+".green(), req.to_string().cyan());
    }
    Ok(())
}
