//! Add and remove command implementations

use colored::Colorize;
use depman_core::{DependencyManager, ManagerKind};

use crate::error::Result;

/// Run the add command
pub fn run_add<K: ManagerKind>(
    manager: &mut DependencyManager<K>,
    specs: &[String],
    dry_run: bool,
) -> Result<()> {
    let added = manager.add(specs)?;
    tracing::debug!(requested = specs.len(), added, "Applied add");
    finish(manager, "Added", added, dry_run)
}

/// Run the remove command
pub fn run_remove<K: ManagerKind>(
    manager: &mut DependencyManager<K>,
    specs: &[String],
    dry_run: bool,
) -> Result<()> {
    let removed = manager.remove(specs)?;
    tracing::debug!(requested = specs.len(), removed, "Applied remove");
    finish(manager, "Removed", removed, dry_run)
}

// On a dry run stdout carries nothing but the would-be file contents.
fn finish<K: ManagerKind>(
    manager: &mut DependencyManager<K>,
    verb: &str,
    count: usize,
    dry_run: bool,
) -> Result<()> {
    manager.write(dry_run)?;
    if dry_run {
        return Ok(());
    }

    if count == 0 {
        println!("{}", "No changes".dimmed());
    } else if let Some(path) = manager.dependency_file() {
        let noun = if count == 1 { "requirement" } else { "requirements" };
        println!("{} {} {} in {}", verb.green().bold(), count, noun, path.display());
    }
    Ok(())
}
