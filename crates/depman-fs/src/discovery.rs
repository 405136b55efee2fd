//! Dependency file discovery
//!
//! Walks a directory tree looking for a file with a given name. Entries are
//! visited in file-name order and the shallowest match wins, so repeated
//! walks over an unchanged tree always pick the same file.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Options controlling the discovery walk.
///
/// The default walk searches every subdirectory at any depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Maximum depth below the root to descend (the root is depth 0).
    pub max_depth: usize,

    /// Descend into symlinked directories (default: false). Symlinked files
    /// are matched either way.
    pub follow_symlinks: bool,

    /// Directory names that are never descended into.
    pub skip_dirs: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_depth: usize::MAX,
            follow_symlinks: false,
            skip_dirs: Vec::new(),
        }
    }
}

impl DiscoveryOptions {
    fn is_skipped(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .skip_dirs
                .iter()
                .any(|skip| entry.file_name() == skip.as_str())
    }
}

// Regular files, and symlinks that resolve to one.
fn is_file_like(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// Find the first file named `file_name` beneath `root`.
///
/// Returns `None` when no such file exists, or when `root` cannot be read.
/// Unreadable subdirectories are logged and skipped rather than aborting the
/// walk.
pub fn find_file(root: &Path, file_name: &str, options: &DiscoveryOptions) -> Option<PathBuf> {
    let walker = WalkDir::new(root)
        .follow_links(options.follow_symlinks)
        .max_depth(options.max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !options.is_skipped(entry));

    let mut best: Option<(usize, PathBuf)> = None;
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(root = %root.display(), error = %err, "Skipping unreadable entry");
                continue;
            }
        };

        if entry.file_name() != file_name || !is_file_like(&entry) {
            continue;
        }

        let depth = entry.depth();
        tracing::trace!(path = %entry.path().display(), depth, "Candidate dependency file");
        if best.as_ref().is_none_or(|(best_depth, _)| depth < *best_depth) {
            best = Some((depth, entry.into_path()));
        }
    }

    let found = best.map(|(_, path)| path);
    match &found {
        Some(path) => tracing::debug!(
            root = %root.display(),
            path = %path.display(),
            "Found dependency file"
        ),
        None => tracing::debug!(root = %root.display(), file_name, "No dependency file found"),
    }
    found
}
