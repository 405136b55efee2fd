//! Error types for depman-core

use std::path::PathBuf;

/// Result type for depman-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a root-directory strategy.
pub type StrategyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while constructing or using a dependency manager
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The manager's root-directory strategy failed; nothing was cached.
    #[error("Cannot instantiate {manager}: {source}")]
    Instantiation {
        manager: &'static str,
        #[source]
        source: StrategyError,
    },

    /// A real write was requested but no dependency file was ever found.
    #[error("No dependency file found under {}; nothing to write to", root.display())]
    NoDependencyFile { root: PathBuf },

    #[error("Invalid configuration at {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Filesystem error: {0}")]
    Fs(#[from] depman_fs::Error),

    /// Failure writing to the dry-run output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A previous holder of the manager lock panicked.
    #[error("Manager {manager} is poisoned by an earlier panic")]
    Poisoned { manager: &'static str },
}
