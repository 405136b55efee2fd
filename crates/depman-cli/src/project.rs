//! The manager kind the CLI operates on

use depman_core::{ManagerConfig, ManagerKind, StrategyError};
use std::path::PathBuf;

/// Dependencies of the project rooted at a directory chosen on the command line.
#[derive(Debug)]
pub struct ProjectManager {
    root: PathBuf,
    config: ManagerConfig,
}

impl ProjectManager {
    pub fn new(root: impl Into<PathBuf>, config: ManagerConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }
}

impl ManagerKind for ProjectManager {
    fn parent_dir(&self) -> Result<PathBuf, StrategyError> {
        let root = dunce::canonicalize(&self.root)
            .map_err(|e| format!("root directory {} is not accessible: {e}", self.root.display()))?;
        if !root.is_dir() {
            return Err(format!("root {} is not a directory", root.display()).into());
        }
        Ok(root)
    }

    fn config(&self) -> ManagerConfig {
        self.config.clone()
    }
}
