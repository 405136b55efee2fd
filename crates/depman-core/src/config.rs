//! Manager configuration
//!
//! Settings are optional; every key falls back to a default. By default the
//! whole tree below the root is searched. A project can narrow that in a
//! `.depman.toml` at its root:
//!
//! ```toml
//! file_name = "requirements.txt"
//! max_depth = 8
//! follow_symlinks = false
//! skip_dirs = [".git", ".venv", "node_modules", "build"]
//! ```

use crate::error::{Error, Result};
use depman_fs::{DiscoveryOptions, io};
use serde::Deserialize;
use std::path::Path;

/// Name of the per-project configuration file.
pub const CONFIG_FILENAME: &str = ".depman.toml";

/// Default dependency file name.
pub const DEFAULT_FILE_NAME: &str = "requirements.txt";

/// How a manager discovers its dependency file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManagerConfig {
    /// Dependency file name to look for.
    pub file_name: String,
    /// Maximum depth below the root to search (unlimited by default).
    pub max_depth: usize,
    /// Whether the discovery walk descends into symlinked directories.
    pub follow_symlinks: bool,
    /// Directory names never searched (none by default).
    pub skip_dirs: Vec<String>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        let walk = DiscoveryOptions::default();
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            max_depth: walk.max_depth,
            follow_symlinks: walk.follow_symlinks,
            skip_dirs: walk.skip_dirs,
        }
    }
}

impl ManagerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = io::read_text(path)?;
        Self::from_toml(&content).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Load `<root>/.depman.toml` if it exists, otherwise use defaults.
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILENAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "Loading manager configuration");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    fn from_toml(content: &str) -> std::result::Result<Self, String> {
        let config: Self = toml::from_str(content).map_err(|e| e.to_string())?;
        if config.file_name.trim().is_empty() || config.file_name.contains(['/', '\\']) {
            return Err(format!(
                "file_name must be a bare file name, got '{}'",
                config.file_name
            ));
        }
        Ok(config)
    }

    /// Walk options derived from this configuration.
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            max_depth: self.max_depth,
            follow_symlinks: self.follow_symlinks,
            skip_dirs: self.skip_dirs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_search_everything() {
        let config = ManagerConfig::default();
        assert_eq!(config.file_name, "requirements.txt");
        assert!(!config.follow_symlinks);
        assert!(config.skip_dirs.is_empty());
        assert_eq!(config.max_depth, usize::MAX);
        assert_eq!(config.discovery_options(), DiscoveryOptions::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = ManagerConfig::from_toml("file_name = \"constraints.txt\"\n").unwrap();
        assert_eq!(config.file_name, "constraints.txt");
        assert_eq!(config.max_depth, ManagerConfig::default().max_depth);
    }

    #[test]
    fn test_rejects_unknown_keys_and_paths() {
        assert!(ManagerConfig::from_toml("filename = \"x.txt\"\n").is_err());
        assert!(ManagerConfig::from_toml("file_name = \"a/requirements.txt\"\n").is_err());
        assert!(ManagerConfig::from_toml("file_name = \"\"\n").is_err());
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            ManagerConfig::discover(temp.path()).unwrap(),
            ManagerConfig::default()
        );
    }

    #[test]
    fn test_discover_reads_project_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            "max_depth = 2\nskip_dirs = [\"build\"]\n",
        )
        .unwrap();

        let config = ManagerConfig::discover(temp.path()).unwrap();
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.skip_dirs, vec!["build".to_string()]);
        assert_eq!(config.discovery_options().skip_dirs, vec!["build".to_string()]);
    }

    #[test]
    fn test_load_reports_parse_errors_with_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "max_depth = \"deep\"\n").unwrap();

        let err = ManagerConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains(CONFIG_FILENAME));
    }
}
