//! Shared test utilities for the depman workspace.
//!
//! Dev-dependency only, never published.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Contents of the sample dependency file used across test suites.
pub const SAMPLE_REQUIREMENTS: &str = "# file used to test dependency management
requests==2.31.0
black==23.7.*
mypy~=1.4
pylint>1
";

/// A temporary project directory with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use depman_test_utils::{SAMPLE_REQUIREMENTS, TestTree};
///
/// let tree = TestTree::new();
/// tree.write_file("deps/requirements.txt", SAMPLE_REQUIREMENTS);
/// tree.assert_file_contains("deps/requirements.txt", "mypy~=1.4");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a tree holding `requirements.txt` with the sample contents.
    pub fn with_sample() -> Self {
        let tree = Self::new();
        tree.write_file("requirements.txt", SAMPLE_REQUIREMENTS);
        tree
    }

    /// Root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write_file(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }

    /// Create the directory `rel` and its parents.
    pub fn create_dir(&self, rel: &str) {
        fs::create_dir_all(self.path(rel)).unwrap();
    }

    /// Read `rel` as UTF-8.
    pub fn read_file(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel))
            .unwrap_or_else(|e| panic!("Failed to read {rel}: {e}"))
    }

    /// Assert that `rel` exists.
    pub fn assert_file_exists(&self, rel: &str) {
        assert!(self.path(rel).exists(), "Expected {rel} to exist");
    }

    /// Assert that `rel` does not exist.
    pub fn assert_file_missing(&self, rel: &str) {
        assert!(!self.path(rel).exists(), "Expected {rel} not to exist");
    }

    /// Assert that `rel` contains `needle`.
    pub fn assert_file_contains(&self, rel: &str, needle: &str) {
        let content = self.read_file(rel);
        assert!(
            content.contains(needle),
            "Expected {rel} to contain '{needle}', got:\n{content}"
        );
    }
}
