//! End-to-end scenarios across depman-fs and depman-core
//!
//! Each test drives a manager through discovery, load, edit and write
//! against a real temporary tree.

use depman_core::{Error, ManagerConfig, ManagerKind, Registry, StrategyError};
use depman_test_utils::{SAMPLE_REQUIREMENTS, TestTree};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

struct Project {
    root: PathBuf,
    config: ManagerConfig,
}

impl Project {
    fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: ManagerConfig::default(),
        }
    }
}

impl ManagerKind for Project {
    fn parent_dir(&self) -> Result<PathBuf, StrategyError> {
        Ok(self.root.clone())
    }

    fn config(&self) -> ManagerConfig {
        self.config.clone()
    }
}

#[test]
fn test_nested_file_full_workflow() {
    let tree = TestTree::new();
    tree.write_file("a/requirements.txt", SAMPLE_REQUIREMENTS);
    let registry = Registry::new();
    let handle = registry.construct(Project::at(tree.root())).unwrap();
    let mut manager = handle.lock().unwrap();

    assert_eq!(
        manager.dependency_file(),
        Some(tree.path("a/requirements.txt").as_path())
    );
    assert_eq!(
        manager.dependencies().unwrap().lines(),
        vec!["requests==2.31.0", "black==23.7.*", "mypy~=1.4", "pylint>1"]
    );

    assert_eq!(manager.add(["my_pkg==1"]).unwrap(), 1);
    assert_eq!(manager.dependencies().unwrap().len(), 5);
    assert_eq!(
        manager.dependencies().unwrap().last().unwrap().to_string(),
        "my_pkg==1"
    );

    assert_eq!(manager.add(["git+https://github.com/someproject/"]).unwrap(), 0);
    assert_eq!(manager.dependencies().unwrap().len(), 5);

    let first = manager.dependencies().unwrap().first().unwrap().to_string();
    assert_eq!(manager.remove([first.as_str()]).unwrap(), 1);
    assert_eq!(manager.dependencies().unwrap().len(), 4);
    assert!(
        manager
            .dependencies()
            .unwrap()
            .iter()
            .all(|req| req.canonical_name() != "requests")
    );

    let mut out = Vec::new();
    manager.write_to(true, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "black==23.7.*\nmypy~=1.4\npylint>1\nmy_pkg==1\n"
    );
    assert_eq!(tree.read_file("a/requirements.txt"), SAMPLE_REQUIREMENTS);
    assert!(manager.dependencies_changed());
    assert!(manager.dependency_file_changed());

    manager.write(false).unwrap();
    assert_eq!(
        tree.read_file("a/requirements.txt"),
        "black==23.7.*\nmypy~=1.4\npylint>1\nmy_pkg==1"
    );
    assert!(!manager.dependencies_changed());
}

#[test]
fn test_without_dependency_file() {
    let tree = TestTree::new();
    tree.write_file("src/main.py", "print('hi')\n");
    let registry = Registry::new();
    let handle = registry.construct(Project::at(tree.root())).unwrap();
    let mut manager = handle.lock().unwrap();

    assert!(manager.dependency_file().is_none());
    assert!(manager.dependencies().unwrap().is_empty());

    let mut out = Vec::new();
    manager.write_to(true, &mut out).unwrap();
    manager.write(false).unwrap();
    assert!(out.is_empty());
    assert!(!manager.dependency_file_changed());
    tree.assert_file_missing("requirements.txt");

    manager.add(["attrs"]).unwrap();
    let err = manager.write(false).unwrap_err();
    assert!(matches!(err, Error::NoDependencyFile { .. }));
    assert!(manager.dependencies_changed());
    tree.assert_file_missing("requirements.txt");
}

#[test]
fn test_unchanged_write_does_not_touch_file() {
    let tree = TestTree::new();
    tree.write_file("requirements.txt", "Requests == 2.31.0\n# pinned\n");
    let registry = Registry::new();
    let handle = registry.construct(Project::at(tree.root())).unwrap();
    let mut manager = handle.lock().unwrap();

    assert_eq!(manager.dependencies().unwrap().len(), 1);
    manager.write(false).unwrap();

    assert!(!manager.dependencies_changed());
    assert!(!manager.dependency_file_changed());
    assert_eq!(tree.read_file("requirements.txt"), "Requests == 2.31.0\n# pinned\n");
}

#[test]
fn test_state_is_memoized_after_first_access() {
    let tree = TestTree::with_sample();
    let registry = Registry::new();
    let handle = registry.construct(Project::at(tree.root())).unwrap();

    {
        let manager = handle.lock().unwrap();
        assert_eq!(manager.dependencies().unwrap().len(), 4);
    }

    tree.write_file("requirements.txt", "attrs\n");
    tree.write_file("sub/other/requirements.txt", "six\n");

    let again = registry.construct(Project::at("/ignored")).unwrap();
    let manager = again.lock().unwrap();
    assert_eq!(manager.dependencies().unwrap().len(), 4);
    assert_eq!(
        manager.dependency_file(),
        Some(tree.path("requirements.txt").as_path())
    );
}

#[test]
fn test_custom_file_name_and_skip_dirs() {
    let tree = TestTree::new();
    tree.write_file(".venv/lib/requirements-dev.txt", "virtualenv\n");
    tree.write_file("tools/requirements-dev.txt", "pytest>=7\n");
    tree.write_file("requirements.txt", "attrs\n");

    let registry = Registry::new();
    let kind = Project {
        root: tree.root().to_path_buf(),
        config: ManagerConfig {
            file_name: "requirements-dev.txt".into(),
            skip_dirs: vec![".venv".into()],
            ..ManagerConfig::default()
        },
    };
    let handle = registry.construct(kind).unwrap();
    let mut manager = handle.lock().unwrap();

    assert_eq!(
        manager.dependency_file(),
        Some(tree.path("tools/requirements-dev.txt").as_path())
    );
    manager.add(["pytest-cov"]).unwrap();
    manager.write(false).unwrap();

    assert_eq!(tree.read_file("tools/requirements-dev.txt"), "pytest>=7\npytest-cov");
    assert_eq!(tree.read_file("requirements.txt"), "attrs\n");
    assert_eq!(tree.read_file(".venv/lib/requirements-dev.txt"), "virtualenv\n");
}

#[test]
fn test_written_file_reloads_identically() {
    let tree = TestTree::with_sample();
    let registry = Registry::new();

    let handle = registry.construct(Project::at(tree.root())).unwrap();
    let before = {
        let mut manager = handle.lock().unwrap();
        manager
            .add(["requests[security,socks]>=2.8.1,==2.8.*; python_version < \"2.7\""])
            .unwrap();
        manager.write(false).unwrap();
        manager.dependencies().unwrap().clone()
    };

    registry.clear_instance::<Project>();
    let fresh = registry.construct(Project::at(tree.root())).unwrap();
    assert!(!fresh.same_instance(&handle));
    let manager = fresh.lock().unwrap();
    assert_eq!(manager.dependencies().unwrap(), &before);
    assert_eq!(manager.dependencies().unwrap().len(), 5);
}

#[test]
fn test_default_config_searches_hidden_directories() {
    let tree = TestTree::new();
    tree.write_file(".venv/lib/requirements.txt", "virtualenv\n");
    let registry = Registry::new();
    let handle = registry.construct(Project::at(tree.root())).unwrap();
    let mut manager = handle.lock().unwrap();

    assert_eq!(
        manager.dependency_file(),
        Some(tree.path(".venv/lib/requirements.txt").as_path())
    );
    assert_eq!(manager.dependencies().unwrap().lines(), vec!["virtualenv"]);
}
