//! Dependency file manager
//!
//! A [`DependencyManager`] owns the dependencies of one project. It is
//! created through the [`Registry`](crate::Registry), which keeps a single
//! instance per [`ManagerKind`]. The dependency file and its contents are
//! located and parsed on first use and then kept for the lifetime of the
//! instance; later changes on disk are not picked up.
//!
//! Mutations only touch memory. [`DependencyManager::write`] flushes them,
//! and does nothing at all unless something changed.

use crate::config::ManagerConfig;
use crate::dependencies::Dependencies;
use crate::error::{Error, Result, StrategyError};
use crate::registry::{ManagerHandle, Registry};
use crate::requirement::Requirement;
use depman_fs::{find_file, io};
use std::any::type_name;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// A concrete kind of dependency manager.
///
/// Implementors decide where the search for the dependency file starts.
/// Each implementing type gets exactly one live manager per registry.
///
/// The root-directory strategy is mandatory:
///
/// ```compile_fail
/// use depman_core::ManagerKind;
///
/// struct Unfinished;
///
/// impl ManagerKind for Unfinished {}
/// ```
pub trait ManagerKind: Send + 'static {
    /// Directory to start looking for the dependency file in.
    ///
    /// Called once, when the manager is first constructed. An error aborts
    /// construction with [`Error::Instantiation`].
    ///
    /// Construction of this kind is serialized while the strategy runs, so
    /// it may construct managers of other kinds but must not construct its
    /// own kind; that call would wait on itself forever.
    fn parent_dir(&self) -> std::result::Result<PathBuf, StrategyError>;

    /// Discovery settings for this kind.
    fn config(&self) -> ManagerConfig {
        ManagerConfig::default()
    }

    /// The shared manager for this kind from the process-wide registry.
    ///
    /// `self` is only used when no instance exists yet.
    fn instance(self) -> Result<ManagerHandle<Self>>
    where
        Self: Sized,
    {
        Registry::global().construct(self)
    }

    /// Drop the process-wide instance for this kind, if any.
    fn clear_instance() -> bool
    where
        Self: Sized,
    {
        Registry::global().clear_instance::<Self>()
    }
}

/// Tracks one project's dependency file and the requirements it declares.
#[derive(Debug)]
pub struct DependencyManager<K: ManagerKind> {
    kind: K,
    config: ManagerConfig,
    parent_directory: PathBuf,
    dependency_file: OnceLock<Option<PathBuf>>,
    dependencies: OnceLock<Dependencies>,
    dependencies_changed: bool,
    dependency_file_changed: bool,
}

impl<K: ManagerKind> DependencyManager<K> {
    /// One-time setup: resolve the root directory, defer everything else.
    pub(crate) fn initialize(kind: K) -> Result<Self> {
        let parent_directory = kind.parent_dir().map_err(|source| Error::Instantiation {
            manager: type_name::<K>(),
            source,
        })?;
        let config = kind.config();

        tracing::debug!(
            manager = type_name::<K>(),
            root = %parent_directory.display(),
            file_name = %config.file_name,
            "Initialized dependency manager"
        );

        Ok(Self {
            kind,
            config,
            parent_directory,
            dependency_file: OnceLock::new(),
            dependencies: OnceLock::new(),
            dependencies_changed: false,
            dependency_file_changed: false,
        })
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Root of the dependency file search.
    pub fn parent_directory(&self) -> &Path {
        &self.parent_directory
    }

    /// Location of the dependency file, discovered on first call.
    ///
    /// `None` when the tree holds no dependency file; that answer is kept
    /// even if one appears later.
    pub fn dependency_file(&self) -> Option<&Path> {
        self.dependency_file
            .get_or_init(|| {
                find_file(
                    &self.parent_directory,
                    &self.config.file_name,
                    &self.config.discovery_options(),
                )
            })
            .as_deref()
    }

    /// Declared dependencies, parsed on first call.
    ///
    /// Empty when there is no dependency file. A read failure is returned
    /// and retried on the next call.
    pub fn dependencies(&self) -> Result<&Dependencies> {
        if let Some(deps) = self.dependencies.get() {
            return Ok(deps);
        }
        let loaded = self.load_dependencies()?;
        Ok(self.dependencies.get_or_init(|| loaded))
    }

    /// Whether in-memory dependencies differ from the file.
    pub fn dependencies_changed(&self) -> bool {
        self.dependencies_changed
    }

    /// Whether a write or dry-run emission has happened.
    pub fn dependency_file_changed(&self) -> bool {
        self.dependency_file_changed
    }

    /// Add requirements, appending those not already present.
    ///
    /// Specifiers that do not parse are ignored. Returns how many entries
    /// were appended.
    pub fn add<I>(&mut self, specifiers: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let deps = self.dependencies_mut()?;
        let mut added = 0;
        for spec in specifiers {
            let spec = spec.as_ref();
            let Some(req) = parse_or_skip(spec) else {
                continue;
            };
            if deps.insert(req) {
                tracing::debug!(specifier = spec, "Added requirement");
                added += 1;
            } else {
                tracing::trace!(specifier = spec, "Requirement already present");
            }
        }
        if added > 0 {
            self.dependencies_changed = true;
        }
        Ok(added)
    }

    /// Remove requirements that are present; others are ignored.
    ///
    /// Returns how many entries were removed.
    pub fn remove<I>(&mut self, specifiers: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let deps = self.dependencies_mut()?;
        let mut removed = 0;
        for spec in specifiers {
            let spec = spec.as_ref();
            let Some(req) = parse_or_skip(spec) else {
                continue;
            };
            if deps.remove(&req) {
                tracing::debug!(specifier = spec, "Removed requirement");
                removed += 1;
            } else {
                tracing::trace!(specifier = spec, "Requirement not present");
            }
        }
        if removed > 0 {
            self.dependencies_changed = true;
        }
        Ok(removed)
    }

    /// Contents a write would produce.
    pub fn render(&self) -> Result<String> {
        Ok(self.dependencies()?.render())
    }

    /// Flush pending changes, printing them to stdout on a dry run.
    ///
    /// See [`write_to`](Self::write_to).
    pub fn write(&mut self, dry_run: bool) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.write_to(dry_run, &mut out)
    }

    /// Flush pending changes.
    ///
    /// Does nothing when no dependency changed. Otherwise a dry run writes
    /// the would-be file contents, newline terminated, to `out` and leaves
    /// the file alone; a real run replaces the dependency file.
    ///
    /// # Errors
    ///
    /// A real run fails with [`Error::NoDependencyFile`] when no dependency
    /// file was discovered, or with [`Error::Fs`] when the file cannot be
    /// replaced. In both cases the pending changes stay pending.
    pub fn write_to<W>(&mut self, dry_run: bool, out: &mut W) -> Result<()>
    where
        W: Write + ?Sized,
    {
        if !self.dependencies_changed {
            tracing::trace!("No dependency changes to write");
            return Ok(());
        }

        let content = self.render()?;
        if dry_run {
            writeln!(out, "{content}")?;
            out.flush()?;
        } else {
            let Some(path) = self.dependency_file() else {
                return Err(Error::NoDependencyFile {
                    root: self.parent_directory.clone(),
                });
            };
            io::write_text(path, &content)?;
            tracing::info!(path = %path.display(), "Wrote dependency file");
            self.dependencies_changed = false;
        }

        self.dependency_file_changed = true;
        Ok(())
    }

    fn load_dependencies(&self) -> Result<Dependencies> {
        let Some(path) = self.dependency_file() else {
            return Ok(Dependencies::new());
        };
        let deps = Dependencies::parse(&io::read_text(path)?);
        tracing::debug!(path = %path.display(), count = deps.len(), "Loaded dependencies");
        Ok(deps)
    }

    fn dependencies_mut(&mut self) -> Result<&mut Dependencies> {
        self.dependencies()?;
        Ok(self
            .dependencies
            .get_mut()
            .expect("dependencies loaded above"))
    }
}

/// Parse a specifier, logging and discarding it if it is not a requirement.
fn parse_or_skip(spec: &str) -> Option<Requirement> {
    match spec.parse::<Requirement>() {
        Ok(req) => Some(req),
        Err(err) => {
            tracing::debug!(specifier = spec, error = %err, "Ignoring unparseable specifier");
            None
        }
    }
}
