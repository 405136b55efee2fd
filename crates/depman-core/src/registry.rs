//! Single-instance registry for dependency managers
//!
//! The registry maps each [`ManagerKind`] type to its one live
//! [`DependencyManager`]. The first `construct` for a kind runs the manager's
//! one-time setup; later calls hand back the same instance and ignore their
//! argument.
//!
//! # Example
//!
//! ```
//! use depman_core::{ManagerKind, Registry, StrategyError};
//! use std::path::PathBuf;
//!
//! struct Project;
//!
//! impl ManagerKind for Project {
//!     fn parent_dir(&self) -> Result<PathBuf, StrategyError> {
//!         Ok(std::env::temp_dir())
//!     }
//! }
//!
//! let registry = Registry::new();
//! let first = registry.construct(Project).unwrap();
//! let second = registry.construct(Project).unwrap();
//! assert!(first.same_instance(&second));
//!
//! assert!(registry.clear_instance::<Project>());
//! let fresh = registry.construct(Project).unwrap();
//! assert!(!fresh.same_instance(&first));
//! ```

use crate::error::{Error, Result};
use crate::manager::{DependencyManager, ManagerKind};
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Shared handle to the single manager of kind `K`.
pub struct ManagerHandle<K: ManagerKind> {
    inner: Arc<Mutex<DependencyManager<K>>>,
}

impl<K: ManagerKind> ManagerHandle<K> {
    /// Lock the manager for exclusive use.
    pub fn lock(&self) -> Result<MutexGuard<'_, DependencyManager<K>>> {
        self.inner.lock().map_err(|_| Error::Poisoned {
            manager: type_name::<K>(),
        })
    }

    /// Whether both handles refer to the same manager.
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<K: ManagerKind> Clone for ManagerHandle<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: ManagerKind> fmt::Debug for ManagerHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagerHandle")
            .field("kind", &type_name::<K>())
            .finish_non_exhaustive()
    }
}

/// Per-kind cell. Its mutex serializes construction of that kind only.
struct Slot<K: ManagerKind> {
    handle: Mutex<Option<ManagerHandle<K>>>,
    live: AtomicBool,
}

impl<K: ManagerKind> Slot<K> {
    fn new() -> Self {
        Self {
            handle: Mutex::new(None),
            live: AtomicBool::new(false),
        }
    }

    fn handle(&self) -> MutexGuard<'_, Option<ManagerHandle<K>>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Type-erased view of a [`Slot`].
trait Entry: Send + Sync {
    fn is_live(&self) -> bool;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<K: ManagerKind> Entry for Slot<K> {
    fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Registry of live managers, at most one per [`ManagerKind`] type.
#[derive(Default)]
pub struct Registry {
    slots: Mutex<HashMap<TypeId, Arc<dyn Entry>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    // The map is only held for lookups, never while a strategy runs.
    fn slots(&self) -> MutexGuard<'_, HashMap<TypeId, Arc<dyn Entry>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup<K: ManagerKind>(slots: &HashMap<TypeId, Arc<dyn Entry>>) -> Option<Arc<Slot<K>>> {
        slots
            .get(&TypeId::of::<K>())
            .and_then(|entry| Arc::clone(entry).into_any().downcast::<Slot<K>>().ok())
    }

    fn slot<K: ManagerKind>(&self) -> Arc<Slot<K>> {
        let mut slots = self.slots();
        if let Some(slot) = Self::lookup::<K>(&slots) {
            return slot;
        }
        let slot = Arc::new(Slot::<K>::new());
        slots.insert(TypeId::of::<K>(), Arc::clone(&slot) as Arc<dyn Entry>);
        slot
    }

    /// Get the manager for `K`, creating it from `kind` if none exists.
    ///
    /// Concurrent first calls for the same kind wait for one another, so
    /// setup runs once. Construction of other kinds is not blocked.
    ///
    /// # Errors
    ///
    /// [`Error::Instantiation`] when `kind`'s root-directory strategy fails.
    /// Nothing is cached in that case.
    pub fn construct<K: ManagerKind>(&self, kind: K) -> Result<ManagerHandle<K>> {
        let slot = self.slot::<K>();
        let mut current = slot.handle();
        if let Some(handle) = current.as_ref() {
            tracing::trace!(manager = type_name::<K>(), "Reusing existing manager");
            return Ok(handle.clone());
        }

        let manager = DependencyManager::initialize(kind)?;
        let handle = ManagerHandle {
            inner: Arc::new(Mutex::new(manager)),
        };
        *current = Some(handle.clone());
        slot.live.store(true, Ordering::Release);
        Ok(handle)
    }

    /// The existing manager for `K`, without creating one.
    pub fn get<K: ManagerKind>(&self) -> Option<ManagerHandle<K>> {
        let slot = Self::lookup::<K>(&self.slots())?;
        if !slot.is_live() {
            return None;
        }
        slot.handle().clone()
    }

    pub fn contains<K: ManagerKind>(&self) -> bool {
        self.slots()
            .get(&TypeId::of::<K>())
            .is_some_and(|entry| entry.is_live())
    }

    /// Forget the manager for `K` so the next `construct` builds a new one.
    ///
    /// Handles already given out keep working on the old instance. Returns
    /// whether an instance was removed.
    pub fn clear_instance<K: ManagerKind>(&self) -> bool {
        let removed = self
            .slots()
            .remove(&TypeId::of::<K>())
            .is_some_and(|entry| entry.is_live());
        if removed {
            tracing::debug!(manager = type_name::<K>(), "Cleared manager instance");
        }
        removed
    }

    /// Forget every manager.
    pub fn clear(&self) {
        self.slots().clear();
    }

    /// Number of constructed managers.
    pub fn len(&self) -> usize {
        self.slots().values().filter(|entry| entry.is_live()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("instances", &self.len())
            .finish()
    }
}
