//! The directory of named store instances plus the default store slot.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use larder_store::Store;
use tracing::debug;

use crate::error::{RegistryError, Result};

/// The default store slot: a reassignable path and the lazily created
/// instance bound to it.
struct DefaultSlot {
    path: PathBuf,
    store: Option<Arc<Store>>,
}

/// A directory of named, file-backed stores.
///
/// One registry is owned by the application's composition root and shared
/// from there (typically as an `Arc<Registry>`); it hands out `Arc<Store>`
/// handles while retaining ownership of the instances for teardown. Beyond
/// the named instances there is one implicit default store, addressed by a
/// reassignable path and created lazily on first access.
pub struct Registry {
    stores: RwLock<HashMap<String, Arc<Store>>>,
    default: RwLock<DefaultSlot>,
}

impl Registry {
    /// Create a registry whose default store lives at `default_path`.
    /// Nothing is touched on disk until a store is opened.
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            stores: RwLock::new(HashMap::new()),
            default: RwLock::new(DefaultSlot {
                path: default_path.into(),
                store: None,
            }),
        }
    }

    /// Construct a store for `path` and register it under `name`,
    /// optionally opening it immediately.
    ///
    /// First registration wins: when `name` is already taken the existing
    /// store is returned untouched and `path` is ignored.
    pub fn create_named(
        &self,
        name: &str,
        path: impl Into<PathBuf>,
        open_on_create: bool,
    ) -> Result<Arc<Store>> {
        let mut stores = self.stores.write().expect("registry lock poisoned");
        if let Some(existing) = stores.get(name) {
            debug!(name, "store name already registered; first registration wins");
            return Ok(Arc::clone(existing));
        }

        let store = Arc::new(Store::new(path));
        if open_on_create {
            store.open()?;
        }
        debug!(name, path = %store.path().display(), "registered store");
        stores.insert(name.to_string(), Arc::clone(&store));
        Ok(store)
    }

    /// Look up a registered store by name.
    pub fn get(&self, name: &str) -> Result<Arc<Store>> {
        let stores = self.stores.read().expect("registry lock poisoned");
        stores
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let stores = self.stores.read().expect("registry lock poisoned");
        let mut names: Vec<String> = stores.keys().cloned().collect();
        names.sort();
        names
    }

    /// The default store, created and opened on first access.
    ///
    /// A default store that was closed in the meantime is re-opened here
    /// rather than handed out cold.
    pub fn default_store(&self) -> Result<Arc<Store>> {
        let mut slot = self.default.write().expect("registry lock poisoned");
        if let Some(store) = &slot.store {
            if !store.is_open() {
                store.open()?;
            }
            return Ok(Arc::clone(store));
        }

        let store = Arc::new(Store::new(slot.path.clone()));
        store.open()?;
        debug!(path = %store.path().display(), "default store created");
        slot.store = Some(Arc::clone(&store));
        Ok(store)
    }

    /// Reassign the default store path.
    ///
    /// The previous default instance, if any, is flushed, closed, and
    /// abandoned -- its contents are not merged into the new location. The
    /// store at the new path is opened lazily on the next
    /// [`default_store`](Registry::default_store) access. Relative paths
    /// are resolved against the current working directory at assignment
    /// time.
    pub fn set_default_path(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(RegistryError::EmptyPath);
        }
        let path = std::path::absolute(&path)?;

        let mut slot = self.default.write().expect("registry lock poisoned");
        if let Some(old) = slot.store.take() {
            old.close()?;
        }
        debug!(path = %path.display(), "default store path reassigned");
        slot.path = path;
        Ok(())
    }

    /// Path the default store is (or will be) bound to.
    pub fn default_path(&self) -> PathBuf {
        let slot = self.default.read().expect("registry lock poisoned");
        slot.path.clone()
    }
}
