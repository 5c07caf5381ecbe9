//! Per-dataset store handles.
//!
//! The [`StoreRegistry`] maps dataset names to open [`DatasetStore`] handles.
//! Each dataset lives in its own file `<root>/<name>.redb`, so locking and
//! durability are scoped to one dataset. Handles are shared through `Arc`;
//! a handle stays valid for as long as someone holds it, even after
//! [`StoreRegistry::drop_store`] removed the dataset.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use placematch_storage::backends::{RedbConfig, RedbEngine};
use placematch_vector::{
    DatasetName, Descriptor, DescriptorRecord, DescriptorStore, DescriptorWriter, RecordId, StoreStats,
};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};

/// File extension of a dataset's store file.
pub const STORE_EXTENSION: &str = "redb";

/// The store type used for datasets.
pub type DatasetStore = DescriptorStore<RedbEngine>;

/// Opens, caches and deletes dataset stores under one root directory.
pub struct StoreRegistry {
    root: PathBuf,
    redb_config: RedbConfig,
    stores: Mutex<HashMap<String, Arc<DatasetStore>>>,
}

impl StoreRegistry {
    /// Create a registry for stores under `root`.
    ///
    /// The directory is created when the first store is opened.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_redb_config(root, RedbConfig::default())
    }

    /// Create a registry with backend configuration for every store.
    #[must_use]
    pub fn with_redb_config(root: impl Into<PathBuf>, redb_config: RedbConfig) -> Self {
        Self { root: root.into(), redb_config, stores: Mutex::new(HashMap::new()) }
    }

    /// Create a registry from a [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the root doesn't exist and
    /// `create_if_missing` is off, or [`Error::StorageUnavailable`] if it
    /// can't be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        if !config.root.is_dir() {
            if !config.create_if_missing {
                return Err(Error::config(format!(
                    "store directory {} does not exist",
                    config.root.display()
                )));
            }
            std::fs::create_dir_all(&config.root)?;
            info!(root = %config.root.display(), "created store directory");
        }
        Ok(Self::with_redb_config(&config.root, config.redb_config()))
    }

    /// The directory holding the store files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file backing `name`.
    #[must_use]
    pub fn path_for(&self, name: &DatasetName) -> PathBuf {
        self.root.join(format!("{name}.{STORE_EXTENSION}"))
    }

    /// Open the store for `dataset`, creating it if absent.
    ///
    /// Repeated calls return the same handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an invalid dataset name, or
    /// [`Error::StorageUnavailable`] if the store can't be opened.
    pub fn open(&self, dataset: &str) -> Result<Arc<DatasetStore>> {
        let name = DatasetName::new(dataset)?;
        let mut stores = self.lock()?;
        if let Some(store) = stores.get(name.as_str()) {
            return Ok(Arc::clone(store));
        }

        // Opened under the map lock so one file never has two handles.
        std::fs::create_dir_all(&self.root)?;
        let store = Arc::new(DescriptorStore::open_with_config(self.path_for(&name), self.redb_config)?);
        stores.insert(name.as_str().to_owned(), Arc::clone(&store));
        debug!(dataset = %name, "registered descriptor store");
        Ok(store)
    }

    /// Return the store for `dataset` only if it already exists.
    ///
    /// Unlike [`open`](Self::open) this never creates a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an invalid dataset name, or
    /// [`Error::StorageUnavailable`] if an existing store can't be opened.
    pub fn get_existing(&self, dataset: &str) -> Result<Option<Arc<DatasetStore>>> {
        let name = DatasetName::new(dataset)?;
        {
            let stores = self.lock()?;
            if let Some(store) = stores.get(name.as_str()) {
                return Ok(Some(Arc::clone(store)));
            }
        }
        if !self.path_for(&name).is_file() {
            return Ok(None);
        }
        self.open(dataset).map(Some)
    }

    /// Append one record to `dataset`, creating the store if absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the descriptor doesn't match
    /// the store dimension, or any error of [`open`](Self::open).
    pub fn append(&self, dataset: &str, class_label: &str, descriptor: &Descriptor) -> Result<RecordId> {
        self.with_writer(dataset, |writer| Ok(writer.append(class_label, descriptor)?))
    }

    /// Run `f` holding the writer of `dataset`, creating the store if absent.
    ///
    /// If the dataset is dropped while this call waits for the writer, the
    /// wait starts over on the fresh store, so `f` never writes into a
    /// removed file.
    ///
    /// # Errors
    ///
    /// Returns any error of [`open`](Self::open), or the error of `f`.
    pub fn with_writer<T, F>(&self, dataset: &str, f: F) -> Result<T>
    where
        F: FnOnce(&DescriptorWriter<'_, RedbEngine>) -> Result<T>,
    {
        let name = DatasetName::new(dataset)?;
        loop {
            let store = self.open(dataset)?;
            let writer = store.writer()?;
            if self.is_registered(&name, &store)? {
                return f(&writer);
            }
            debug!(dataset = %name, "store dropped while waiting for its writer, reopening");
        }
    }

    /// Every record of `dataset` in insertion order.
    ///
    /// A dataset without a store has no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset name is invalid or the store can't be read.
    pub fn list_all(&self, dataset: &str) -> Result<Vec<DescriptorRecord>> {
        match self.get_existing(dataset)? {
            Some(store) => Ok(store.list_all()?),
            None => Ok(Vec::new()),
        }
    }

    /// Record and class counts of `dataset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset name is invalid or the store can't be read.
    pub fn stats(&self, dataset: &str) -> Result<StoreStats> {
        match self.get_existing(dataset)? {
            Some(store) => Ok(store.stats()?),
            None => Ok(StoreStats::default()),
        }
    }

    /// Names of every dataset with a store file, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the root can't be listed.
    pub fn datasets(&self) -> Result<Vec<DatasetName>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(STORE_EXTENSION) || !path.is_file() {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match DatasetName::new(stem) {
                Ok(name) => names.push(name),
                Err(e) => warn!(path = %path.display(), error = %e, "ignoring store file with an invalid dataset name"),
            }
        }
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(names)
    }

    /// Delete the store of `dataset`.
    ///
    /// Waits for a running writer of the dataset to finish, then removes the
    /// store file. Until then the dataset stays registered, so concurrent
    /// queries and appends keep using the one open handle. Handles already
    /// held keep reading the removed store; writers that were waiting move on
    /// to a fresh store.
    ///
    /// Returns `false` if the dataset had no store.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset name is invalid or the file can't be
    /// removed.
    pub fn drop_store(&self, dataset: &str) -> Result<bool> {
        let name = DatasetName::new(dataset)?;
        loop {
            let handle = self.lock()?.get(name.as_str()).cloned();
            let _writer = match &handle {
                Some(store) => Some(store.writer()?),
                None => None,
            };

            let mut stores = self.lock()?;
            let unchanged = match (&handle, stores.get(name.as_str())) {
                (Some(held), Some(current)) => Arc::ptr_eq(held, current),
                (None, None) => true,
                _ => false,
            };
            if !unchanged {
                continue;
            }

            // Under the map lock so no open can race the removal.
            stores.remove(name.as_str());
            let path = self.path_for(&name);
            let removed = match std::fs::remove_file(&path) {
                Ok(()) => true,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
                Err(e) => return Err(e.into()),
            };
            drop(stores);

            if removed {
                info!(dataset = %name, path = %path.display(), "dropped descriptor store");
            }
            return Ok(removed);
        }
    }

    fn is_registered(&self, name: &DatasetName, store: &Arc<DatasetStore>) -> Result<bool> {
        Ok(self.lock()?.get(name.as_str()).is_some_and(|current| Arc::ptr_eq(current, store)))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Arc<DatasetStore>>>> {
        self.stores
            .lock()
            .map_err(|_| Error::StorageUnavailable("store registry lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(values: &[f32]) -> Descriptor {
        Descriptor::new(values.to_vec()).unwrap()
    }

    #[test]
    fn test_open_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let registry = StoreRegistry::new(dir.path());

        let a = registry.open("paris").unwrap();
        let b = registry.open("paris").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(dir.path().join("paris.redb").is_file());
    }

    #[test]
    fn test_invalid_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let registry = StoreRegistry::new(dir.path());

        for bad in ["", "../escape", ".hidden", "a/b"] {
            assert!(matches!(registry.open(bad), Err(Error::InvalidArgument(_))), "{bad:?}");
        }
    }

    #[test]
    fn test_missing_dataset_is_empty_without_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let registry = StoreRegistry::new(dir.path());

        assert!(registry.get_existing("ghost").unwrap().is_none());
        assert!(registry.list_all("ghost").unwrap().is_empty());
        assert_eq!(registry.stats("ghost").unwrap(), StoreStats::default());
        assert!(!dir.path().join("ghost.redb").exists());
    }

    #[test]
    fn test_datasets_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let registry = StoreRegistry::new(dir.path());
        registry.append("zurich", "lake", &descriptor(&[1.0])).unwrap();
        registry.append("berlin", "gate", &descriptor(&[1.0])).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let names: Vec<_> = registry.datasets().unwrap().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["berlin", "zurich"]);
    }

    #[test]
    fn test_from_config_requires_root_when_not_creating() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("stores");

        let config = Config::new(&root).create_if_missing(false);
        assert!(matches!(StoreRegistry::from_config(&config), Err(Error::Config(_))));

        let config = Config::new(&root);
        StoreRegistry::from_config(&config).unwrap();
        assert!(root.is_dir());
    }
}
