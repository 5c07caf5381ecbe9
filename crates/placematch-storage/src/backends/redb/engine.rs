//! The Redb-backed [`StorageEngine`].

use std::path::{Path, PathBuf};

use redb::backends::InMemoryBackend;
use redb::{Builder, Database};
use tracing::debug;

use crate::engine::{StorageEngine, StorageError};

use super::transaction::RedbTransaction;

/// Tuning for a Redb store file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RedbConfig {
    /// Page cache size in bytes. Redb picks its own default when `None`.
    pub cache_size: Option<usize>,
}

impl RedbConfig {
    /// Redb defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self { cache_size: None }
    }

    /// Use a page cache of `bytes`.
    #[must_use]
    pub const fn cache_size(mut self, bytes: usize) -> Self {
        self.cache_size = Some(bytes);
        self
    }

    fn builder(self) -> Builder {
        let mut builder = Database::builder();
        if let Some(bytes) = self.cache_size {
            builder.set_cache_size(bytes);
        }
        builder
    }
}

/// A storage engine over one Redb database.
///
/// Writers are serialized by Redb. Every read transaction sees the snapshot
/// of the last commit that finished before it began.
pub struct RedbEngine {
    db: Database,
    path: Option<PathBuf>,
}

impl RedbEngine {
    /// Open the database file at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the file can't be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open_with_config(path, RedbConfig::new())
    }

    /// Like [`open`](Self::open), with explicit tuning.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the file can't be opened or created.
    pub fn open_with_config(path: impl AsRef<Path>, config: RedbConfig) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let existed = path.is_file();

        let db = config
            .builder()
            .create(path)
            .map_err(|e| StorageError::Open(format!("{}: {e}", path.display())))?;

        debug!(path = %path.display(), created = !existed, cache_size = ?config.cache_size, "opened redb file");
        Ok(Self { db, path: Some(path.to_path_buf()) })
    }

    /// A database that lives only as long as the engine.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if Redb can't initialize the backend.
    pub fn in_memory() -> Result<Self, StorageError> {
        let db = RedbConfig::new()
            .builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(|e| StorageError::Open(e.to_string()))?;
        Ok(Self { db, path: None })
    }

    /// The backing file, `None` for in-memory engines.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl StorageEngine for RedbEngine {
    type Transaction<'a> = RedbTransaction;

    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError> {
        self.db
            .begin_read()
            .map(RedbTransaction::new_read)
            .map_err(|e| StorageError::Transaction(e.to_string()))
    }

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        self.db
            .begin_write()
            .map(RedbTransaction::new_write)
            .map_err(|e| StorageError::Transaction(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Transaction;

    #[test]
    fn in_memory_has_no_path() {
        let engine = RedbEngine::in_memory().expect("in-memory engine");
        assert!(engine.path().is_none());
        assert!(engine.begin_read().expect("read tx").is_read_only());
    }

    #[test]
    fn config_cache_size() {
        assert_eq!(RedbConfig::new(), RedbConfig::default());
        assert_eq!(RedbConfig::new().cache_size(8 << 20).cache_size, Some(8 << 20));
    }

    #[test]
    fn file_engine_remembers_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("campus.redb");

        let engine = RedbEngine::open(&path).expect("open");
        assert_eq!(engine.path(), Some(path.as_path()));
        assert!(path.is_file());
    }
}
