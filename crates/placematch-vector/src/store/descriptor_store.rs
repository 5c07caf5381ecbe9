//! Append-only descriptor store for a single dataset.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use placematch_storage::backends::{RedbConfig, RedbEngine};
use placematch_storage::{Cursor, StorageEngine, Transaction};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::encoding::{
    decode_dimension, decode_next_id, decode_record_key, decode_record_value, encode_dimension,
    encode_next_id, encode_record_key, encode_record_value, META_DIMENSION, META_NEXT_ID,
    TABLE_DESCRIPTORS, TABLE_META,
};
use crate::error::VectorError;
use crate::types::{Descriptor, DescriptorRecord, RecordId};

/// Summary of a store's contents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of records.
    pub records: usize,
    /// Established dimension, `None` while the store is empty.
    pub dimension: Option<usize>,
    /// Record count per class label, ordered by label.
    pub classes: BTreeMap<String, usize>,
}

/// An append-only store of labelled descriptors.
///
/// The first appended descriptor fixes the store's dimension; every later
/// descriptor must match it. Records receive strictly increasing ids and are
/// never modified.
///
/// Appends are serialized through a per-store writer gate (see
/// [`DescriptorStore::writer`]). Reads run in snapshot transactions and never
/// wait on the gate.
pub struct DescriptorStore<E: StorageEngine> {
    engine: E,
    writer_gate: Mutex<()>,
}

impl DescriptorStore<RedbEngine> {
    /// Open or create a redb-backed store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::Storage`] if the file cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VectorError> {
        Self::open_with_config(path, RedbConfig::default())
    }

    /// Open or create a redb-backed store with backend configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::Storage`] if the file cannot be opened or created.
    pub fn open_with_config(path: impl AsRef<Path>, config: RedbConfig) -> Result<Self, VectorError> {
        let path = path.as_ref();
        let engine = RedbEngine::open_with_config(path, config)?;
        debug!(path = %path.display(), "opened descriptor store");
        Ok(Self::new(engine))
    }
}

impl<E: StorageEngine> DescriptorStore<E> {
    /// Create a store over the given storage engine.
    #[must_use]
    pub const fn new(engine: E) -> Self {
        Self { engine, writer_gate: Mutex::new(()) }
    }

    /// Get a reference to the storage engine.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Acquire exclusive append rights for this store.
    ///
    /// The returned guard blocks other writers until it is dropped. Readers
    /// are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::LockPoisoned`] if a previous writer panicked.
    pub fn writer(&self) -> Result<DescriptorWriter<'_, E>, VectorError> {
        let guard = self.writer_gate.lock().map_err(|_| VectorError::LockPoisoned)?;
        Ok(DescriptorWriter { store: self, _guard: guard })
    }

    /// Append a single record, holding the writer gate for just this call.
    ///
    /// # Errors
    ///
    /// See [`DescriptorWriter::append`].
    pub fn append(&self, class_label: &str, descriptor: &Descriptor) -> Result<RecordId, VectorError> {
        self.writer()?.append(class_label, descriptor)
    }

    /// The established dimension, or `None` if nothing was appended yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    pub fn dimension(&self) -> Result<Option<usize>, VectorError> {
        let tx = self.engine.begin_read()?;
        read_dimension(&tx)
    }

    /// Number of records in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    pub fn len(&self) -> Result<usize, VectorError> {
        let tx = self.engine.begin_read()?;
        let next = read_next_id(&tx)?;
        next.as_u64()
            .checked_sub(RecordId::FIRST.as_u64())
            .and_then(|count| usize::try_from(count).ok())
            .ok_or_else(|| VectorError::Encoding(format!("invalid next_id {next}")))
    }

    /// Check if the store has no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    pub fn is_empty(&self) -> Result<bool, VectorError> {
        Ok(self.len()? == 0)
    }

    /// Return every record in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails or a record cannot be decoded.
    pub fn list_all(&self) -> Result<Vec<DescriptorRecord>, VectorError> {
        let mut records = Vec::new();
        self.for_each(|record| {
            records.push(record);
            Ok(())
        })?;
        Ok(records)
    }

    /// Stream every record in ascending id order to `visitor`.
    ///
    /// All records come from one read snapshot. The visitor may stop the
    /// scan early by returning an error, which is passed through.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails, a record key or value
    /// cannot be decoded, or the visitor fails.
    pub fn for_each<F>(&self, mut visitor: F) -> Result<(), VectorError>
    where
        F: FnMut(DescriptorRecord) -> Result<(), VectorError>,
    {
        let tx = self.engine.begin_read()?;
        let mut cursor = tx.cursor(TABLE_DESCRIPTORS)?;

        while let Some((key, value)) = cursor.next()? {
            let id = decode_record_key(&key)
                .ok_or_else(|| VectorError::Encoding(format!("malformed record key {key:02x?}")))?;
            visitor(decode_record_value(id, &value)?)?;
        }

        Ok(())
    }

    /// Compute record and per-class counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails or a record cannot be decoded.
    pub fn stats(&self) -> Result<StoreStats, VectorError> {
        let mut stats = StoreStats { dimension: self.dimension()?, ..StoreStats::default() };
        self.for_each(|record| {
            stats.records += 1;
            *stats.classes.entry(record.class_label).or_insert(0) += 1;
            Ok(())
        })?;
        Ok(stats)
    }
}

/// Exclusive append handle for a [`DescriptorStore`].
///
/// Holding a writer keeps every other writer of the same store waiting.
/// The gate is released when the writer is dropped.
pub struct DescriptorWriter<'a, E: StorageEngine> {
    store: &'a DescriptorStore<E>,
    _guard: MutexGuard<'a, ()>,
}

impl<E: StorageEngine> DescriptorWriter<'_, E> {
    /// Append a record and return its id.
    ///
    /// The record, the id counter and (for the first record) the store
    /// dimension are written in one transaction.
    ///
    /// # Errors
    ///
    /// - [`VectorError::InvalidArgument`] if `class_label` is empty
    /// - [`VectorError::DimensionMismatch`] if the descriptor does not match
    ///   the established dimension; nothing is written
    /// - [`VectorError::Storage`] if the write fails
    pub fn append(&self, class_label: &str, descriptor: &Descriptor) -> Result<RecordId, VectorError> {
        if class_label.is_empty() {
            return Err(VectorError::InvalidArgument("class label must not be empty".to_string()));
        }

        let mut tx = self.store.engine.begin_write()?;

        let established = match read_dimension(&tx)? {
            Some(expected) if expected != descriptor.dimension() => {
                tx.rollback()?;
                return Err(VectorError::DimensionMismatch {
                    expected,
                    actual: descriptor.dimension(),
                });
            }
            Some(_) => false,
            None => {
                let dimension = u32::try_from(descriptor.dimension())
                    .map_err(|_| VectorError::Encoding("dimension overflows u32".to_string()))?;
                tx.put(TABLE_META, META_DIMENSION, &encode_dimension(dimension))?;
                true
            }
        };

        let id = read_next_id(&tx)?;
        tx.put(TABLE_DESCRIPTORS, &encode_record_key(id), &encode_record_value(class_label, descriptor)?)?;
        tx.put(TABLE_META, META_NEXT_ID, &encode_next_id(id.next()))?;
        tx.commit()?;

        if established {
            info!(dimension = descriptor.dimension(), "descriptor store dimension established");
        }
        trace!(id = %id, class_label, "appended descriptor");

        Ok(id)
    }
}

fn read_dimension<T: Transaction>(tx: &T) -> Result<Option<usize>, VectorError> {
    tx.get(TABLE_META, META_DIMENSION)?
        .map(|bytes| decode_dimension(&bytes).map(|d| d as usize))
        .transpose()
}

fn read_next_id<T: Transaction>(tx: &T) -> Result<RecordId, VectorError> {
    Ok(tx
        .get(TABLE_META, META_NEXT_ID)?
        .map(|bytes| decode_next_id(&bytes))
        .transpose()?
        .unwrap_or(RecordId::FIRST))
}
