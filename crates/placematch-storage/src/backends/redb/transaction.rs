//! Redb transaction implementation.
//!
//! This module provides the `RedbTransaction` type which implements the
//! `Transaction` trait for both read-only and read-write transactions.
//!
//! # Memory-Efficient Cursors
//!
//! The cursor implementation uses batched streaming to avoid loading entire
//! tables into memory. It loads entries in batches (default 1000 entries),
//! fetching the next batch on demand as the cursor advances.

use std::collections::VecDeque;
use std::ops::Bound;

use redb::{ReadTransaction, ReadableTable, WriteTransaction};

use crate::engine::{Cursor, CursorResult, KeyValue, StorageError, Transaction};

use super::tables::{logical_key, physical_key, table_bounds, STORE_TABLE};

/// Default batch size for cursor operations.
const DEFAULT_BATCH_SIZE: usize = 1000;

/// A Redb read snapshot or write transaction.
#[allow(clippy::large_enum_variant)]
pub enum RedbTransaction {
    /// A read-only transaction.
    Read(ReadTransaction),
    /// A read-write transaction.
    Write(WriteTransaction),
}

impl RedbTransaction {
    /// Create a new read-only transaction.
    pub const fn new_read(tx: ReadTransaction) -> Self {
        Self::Read(tx)
    }

    /// Create a new read-write transaction.
    pub const fn new_write(tx: WriteTransaction) -> Self {
        Self::Write(tx)
    }

    /// Fetch up to `batch_size` entries of a logical table, starting after
    /// `after_key` (exclusive) or from the start of the table.
    fn fetch_batch(
        &self,
        table: &str,
        after_key: Option<&[u8]>,
        batch_size: usize,
    ) -> Result<Vec<KeyValue>, StorageError> {
        let (first, end) = table_bounds(table);
        let start = match after_key {
            Some(after) => Bound::Excluded(physical_key(table, after)),
            None => Bound::Included(first),
        };

        match self {
            Self::Read(tx) => match tx.open_table(STORE_TABLE) {
                Ok(t) => scan_batch(&t, table, start, &end, batch_size),
                // Nothing committed yet
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(Vec::new()),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
            Self::Write(tx) => {
                let t = tx.open_table(STORE_TABLE).map_err(|e| StorageError::Internal(e.to_string()))?;
                scan_batch(&t, table, start, &end, batch_size)
            }
        }
    }
}

/// Read a single value from an opened physical table.
fn read_value<T>(table: &T, encoded_key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    match table.get(encoded_key) {
        Ok(Some(value)) => Ok(Some(value.value().to_vec())),
        Ok(None) => Ok(None),
        Err(e) => Err(StorageError::Internal(e.to_string())),
    }
}

/// Collect one batch of decoded entries from an opened physical table.
fn scan_batch<T>(
    physical: &T,
    table: &str,
    start: Bound<Vec<u8>>,
    end: &[u8],
    batch_size: usize,
) -> Result<Vec<KeyValue>, StorageError>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let start: Bound<&[u8]> = match &start {
        Bound::Included(k) => Bound::Included(k.as_slice()),
        Bound::Excluded(k) => Bound::Excluded(k.as_slice()),
        Bound::Unbounded => Bound::Unbounded,
    };
    let bounds: (Bound<&[u8]>, Bound<&[u8]>) = (start, Bound::Excluded(end));
    let range = physical
        .range::<&[u8]>(bounds)
        .map_err(|e| StorageError::Internal(e.to_string()))?;

    let mut entries = Vec::with_capacity(batch_size.min(1024));
    for result in range {
        if entries.len() >= batch_size {
            break;
        }

        let (k, v) = result.map_err(|e| StorageError::Internal(e.to_string()))?;
        if let Some(key) = logical_key(table, k.value()) {
            entries.push((key.to_vec(), v.value().to_vec()));
        }
    }

    Ok(entries)
}

impl Transaction for RedbTransaction {
    type Cursor<'a>
        = RedbCursor<'a>
    where
        Self: 'a;

    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let encoded_key = physical_key(table, key);

        match self {
            Self::Read(tx) => match tx.open_table(STORE_TABLE) {
                Ok(t) => read_value(&t, &encoded_key),
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(None),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
            Self::Write(tx) => {
                let t = tx.open_table(STORE_TABLE).map_err(|e| StorageError::Internal(e.to_string()))?;
                read_value(&t, &encoded_key)
            }
        }
    }

    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let encoded_key = physical_key(table, key);
                let mut t =
                    tx.open_table(STORE_TABLE).map_err(|e| StorageError::Internal(e.to_string()))?;
                t.insert(encoded_key.as_slice(), value)
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                Ok(())
            }
        }
    }

    fn cursor(&self, table: &str) -> Result<Self::Cursor<'_>, StorageError> {
        Ok(RedbCursor::new(self, table.to_string(), DEFAULT_BATCH_SIZE))
    }

    fn commit(self) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Ok(()),
            Self::Write(tx) => tx.commit().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn rollback(self) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Ok(()),
            Self::Write(tx) => tx.abort().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn is_read_only(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}

/// A memory-efficient forward cursor over one logical table.
///
/// At any time the cursor holds at most `batch_size` entries in memory.
pub struct RedbCursor<'a> {
    tx: &'a RedbTransaction,
    table: String,
    batch: VecDeque<KeyValue>,
    last_key: Option<Vec<u8>>,
    batch_size: usize,
    exhausted: bool,
}

impl<'a> RedbCursor<'a> {
    /// Create a new streaming cursor positioned before the first entry.
    pub fn new(tx: &'a RedbTransaction, table: String, batch_size: usize) -> Self {
        Self {
            tx,
            table,
            batch: VecDeque::new(),
            last_key: None,
            batch_size: batch_size.max(1),
            exhausted: false,
        }
    }

    /// Load the batch following the last yielded key.
    fn refill(&mut self) -> Result<(), StorageError> {
        let batch = self.tx.fetch_batch(&self.table, self.last_key.as_deref(), self.batch_size)?;
        self.exhausted = batch.len() < self.batch_size;
        self.batch = batch.into();
        Ok(())
    }
}

impl Cursor for RedbCursor<'_> {
    fn next(&mut self) -> CursorResult {
        if self.batch.is_empty() && !self.exhausted {
            self.refill()?;
        }

        match self.batch.pop_front() {
            Some((key, value)) => {
                self.last_key = Some(key.clone());
                Ok(Some((key, value)))
            }
            None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }
}
