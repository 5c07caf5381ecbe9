//! The key-value seam between descriptor stores and their backend.

use super::{StorageError, StorageResult};

/// One entry yielded by a [`Cursor`].
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// What [`Cursor::next`] returns.
pub type CursorResult = Result<Option<KeyValue>, StorageError>;

/// A transactional key-value backend holding one store.
///
/// Read transactions are snapshots: they run alongside each other and
/// alongside a writer without blocking. The backend serializes writers.
pub trait StorageEngine: Send + Sync {
    /// Transaction handle, borrowing the engine.
    type Transaction<'a>: Transaction
    where
        Self: 'a;

    /// Start a read snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the backend refuses.
    fn begin_read(&self) -> StorageResult<Self::Transaction<'_>>;

    /// Start a write transaction, waiting for any other writer to finish.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the backend refuses.
    fn begin_write(&self) -> StorageResult<Self::Transaction<'_>>;
}

/// Access to logical tables inside one transaction.
///
/// A write transaction that is dropped without [`commit`](Self::commit)
/// leaves no trace.
pub trait Transaction {
    /// Cursor handle, borrowing the transaction.
    type Cursor<'a>: Cursor
    where
        Self: 'a;

    /// Read `key` from `table`; `None` if either is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    fn get(&self, table: &str, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Write `value` under `key` in `table`, replacing any earlier value.
    ///
    /// # Errors
    ///
    /// [`StorageError::ReadOnly`] on a read snapshot, or a backend failure.
    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> StorageResult<()>;

    /// Walk `table` in ascending key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend can't open the table.
    fn cursor(&self, table: &str) -> StorageResult<Self::Cursor<'_>>;

    /// Make every write of this transaction durable and visible at once.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the commit fails.
    fn commit(self) -> StorageResult<()>;

    /// Discard every write of this transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the backend fails to abort.
    fn rollback(self) -> StorageResult<()>;

    /// Whether this is a read snapshot.
    fn is_read_only(&self) -> bool;
}

/// Forward iteration over one logical table.
///
/// ```ignore
/// let mut cursor = tx.cursor("descriptors")?;
/// while let Some((key, value)) = cursor.next()? {
///     // ...
/// }
/// ```
pub trait Cursor {
    /// The next entry, or `None` past the end of the table.
    fn next(&mut self) -> CursorResult;
}
