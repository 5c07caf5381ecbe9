//! Storage error types.

use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
///
/// Every variant means the backing medium is unavailable for the requested
/// operation. Callers surface these errors and never retry them implicitly.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store file could not be opened or created.
    #[error("failed to open store: {0}")]
    Open(String),

    /// A transaction could not be started or committed.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// The backend reported an error while reading or writing a table.
    #[error("internal storage error: {0}")]
    Internal(String),

    /// A write was attempted through a read-only transaction.
    #[error("write attempted in a read-only transaction")]
    ReadOnly,
}
