//! Error types for the vector crate.

use thiserror::Error;

/// Errors that can occur in descriptor storage, metric evaluation and matching.
#[derive(Debug, Error)]
pub enum VectorError {
    /// Dimension mismatch between two vectors, or between a vector and a store.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The expected dimension.
        expected: usize,
        /// The actual dimension.
        actual: usize,
    },

    /// A top-N vote was requested against a store with no records.
    #[error("descriptor store is empty")]
    EmptyStore,

    /// A metric parameter is out of range (e.g. Minkowski `p < 1`).
    #[error("invalid metric argument: {0}")]
    InvalidMetricArgument(String),

    /// A caller-supplied argument is invalid (unknown metric, `n < 1`, bad name).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid value in a vector (NaN, Infinity).
    #[error("invalid value at index {index}: {value} - {reason}")]
    InvalidValue {
        /// The index of the invalid value.
        index: usize,
        /// The invalid value.
        value: f32,
        /// The reason the value is invalid.
        reason: &'static str,
    },

    /// Stored bytes could not be decoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] placematch_storage::StorageError),

    /// Lock poisoned - a writer panicked while holding the dataset's write gate.
    #[error("descriptor store writer lock poisoned by a prior panic")]
    LockPoisoned,
}
