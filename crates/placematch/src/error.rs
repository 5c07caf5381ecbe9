//! Error types for `placematch`.
//!
//! This module provides the [`enum@Error`] type returned by every public
//! operation of the crate, and the [`ErrorKind`] split between caller-input
//! and infrastructure failures.

use placematch_storage::StorageError;
use placematch_vector::VectorError;
use thiserror::Error;

use crate::ingest::ExtractionError;

/// Errors that can occur when using `placematch`.
#[derive(Debug, Error)]
pub enum Error {
    /// A vector length disagrees with a store's dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The store dimension.
        expected: usize,
        /// The supplied vector length.
        actual: usize,
    },

    /// A vote was requested against a dataset with no records.
    #[error("dataset has no descriptors")]
    EmptyStore,

    /// A single-match query found nothing to match against.
    #[error("no match: dataset has no descriptors")]
    NoMatch,

    /// A caller-supplied argument is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The configuration is invalid or could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// The backing medium could not be opened, read or written.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The feature extractor failed.
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Who is responsible for an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was wrong; retrying it unchanged fails again.
    CallerInput,
    /// The deployment (configuration, storage) or a collaborator failed.
    Infrastructure,
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DimensionMismatch { .. }
            | Self::EmptyStore
            | Self::NoMatch
            | Self::InvalidArgument(_) => ErrorKind::CallerInput,
            Self::Config(_) | Self::StorageUnavailable(_) | Self::Extraction(_) => {
                ErrorKind::Infrastructure
            }
        }
    }

    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a config error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<VectorError> for Error {
    fn from(err: VectorError) -> Self {
        match err {
            VectorError::DimensionMismatch { expected, actual } => {
                Self::DimensionMismatch { expected, actual }
            }
            VectorError::EmptyStore => Self::EmptyStore,
            VectorError::InvalidMetricArgument(msg) | VectorError::InvalidArgument(msg) => {
                Self::InvalidArgument(msg)
            }
            err @ VectorError::InvalidValue { .. } => Self::InvalidArgument(err.to_string()),
            VectorError::Storage(err) => err.into(),
            err @ (VectorError::Encoding(_) | VectorError::LockPoisoned) => {
                Self::StorageUnavailable(err.to_string())
            }
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

/// A specialized `Result` type for `placematch` operations.
pub type Result<T> = std::result::Result<T, Error>;
