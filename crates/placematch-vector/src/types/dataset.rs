//! Dataset names.

use std::fmt;

use crate::error::VectorError;

/// Maximum length of a dataset name in bytes.
pub const MAX_DATASET_NAME_LEN: usize = 128;

/// A validated dataset name.
///
/// Each dataset name identifies exactly one descriptor store, and the name
/// doubles as the store's file stem. Names are limited to ASCII
/// alphanumerics, `-`, `_` and `.`, and may not start with `.`.
///
/// # Example
///
/// ```
/// use placematch_vector::types::DatasetName;
///
/// let name = DatasetName::new("paris-2024").unwrap();
/// assert_eq!(name.as_str(), "paris-2024");
/// assert!(DatasetName::new("../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetName(String);

impl DatasetName {
    /// Create a new dataset name.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::InvalidArgument`] if the name is empty, too
    /// long, starts with `.`, or contains other characters.
    pub fn new(name: impl Into<String>) -> Result<Self, VectorError> {
        let name = name.into();

        if name.is_empty() {
            return Err(VectorError::InvalidArgument("dataset name cannot be empty".to_string()));
        }

        if name.len() > MAX_DATASET_NAME_LEN {
            return Err(VectorError::InvalidArgument(format!(
                "dataset name is {} bytes, limit is {MAX_DATASET_NAME_LEN}",
                name.len()
            )));
        }

        if name.starts_with('.') {
            return Err(VectorError::InvalidArgument(format!(
                "dataset name '{name}' cannot start with '.'"
            )));
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')) {
            return Err(VectorError::InvalidArgument(format!(
                "dataset name '{name}' contains invalid characters (allowed: ASCII alphanumeric, '_', '-', '.')"
            )));
        }

        Ok(Self(name))
    }

    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DatasetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
