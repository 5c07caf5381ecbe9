//! Record identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a descriptor record, unique within one store.
///
/// Ids start at 1 and strictly increase with insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(u64);

impl RecordId {
    /// The id assigned to the first record of a store.
    pub const FIRST: Self = Self(1);

    /// Create a new `RecordId` from a raw u64 value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The id that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
