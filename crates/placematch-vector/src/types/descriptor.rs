//! Descriptor vectors and stored records.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::error::VectorError;

use super::RecordId;

/// Reject NaN and infinite components.
///
/// # Errors
///
/// Returns [`VectorError::InvalidValue`] for the first non-finite component.
pub fn ensure_finite(values: &[f32]) -> Result<(), VectorError> {
    match values.iter().position(|v| !v.is_finite()) {
        None => Ok(()),
        Some(index) => {
            let value = values[index];
            Err(VectorError::InvalidValue {
                index,
                value,
                reason: if value.is_nan() {
                    "NaN values are not allowed"
                } else {
                    "Infinite values are not allowed"
                },
            })
        }
    }
}

/// A validated descriptor vector.
///
/// Descriptors are fixed-dimension vectors of finite `f32` values produced
/// by an external feature extractor.
///
/// # Example
///
/// ```
/// use placematch_vector::types::Descriptor;
///
/// let descriptor = Descriptor::new(vec![0.5, -0.25, 1.0]).unwrap();
/// assert_eq!(descriptor.dimension(), 3);
/// assert!(Descriptor::new(vec![]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Descriptor {
    data: Vec<f32>,
}

impl Descriptor {
    /// Create a new descriptor from a vector of f32 values.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::InvalidArgument`] if the vector is empty, or
    /// [`VectorError::InvalidValue`] if it contains NaN/Infinite values.
    pub fn new(data: Vec<f32>) -> Result<Self, VectorError> {
        if data.is_empty() {
            return Err(VectorError::InvalidArgument(
                "descriptor must have at least one component".to_string(),
            ));
        }

        ensure_finite(&data)?;
        Ok(Self { data })
    }

    /// Get the dimension of the descriptor.
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Get the descriptor data as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Consume the descriptor and return the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

impl Deref for Descriptor {
    type Target = [f32];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl TryFrom<Vec<f32>> for Descriptor {
    type Error = VectorError;

    fn try_from(data: Vec<f32>) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl<'de> Deserialize<'de> for Descriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = Vec::<f32>::deserialize(deserializer)?;
        Self::new(data).map_err(serde::de::Error::custom)
    }
}

/// One stored descriptor with its class label.
///
/// Records are immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorRecord {
    /// Store-unique id, increasing with insertion order.
    pub id: RecordId,
    /// Class label the descriptor was filed under.
    pub class_label: String,
    /// The descriptor vector.
    pub descriptor: Descriptor,
}

impl DescriptorRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(id: RecordId, class_label: impl Into<String>, descriptor: Descriptor) -> Self {
        Self { id, class_label: class_label.into(), descriptor }
    }

    /// The record's vector as a slice.
    #[inline]
    #[must_use]
    pub fn vector(&self) -> &[f32] {
        self.descriptor.as_slice()
    }
}
