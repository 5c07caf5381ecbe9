//! Value encoding for records and metadata.
//!
//! Record value format (little-endian):
//!
//! ```text
//! [label_len: u32][label: utf-8][dimension: u32][dimension x f32]
//! ```

use crate::error::VectorError;
use crate::types::{Descriptor, DescriptorRecord, RecordId};

/// Encode a record's label and descriptor.
///
/// # Errors
///
/// Returns [`VectorError::Encoding`] if the label or descriptor is too long
/// to be length-prefixed with a `u32`.
pub fn encode_record_value(class_label: &str, descriptor: &Descriptor) -> Result<Vec<u8>, VectorError> {
    let label_len = u32::try_from(class_label.len())
        .map_err(|_| VectorError::Encoding("class label too long".to_string()))?;
    let dimension = u32::try_from(descriptor.dimension())
        .map_err(|_| VectorError::Encoding("descriptor too long".to_string()))?;

    let mut bytes = Vec::with_capacity(8 + class_label.len() + descriptor.dimension() * 4);
    bytes.extend_from_slice(&label_len.to_le_bytes());
    bytes.extend_from_slice(class_label.as_bytes());
    bytes.extend_from_slice(&dimension.to_le_bytes());
    for &value in descriptor.as_slice() {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    Ok(bytes)
}

/// Decode a record value stored under `id`.
///
/// # Errors
///
/// Returns [`VectorError::Encoding`] on truncated or malformed bytes, or a
/// validation error if the stored vector is not a valid descriptor.
pub fn decode_record_value(id: RecordId, bytes: &[u8]) -> Result<DescriptorRecord, VectorError> {
    let mut reader = ByteReader { bytes, pos: 0 };

    let label_len = reader.read_u32()? as usize;
    let label = std::str::from_utf8(reader.take(label_len)?)
        .map_err(|e| VectorError::Encoding(format!("record {id}: invalid label: {e}")))?
        .to_owned();

    let dimension = reader.read_u32()? as usize;
    let payload = reader.take(dimension.saturating_mul(4))?;
    if !reader.is_done() {
        return Err(VectorError::Encoding(format!("record {id}: trailing bytes")));
    }

    let data = payload
        .chunks_exact(4)
        .map(|chunk| {
            let array: [u8; 4] = chunk
                .try_into()
                .map_err(|_| VectorError::Encoding("failed to read f32 bytes".to_string()))?;
            Ok(f32::from_le_bytes(array))
        })
        .collect::<Result<Vec<_>, VectorError>>()?;

    Ok(DescriptorRecord::new(id, label, Descriptor::new(data)?))
}

/// Encode the store dimension.
#[must_use]
pub fn encode_dimension(dimension: u32) -> [u8; 4] {
    dimension.to_le_bytes()
}

/// Decode the store dimension.
///
/// # Errors
///
/// Returns [`VectorError::Encoding`] if the value is not four bytes.
pub fn decode_dimension(bytes: &[u8]) -> Result<u32, VectorError> {
    let array: [u8; 4] = bytes
        .try_into()
        .map_err(|_| VectorError::Encoding(format!("dimension: expected 4 bytes, got {}", bytes.len())))?;
    Ok(u32::from_le_bytes(array))
}

/// Encode the id counter.
#[must_use]
pub fn encode_next_id(id: RecordId) -> [u8; 8] {
    id.as_u64().to_le_bytes()
}

/// Decode the id counter.
///
/// # Errors
///
/// Returns [`VectorError::Encoding`] if the value is not eight bytes.
pub fn decode_next_id(bytes: &[u8]) -> Result<RecordId, VectorError> {
    let array: [u8; 8] = bytes
        .try_into()
        .map_err(|_| VectorError::Encoding(format!("next_id: expected 8 bytes, got {}", bytes.len())))?;
    Ok(RecordId::new(u64::from_le_bytes(array)))
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], VectorError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| VectorError::Encoding("record value truncated".to_string()))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, VectorError> {
        let array: [u8; 4] = self
            .take(4)?
            .try_into()
            .map_err(|_| VectorError::Encoding("failed to read u32".to_string()))?;
        Ok(u32::from_le_bytes(array))
    }

    fn is_done(&self) -> bool {
        self.pos == self.bytes.len()
    }
}
