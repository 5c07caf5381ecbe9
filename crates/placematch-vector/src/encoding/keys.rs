//! Table names and key layout.

use crate::types::RecordId;

/// Logical table holding descriptor records.
pub const TABLE_DESCRIPTORS: &str = "descriptors";

/// Logical table holding store metadata.
pub const TABLE_META: &str = "descriptor_meta";

/// Metadata key for the store's fixed dimension.
pub const META_DIMENSION: &[u8] = b"dimension";

/// Metadata key for the next record id to assign.
pub const META_NEXT_ID: &[u8] = b"next_id";

/// Key prefix for descriptor records.
pub const PREFIX_RECORD: u8 = 0x20;

/// Encode the key of a descriptor record.
///
/// Format: `[PREFIX_RECORD][record_id BE]`
#[must_use]
pub fn encode_record_key(id: RecordId) -> [u8; 9] {
    let mut key = [0u8; 9];
    key[0] = PREFIX_RECORD;
    key[1..].copy_from_slice(&id.as_u64().to_be_bytes());
    key
}

/// Decode a descriptor record key.
///
/// Returns `None` if the key is not a record key.
#[must_use]
pub fn decode_record_key(key: &[u8]) -> Option<RecordId> {
    if key.len() != 9 || key[0] != PREFIX_RECORD {
        return None;
    }
    let id_bytes: [u8; 8] = key[1..9].try_into().ok()?;
    Some(RecordId::new(u64::from_be_bytes(id_bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keys_sort_by_id() {
        let a = encode_record_key(RecordId::new(2));
        let b = encode_record_key(RecordId::new(256));
        let c = encode_record_key(RecordId::new(u64::MAX));
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn decode_rejects_foreign_keys() {
        assert_eq!(decode_record_key(&encode_record_key(RecordId::new(7))), Some(RecordId::new(7)));
        assert_eq!(decode_record_key(META_NEXT_ID), None);
        assert_eq!(decode_record_key(&[PREFIX_RECORD, 1, 2]), None);
        assert_eq!(decode_record_key(&[0x21, 0, 0, 0, 0, 0, 0, 0, 1]), None);
    }
}
