//! Key and value encoding for descriptor storage.
//!
//! A dataset lives in its own storage file and uses two logical tables:
//!
//! - `descriptor_meta` holds the fixed dimension and the id counter under
//!   the keys [`META_DIMENSION`] and [`META_NEXT_ID`].
//! - `descriptors` holds one entry per record under
//!   `[PREFIX_RECORD][record_id]`.
//!
//! Record ids are encoded big-endian so a cursor over `descriptors` yields
//! records in insertion order. Values are little-endian.

mod keys;
mod record;

pub use keys::{
    decode_record_key, encode_record_key, META_DIMENSION, META_NEXT_ID, PREFIX_RECORD,
    TABLE_DESCRIPTORS, TABLE_META,
};
pub use record::{
    decode_dimension, decode_next_id, decode_record_value, encode_dimension, encode_next_id,
    encode_record_value,
};
