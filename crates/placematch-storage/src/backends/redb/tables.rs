//! Physical layout of a store file.
//!
//! Redb table definitions need `'static` names, while callers address tables
//! by runtime strings. Every logical table therefore lives in the single
//! physical table [`STORE_TABLE`], with keys laid out as
//! `<table name> 0x00 <key>`. Table names must not contain a NUL byte.

use redb::TableDefinition;

/// The one physical table of a store file.
pub const STORE_TABLE: TableDefinition<'static, &[u8], &[u8]> = TableDefinition::new("placematch_store");

const SEPARATOR: u8 = 0x00;

/// The physical key of `key` in `table`.
pub fn physical_key(table: &str, key: &[u8]) -> Vec<u8> {
    let mut out = table_prefix(table, SEPARATOR);
    out.extend_from_slice(key);
    out
}

/// Strip the `table` prefix from a physical key.
///
/// Returns `None` when `physical` belongs to a different table.
pub fn logical_key<'a>(table: &str, physical: &'a [u8]) -> Option<&'a [u8]> {
    physical.strip_prefix(table.as_bytes())?.strip_prefix(&[SEPARATOR])
}

/// Half-open physical key range `[start, end)` covering all of `table`.
pub fn table_bounds(table: &str) -> (Vec<u8>, Vec<u8>) {
    (table_prefix(table, SEPARATOR), table_prefix(table, SEPARATOR + 1))
}

fn table_prefix(table: &str, terminator: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(table.len() + 1);
    out.extend_from_slice(table.as_bytes());
    out.push(terminator);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_key_strips_own_table_only() {
        let record_key = [0x20, 0, 0, 0, 0, 0, 0, 0, 7];
        let physical = physical_key("descriptors", &record_key);

        assert_eq!(logical_key("descriptors", &physical), Some(&record_key[..]));
        assert_eq!(logical_key("descriptor_meta", &physical), None);
        assert_eq!(logical_key("descriptor", &physical), None);
    }

    #[test]
    fn empty_key_is_addressable() {
        let physical = physical_key("descriptor_meta", b"");
        assert_eq!(logical_key("descriptor_meta", &physical), Some(&b""[..]));
    }

    #[test]
    fn bounds_exclude_tables_sharing_a_prefix() {
        let (start, end) = table_bounds("descriptors");
        let inside = |k: &[u8]| start.as_slice() <= k && k < end.as_slice();

        assert!(inside(&physical_key("descriptors", &[0xFF; 9])));
        assert!(inside(&physical_key("descriptors", b"")));
        assert!(!inside(&physical_key("descriptor_meta", b"dimension")));
        assert!(!inside(&physical_key("descriptorsx", b"")));
    }
}
