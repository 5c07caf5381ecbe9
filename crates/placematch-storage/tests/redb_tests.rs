//! Tests for the Redb storage backend.

use placematch_storage::backends::{RedbConfig, RedbEngine};
use placematch_storage::{Cursor, StorageEngine, StorageError, Transaction};

/// Writes committed to an on-disk database survive reopening it.
#[test]
fn test_commit_is_durable_across_reopen() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("durable.redb");

    {
        let engine = RedbEngine::open(&path).expect("failed to open");
        let mut tx = engine.begin_write().expect("failed to begin write");
        tx.put("descriptor_meta", b"next_id", &2u64.to_le_bytes()).expect("failed to put");
        tx.commit().expect("failed to commit");
    }

    let engine = RedbEngine::open_with_config(&path, RedbConfig::new().cache_size(1 << 20))
        .expect("failed to reopen");
    let tx = engine.begin_read().expect("failed to begin read");
    let value = tx.get("descriptor_meta", b"next_id").expect("failed to get");
    assert_eq!(value, Some(2u64.to_le_bytes().to_vec()));
}

/// Dropping a write transaction without committing discards its writes.
#[test]
fn test_uncommitted_write_is_discarded() {
    let engine = RedbEngine::in_memory().expect("failed to create engine");

    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        tx.put("descriptors", b"k", b"v").expect("failed to put");
        tx.rollback().expect("failed to roll back");
    }

    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        tx.put("descriptors", b"k2", b"v2").expect("failed to put");
        drop(tx);
    }

    let tx = engine.begin_read().expect("failed to begin read");
    assert_eq!(tx.get("descriptors", b"k").expect("failed to get"), None);
    assert_eq!(tx.get("descriptors", b"k2").expect("failed to get"), None);
}

/// Logical tables do not leak keys into each other's cursors.
#[test]
fn test_cursor_is_scoped_to_table() {
    let engine = RedbEngine::in_memory().expect("failed to create engine");

    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        tx.put("descriptor_meta", b"dimension", b"4").expect("failed to put");
        tx.put("descriptors", b"a", b"1").expect("failed to put");
        tx.put("descriptors", b"b", b"2").expect("failed to put");
        tx.put("descriptorsx", b"c", b"3").expect("failed to put");
        tx.commit().expect("failed to commit");
    }

    let tx = engine.begin_read().expect("failed to begin read");
    let mut cursor = tx.cursor("descriptors").expect("failed to open cursor");

    let mut keys = Vec::new();
    while let Some((key, _)) = cursor.next().expect("cursor failed") {
        keys.push(key);
    }
    assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec()]);
}

/// A read snapshot taken before a commit does not see the committed write.
#[test]
fn test_read_snapshot_isolation() {
    let engine = RedbEngine::in_memory().expect("failed to create engine");

    let before = engine.begin_read().expect("failed to begin read");

    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        tx.put("descriptors", b"k", b"v").expect("failed to put");
        tx.commit().expect("failed to commit");
    }

    assert_eq!(before.get("descriptors", b"k").expect("failed to get"), None);

    let after = engine.begin_read().expect("failed to begin read");
    assert_eq!(after.get("descriptors", b"k").expect("failed to get"), Some(b"v".to_vec()));
}

/// Opening a path inside a missing directory is an open failure.
#[test]
fn test_open_missing_directory_fails() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("missing").join("store.redb");

    assert!(matches!(RedbEngine::open(&path), Err(StorageError::Open(_))));
}
