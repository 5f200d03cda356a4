//! Tests for basic store operations
//!
//! These tests verify:
//! - Write/read round trips
//! - Overwrite semantics
//! - Erase and erase_all
//! - Error classification
//! - Concurrent access patterns

use std::sync::Arc;
use std::thread;

use platter::{is_not_found, Options, Store, StoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let options = Options::builder()
        .base_path(temp_dir.path().join("store"))
        .build();
    let store = Store::open(options).unwrap();
    (temp_dir, store)
}

fn setup_cached_store(cache_size_max: u64) -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let options = Options::builder()
        .base_path(temp_dir.path().join("store"))
        .cache_size_max(cache_size_max)
        .build();
    let store = Store::open(options).unwrap();
    (temp_dir, store)
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_write_read_round_trip() {
    let (_temp, store) = setup_store();

    store.write("alpha", b"some value").unwrap();
    let value = store.read("alpha").unwrap();

    assert_eq!(&value[..], b"some value");
}

#[test]
fn test_binary_value_round_trip() {
    let (_temp, store) = setup_store();

    let value: Vec<u8> = (0..=255).collect();
    store.write("binary", &value).unwrap();

    assert_eq!(&store.read("binary").unwrap()[..], &value[..]);
}

#[test]
fn test_empty_value_round_trip() {
    let (_temp, store) = setup_store();

    store.write("empty", b"").unwrap();
    let value = store.read("empty").unwrap();

    assert!(value.is_empty());
    assert!(store.exists("empty").unwrap());
}

#[test]
fn test_write_and_sync_round_trip() {
    let (_temp, store) = setup_store();

    store.write_and_sync("synced", b"durable bytes").unwrap();

    assert_eq!(&store.read("synced").unwrap()[..], b"durable bytes");
}

#[test]
fn test_overwrite_replaces_value() {
    let (_temp, store) = setup_store();

    store.write("key", b"value1").unwrap();
    store.write("key", b"value2").unwrap();

    assert_eq!(&store.read("key").unwrap()[..], b"value2");
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_read_missing_key() {
    let (_temp, store) = setup_store();

    let err = store.read("nonexistent").unwrap_err();

    assert!(err.is_not_found());
    assert!(is_not_found(&err));
}

#[test]
fn test_empty_key_rejected() {
    let (_temp, store) = setup_store();

    assert!(matches!(store.write("", b"v"), Err(StoreError::EmptyKey)));
    assert!(matches!(store.read(""), Err(StoreError::EmptyKey)));
    assert!(matches!(store.erase(""), Err(StoreError::EmptyKey)));
}

#[test]
fn test_erase_missing_key() {
    let (_temp, store) = setup_store();

    let err = store.erase("nonexistent").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_io_error_is_not_not_found() {
    let (_temp, store) = setup_store();

    store.write("present", b"v").unwrap();
    let err = store.read("missing").unwrap_err();

    assert!(is_not_found(&err));
    assert!(!is_not_found(&StoreError::BadKey));
}

// =============================================================================
// Exists Tests
// =============================================================================

#[test]
fn test_exists_reflects_lifecycle() {
    let (_temp, store) = setup_store();

    assert!(!store.exists("key").unwrap());
    store.write("key", b"value").unwrap();
    assert!(store.exists("key").unwrap());
    store.erase("key").unwrap();
    assert!(!store.exists("key").unwrap());
}

// =============================================================================
// Erase Tests
// =============================================================================

#[test]
fn test_erase_completeness() {
    let (_temp, store) = setup_cached_store(1024);

    store.write("key", b"value").unwrap();
    // deterministically cache the value via a drained stream
    let mut reader = store.read_stream("key", false).unwrap();
    let mut buf = Vec::new();
    std::io::Read::read_to_end(&mut reader, &mut buf).unwrap();
    assert!(store.is_cached("key"));

    store.erase("key").unwrap();

    assert!(store.read("key").unwrap_err().is_not_found());
    assert!(!store.exists("key").unwrap());
    assert!(!store.is_cached("key"));
    assert_eq!(store.cache_size(), 0);
    assert!(!store.keys().any(|k| k == "key"));
}

#[test]
fn test_erase_all_clears_everything() {
    let (_temp, store) = setup_cached_store(1024);

    for i in 0..10 {
        store.write(&format!("key{i}"), b"value").unwrap();
    }
    store.erase_all().unwrap();

    assert_eq!(store.keys().count(), 0);
    assert_eq!(store.cache_size(), 0);
    assert_eq!(store.cache_len(), 0);
    assert!(!store.base_path().exists());

    // the store stays usable after erase_all
    store.write("fresh", b"value").unwrap();
    assert_eq!(&store.read("fresh").unwrap()[..], b"value");
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_values_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().join("store");

    {
        let store = Store::open_path(&base).unwrap();
        store.write("persistent", b"still here").unwrap();
    }

    let store = Store::open_path(&base).unwrap();
    assert_eq!(&store.read("persistent").unwrap()[..], b"still here");
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_writers_and_readers() {
    let (_temp, store) = setup_cached_store(64 * 1024);
    let store = Arc::new(store);

    let mut handles = Vec::new();
    for worker in 0..4 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..50 {
                let key = format!("w{worker}-k{i}");
                store.write(&key, key.as_bytes()).unwrap();
                assert_eq!(&store.read(&key).unwrap()[..], key.as_bytes());
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.keys().count(), 200);
    assert!(store.cache_size() <= store.cache_size_max());
}

#[test]
fn test_concurrent_reads_of_same_key() {
    let (_temp, store) = setup_cached_store(1024);
    store.write("shared", b"shared value").unwrap();
    let store = Arc::new(store);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for _ in 0..25 {
                assert_eq!(&store.read("shared").unwrap()[..], b"shared value");
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    // however the racing populations interleaved, the counter matches
    // the entries exactly
    assert!(store.cache_size() <= store.cache_size_max());
    assert!(store.cache_len() <= 1);
    assert_eq!(
        store.cache_size(),
        b"shared value".len() as u64 * store.cache_len() as u64
    );
}
