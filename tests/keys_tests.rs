//! Tests for key enumeration, transforms, and directory pruning
//!
//! These tests verify:
//! - keys() walks every stored key
//! - keys_prefix() filters by string prefix
//! - Transforms decide the on-disk layout
//! - Erase prunes emptied directories but spares siblings

use std::collections::BTreeSet;
use std::sync::Arc;

use platter::{block_transform, Options, Store, StoreError, TransformFn};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store_with_transform(transform: TransformFn) -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let options = Options::builder()
        .base_path(temp_dir.path().join("store"))
        .transform(transform)
        .build();
    let store = Store::open(options).unwrap();
    (temp_dir, store)
}

fn collected(keys: platter::Keys) -> BTreeSet<String> {
    keys.collect()
}

// =============================================================================
// Enumeration Tests
// =============================================================================

#[test]
fn test_keys_yields_every_stored_key() {
    let (_temp, store) = setup_store_with_transform(platter::flat_transform());

    for key in ["alpha", "beta", "gamma"] {
        store.write(key, b"v").unwrap();
    }

    let keys = collected(store.keys());
    assert_eq!(
        keys,
        BTreeSet::from(["alpha".to_string(), "beta".to_string(), "gamma".to_string()])
    );
}

#[test]
fn test_keys_empty_store() {
    let (_temp, store) = setup_store_with_transform(platter::flat_transform());
    assert_eq!(store.keys().count(), 0);
}

#[test]
fn test_keys_sees_nested_layout() {
    let (_temp, store) = setup_store_with_transform(block_transform(2));

    store.write("aabb01", b"v").unwrap();
    store.write("ccdd02", b"v").unwrap();

    let keys = collected(store.keys());
    assert_eq!(
        keys,
        BTreeSet::from(["aabb01".to_string(), "ccdd02".to_string()])
    );
}

#[test]
fn test_keys_prefix_filters() {
    let (_temp, store) = setup_store_with_transform(platter::flat_transform());

    for key in ["ab01cd01", "ab01cd02", "ef01gh04"] {
        store.write(key, b"v").unwrap();
    }

    let keys = collected(store.keys_prefix("ab01"));
    assert_eq!(
        keys,
        BTreeSet::from(["ab01cd01".to_string(), "ab01cd02".to_string()])
    );
}

#[test]
fn test_keys_prefix_no_match() {
    let (_temp, store) = setup_store_with_transform(platter::flat_transform());

    store.write("alpha", b"v").unwrap();

    assert_eq!(store.keys_prefix("zz").count(), 0);
}

// =============================================================================
// Transform Layout Tests
// =============================================================================

#[test]
fn test_flat_transform_places_files_in_base() {
    let (_temp, store) = setup_store_with_transform(platter::flat_transform());

    store.write("flatkey", b"v").unwrap();

    assert!(store.base_path().join("flatkey").is_file());
}

#[test]
fn test_block_transform_layout() {
    let (_temp, store) = setup_store_with_transform(block_transform(2));

    store.write("aabb01", b"v").unwrap();

    assert!(store
        .base_path()
        .join("aa")
        .join("bb")
        .join("01")
        .join("aabb01")
        .is_file());
}

#[test]
fn test_custom_transform_layout() {
    let transform: TransformFn = Arc::new(|key: &str| {
        key.split('-').map(str::to_string).take(2).collect()
    });
    let (_temp, store) = setup_store_with_transform(transform);

    store.write("us-east-node7", b"v").unwrap();

    assert!(store
        .base_path()
        .join("us")
        .join("east")
        .join("us-east-node7")
        .is_file());
}

// =============================================================================
// Pruning Tests
// =============================================================================

#[test]
fn test_erase_prunes_empty_ancestors() {
    let (_temp, store) = setup_store_with_transform(block_transform(2));

    store.write("aabb01", b"v").unwrap();
    store.erase("aabb01").unwrap();

    // every now-empty ancestor is gone, the base dir itself stays
    assert!(!store.base_path().join("aa").exists());
    assert!(store.base_path().is_dir());
}

#[test]
fn test_erase_spares_sibling_directories() {
    let (_temp, store) = setup_store_with_transform(block_transform(2));

    store.write("aabb01", b"v").unwrap();
    store.write("aacc02", b"v").unwrap();

    store.erase("aabb01").unwrap();

    // the shared ancestor survives because the sibling still lives in it
    assert!(!store.base_path().join("aa").join("bb").exists());
    assert!(store.base_path().join("aa").join("cc").is_dir());
    assert_eq!(&store.read("aacc02").unwrap()[..], b"v");
}

// =============================================================================
// Collision Tests
// =============================================================================

#[test]
fn test_key_resolving_to_directory_is_bad_key() {
    let (_temp, store) = setup_store_with_transform(block_transform(3));

    // "abcabc" lives at base/abc/abc/abcabc, so the path for key "abc"
    // (base/abc/abc) is a directory
    store.write("abcabc", b"123").unwrap();

    assert!(matches!(store.read("abc"), Err(StoreError::BadKey)));
    assert!(matches!(store.erase("abc"), Err(StoreError::BadKey)));
    assert!(matches!(store.exists("abc"), Err(StoreError::BadKey)));
}
