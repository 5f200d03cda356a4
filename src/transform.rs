//! Key-to-path transforms
//!
//! A transform maps a key to the ordered list of directory names under
//! which the key's file is stored. The full path for key `k` is
//! `<base_path>/<seg_0>/<seg_1>/.../<k>`.
//!
//! Transforms must be pure and deterministic: they are called on every
//! path-dependent operation (write, read, erase, prune, index rebuild),
//! and two calls with the same key must produce the same segments.

use std::sync::Arc;

/// Transform function: key → ordered directory segments.
///
/// For example, a transform taking `"abcdef"` to `["ab", "cde", "f"]`
/// stores the key's file at `<base_path>/ab/cde/f/abcdef`.
pub type TransformFn = Arc<dyn Fn(&str) -> Vec<String> + Send + Sync>;

/// Transform that places every file directly under the base path.
///
/// This is the default.
pub fn flat_transform() -> TransformFn {
    Arc::new(|_key| Vec::new())
}

/// Transform that splits the key into directory levels of `block_size`
/// characters each, dropping any trailing partial block.
///
/// `block_transform(2)` maps `"abcdef"` to `["ab", "cd", "ef"]` and
/// `"abcde"` to `["ab", "cd"]`. Useful to keep directories small when
/// storing many keys with a shared structure (e.g. content hashes).
pub fn block_transform(block_size: usize) -> TransformFn {
    assert!(block_size > 0, "block size must be non-zero");
    Arc::new(move |key| {
        let chars: Vec<char> = key.chars().collect();
        chars
            .chunks(block_size)
            .filter(|chunk| chunk.len() == block_size)
            .map(|chunk| chunk.iter().collect())
            .collect()
    })
}
