//! Bounded read cache
//!
//! In-memory key → value map with a tracked total size and a configured
//! maximum. The store grows it lazily on reads and invalidates entries on
//! writes and erases; all mutation happens under the store's exclusive
//! lock, so the cache itself is a plain single-threaded structure.
//!
//! ## Eviction
//! Entries are evicted in the map's iteration order until the incoming
//! value fits. The order is arbitrary (not LRU); the contract is only
//! "make room for the incoming value or reject one over-sized value,
//! never exceed the maximum".

use std::collections::HashMap;

use bytes::Bytes;

use crate::error::{Result, StoreError};

/// Bounded key → value cache with a running size counter
pub(crate) struct Cache {
    /// Cached values, already codec-decoded
    entries: HashMap<String, Bytes>,
    /// Sum of all entry lengths, in bytes
    size: u64,
    /// Configured maximum total size; 0 disables the cache
    max: u64,
}

impl Cache {
    pub(crate) fn new(max: u64) -> Self {
        Self {
            entries: HashMap::new(),
            size: 0,
            max,
        }
    }

    /// Whether caching is enabled at all
    pub(crate) fn enabled(&self) -> bool {
        self.max > 0
    }

    /// Pure lookup, no state mutation
    pub(crate) fn lookup(&self, key: &str) -> Option<Bytes> {
        self.entries.get(key).cloned()
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value, evicting as needed to stay within the maximum.
    ///
    /// A value larger than the maximum is rejected with `ValueTooLarge`
    /// and no state is mutated. If the key is already cached, the old
    /// entry's length is released first, so re-inserting a key can never
    /// double-count the size.
    pub(crate) fn try_insert(&mut self, key: &str, value: Bytes) -> Result<()> {
        let incoming = value.len() as u64;
        if incoming > self.max {
            return Err(StoreError::ValueTooLarge {
                size: incoming,
                max: self.max,
            });
        }

        if let Some(old) = self.entries.remove(key) {
            self.size -= old.len() as u64;
        }

        while self.size + incoming > self.max {
            let victim = match self.entries.keys().next() {
                Some(k) => k.clone(),
                None => break,
            };
            self.evict(&victim);
        }

        self.entries.insert(key.to_string(), value);
        self.size += incoming;
        Ok(())
    }

    /// Remove the entry if present, releasing its exact stored length
    pub(crate) fn invalidate(&mut self, key: &str) {
        if let Some(value) = self.entries.remove(key) {
            self.size -= value.len() as u64;
        }
    }

    /// Drop every entry and reset the counter
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.size = 0;
    }

    fn evict(&mut self, key: &str) {
        if let Some(value) = self.entries.remove(key) {
            tracing::trace!(key, len = value.len(), "evicted cache entry");
            self.size -= value.len() as u64;
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current total of cached entry lengths, in bytes
    pub(crate) fn size(&self) -> u64 {
        self.size
    }

    /// Configured maximum size, in bytes
    pub(crate) fn max(&self) -> u64 {
        self.max
    }

    /// Number of cached entries
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
