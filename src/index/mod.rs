//! Ordered key index
//!
//! An index is an auxiliary, totally-ordered set of all live keys,
//! enabling range/pagination queries that flat file storage cannot
//! answer. It is rebuilt from a full directory scan when the store is
//! constructed and incrementally maintained under the store's exclusive
//! lock afterward, so its key set converges with the on-disk key set
//! after every mutation.
//!
//! The ordering is supplied by the caller as a [`KeyCompare`] closure;
//! implementations must treat it as a total order.

mod btree;

pub use btree::BTreeIndex;

use std::cmp::Ordering;
use std::sync::Arc;

/// Caller-supplied total order over keys
pub type KeyCompare = Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>;

/// Plain lexicographic byte-wise ordering
pub fn lexical_order() -> KeyCompare {
    Arc::new(|a: &str, b: &str| a.cmp(b))
}

/// Capability interface for ordered key indexes
///
/// Implementations are selected at store construction via
/// [`Options::index`](crate::Options); the store drives every method
/// while holding its own lock, so implementations need no internal
/// locking of their own.
pub trait Index: Send + Sync {
    /// Destructively rebuild the index from a full key enumeration
    fn initialize(&mut self, keys: &mut dyn Iterator<Item = String>);

    /// Add a key after a successful write
    fn insert(&mut self, key: &str);

    /// Remove a key after a successful erase
    fn delete(&mut self, key: &str);

    /// Up to `count` keys in comparator order, for cursor pagination.
    ///
    /// An empty or absent `from` starts at the minimum key (inclusive);
    /// otherwise iteration starts at the key immediately after `from`
    /// (never `from` itself). Fewer than `count` keys are returned only
    /// when the index is exhausted.
    fn keys_from(&self, from: &str, count: usize) -> Vec<String>;

    /// Number of keys currently tracked
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
