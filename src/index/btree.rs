//! BTree-backed index
//!
//! Keys live in a `BTreeSet`, wrapped so the set orders them by the
//! caller-supplied comparator instead of their natural `Ord`.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ops::Bound;

use super::{Index, KeyCompare};

/// A key wrapped with the comparator that orders it
struct IndexKey {
    key: String,
    cmp: KeyCompare,
}

impl PartialEq for IndexKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IndexKey {}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.cmp)(&self.key, &other.key)
    }
}

/// Ordered index over a balanced tree (`std::collections::BTreeSet`)
pub struct BTreeIndex {
    tree: BTreeSet<IndexKey>,
    cmp: KeyCompare,
}

impl BTreeIndex {
    /// Create an empty index ordered by `cmp`
    pub fn new(cmp: KeyCompare) -> Self {
        Self {
            tree: BTreeSet::new(),
            cmp,
        }
    }

    fn wrap(&self, key: &str) -> IndexKey {
        IndexKey {
            key: key.to_string(),
            cmp: self.cmp.clone(),
        }
    }
}

impl Index for BTreeIndex {
    fn initialize(&mut self, keys: &mut dyn Iterator<Item = String>) {
        self.tree = keys
            .map(|key| IndexKey {
                key,
                cmp: self.cmp.clone(),
            })
            .collect();
    }

    fn insert(&mut self, key: &str) {
        let wrapped = self.wrap(key);
        // replace-or-insert: a rewrite of an existing key keeps one entry
        self.tree.replace(wrapped);
    }

    fn delete(&mut self, key: &str) {
        let wrapped = self.wrap(key);
        self.tree.remove(&wrapped);
    }

    fn keys_from(&self, from: &str, count: usize) -> Vec<String> {
        if count == 0 || self.tree.is_empty() {
            return Vec::new();
        }

        let probe = self.wrap(from);
        let iter: Box<dyn Iterator<Item = &IndexKey> + '_> =
            if from.is_empty() || !self.tree.contains(&probe) {
                // no such cursor, start at the top
                Box::new(self.tree.iter())
            } else {
                // strictly after the cursor key
                Box::new(
                    self.tree
                        .range((Bound::Excluded(probe), Bound::Unbounded)),
                )
            };

        iter.take(count).map(|entry| entry.key.clone()).collect()
    }

    fn len(&self) -> usize {
        self.tree.len()
    }
}
