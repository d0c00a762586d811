use alloc::vec::Vec;

use crate::table::IndexLocator;
use crate::table::TableStrategy;
use crate::universal_hash::Key;

/// Entries kept in ascending key order and found by binary search.
///
/// Insertion and erasure shift the tail, so both are O(n).
#[derive(Clone, Debug)]
pub struct SortedArray<V> {
    entries: Vec<(Key, V)>,
}

impl<V> Default for SortedArray<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> TableStrategy for SortedArray<V> {
    type Value = V;
    type Locator = IndexLocator;

    fn find(&self, key: Key) -> Option<IndexLocator> {
        self.entries
            .binary_search_by_key(&key, |(k, _)| *k)
            .ok()
            .map(IndexLocator)
    }

    fn insert_without_search(&mut self, key: Key, value: V) -> IndexLocator {
        let index = self.entries.partition_point(|(k, _)| *k < key);
        debug_assert!(self.entries.get(index).is_none_or(|(k, _)| *k != key));
        self.entries.insert(index, (key, value));
        IndexLocator(index)
    }

    fn erase_without_search(&mut self, locator: IndexLocator) {
        assert!(
            locator.0 < self.entries.len(),
            "{locator:?} does not address a live entry"
        );
        self.entries.remove(locator.0);
    }

    fn begin(&self) -> IndexLocator {
        IndexLocator(0)
    }

    fn end(&self) -> IndexLocator {
        IndexLocator(self.entries.len())
    }

    fn advance(&self, locator: IndexLocator) -> IndexLocator {
        IndexLocator((locator.0 + 1).min(self.entries.len()))
    }

    fn entry(&self, locator: IndexLocator) -> Option<(Key, &V)> {
        self.entries.get(locator.0).map(|(key, value)| (*key, value))
    }

    fn entry_mut(&mut self, locator: IndexLocator) -> Option<(Key, &mut V)> {
        self.entries
            .get_mut(locator.0)
            .map(|(key, value)| (*key, value))
    }

    fn clear(&mut self) {
        self.entries = Vec::new();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
