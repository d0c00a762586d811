use alloc::vec::Vec;

use crate::table::IndexLocator;
use crate::table::TableStrategy;
use crate::universal_hash::Key;

/// Entries in arrival order, found by linear scan.
///
/// Insertion appends in O(1); erasing moves the last entry into the hole.
#[derive(Clone, Debug)]
pub struct UnsortedArray<V> {
    entries: Vec<(Key, V)>,
}

impl<V> Default for UnsortedArray<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> TableStrategy for UnsortedArray<V> {
    type Value = V;
    type Locator = IndexLocator;

    fn find(&self, key: Key) -> Option<IndexLocator> {
        self.entries
            .iter()
            .position(|(k, _)| *k == key)
            .map(IndexLocator)
    }

    fn insert_without_search(&mut self, key: Key, value: V) -> IndexLocator {
        self.entries.push((key, value));
        IndexLocator(self.entries.len() - 1)
    }

    fn erase_without_search(&mut self, locator: IndexLocator) {
        assert!(
            locator.0 < self.entries.len(),
            "{locator:?} does not address a live entry"
        );
        self.entries.swap_remove(locator.0);
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
