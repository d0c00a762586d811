use alloc::vec::Vec;

use crate::growth::GrowthState;
use crate::table::HashStrategy;
use crate::table::TableStrategy;
use crate::universal_hash::DEFAULT_EXPONENT;
use crate::universal_hash::Key;
use crate::universal_hash::ProcessEntropy;
use crate::universal_hash::UniversalHash;

type Bucket<V> = Vec<(Key, V)>;

fn empty_buckets<V>(capacity: usize) -> Vec<Bucket<V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Vec::new);
    buckets
}

/// Position of an entry in a [`SeparateChaining`] table.
///
/// A bucket's newest entry is its head, and is stored last so that
/// prepending never moves older entries. `slot` is one past the entry's
/// storage index, which leaves zero free to mean "end of bucket".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChainLocator {
    bucket: usize,
    slot: usize,
}

impl ChainLocator {
    /// Index of the bucket this locator points into.
    pub fn bucket(&self) -> usize {
        self.bucket
    }
}

/// Hash table resolving collisions by chaining entries in per-bucket lists.
///
/// Lookups hash to one bucket and scan it from the newest entry. Erasing
/// unlinks the entry, so buckets never hold tombstones.
#[derive(Clone, Debug)]
pub struct SeparateChaining<V> {
    buckets: Vec<Bucket<V>>,
    state: GrowthState,
}

impl<V> Default for SeparateChaining<V> {
    fn default() -> Self {
        Self::with_hash(UniversalHash::from_entropy(
            DEFAULT_EXPONENT,
            &mut ProcessEntropy,
        ))
    }
}

impl<V> SeparateChaining<V> {
    /// Skips forward over exhausted buckets; stops at the end sentinel.
    fn settle(&self, mut locator: ChainLocator) -> ChainLocator {
        let last = self.buckets.len() - 1;
        while locator.slot == 0 && locator.bucket < last {
            locator.bucket += 1;
            locator.slot = self.buckets[locator.bucket].len();
        }
        locator
    }

    #[cold]
    fn repack(&mut self) {
        let capacity = self.state.grow();
        let old = core::mem::replace(&mut self.buckets, empty_buckets(capacity));
        for bucket in old {
            for (key, value) in bucket {
                debug_assert!(!self.state.must_grow());
                self.insert_without_search(key, value);
            }
        }
    }

    /// Computes table statistics.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> crate::stats::DebugStats {
        let capacity = self.buckets.len();
        let populated = self.state.live();
        let occupied = self.buckets.iter().filter(|b| !b.is_empty()).count();
        let longest = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        let total_bytes = capacity * core::mem::size_of::<Bucket<V>>()
            + self
                .buckets
                .iter()
                .map(|b| b.capacity() * core::mem::size_of::<(Key, V)>())
                .sum::<usize>();

        crate::stats::DebugStats {
            populated,
            capacity,
            exponent: self.state.universal_hash().exponent(),
            max_live: crate::growth::max_live(capacity),
            load_factor: populated as f64 / capacity as f64,
            occupied_positions: occupied,
            tombstones: 0,
            longest_run: longest,
            total_bytes,
        }
    }

    /// Counts buckets by chain length: bin `n` holds the number of buckets
    /// with exactly `n` entries.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> crate::stats::Histogram {
        let longest = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        let mut bins = alloc::vec![0usize; longest + 1];
        for bucket in &self.buckets {
            bins[bucket.len()] += 1;
        }
        crate::stats::Histogram::new("chain length", bins)
    }
}

impl<V> TableStrategy for SeparateChaining<V> {
    type Value = V;
    type Locator = ChainLocator;

    fn find(&self, key: Key) -> Option<ChainLocator> {
        let bucket = self.state.hash(key);
        self.buckets[bucket]
            .iter()
            .rposition(|(k, _)| *k == key)
            .map(|index| ChainLocator {
                bucket,
                slot: index + 1,
            })
    }

    fn insert_without_search(&mut self, key: Key, value: V) -> ChainLocator {
        if self.state.must_grow() {
            self.repack();
        }

        let bucket = self.state.hash(key);
        let chain = &mut self.buckets[bucket];
        chain.push((key, value));
        self.state.inserted();

        ChainLocator {
            bucket,
            slot: chain.len(),
        }
    }

    fn erase_without_search(&mut self, locator: ChainLocator) {
        let chain = self
            .buckets
            .get_mut(locator.bucket)
            .filter(|chain| locator.slot != 0 && locator.slot <= chain.len());
        let Some(chain) = chain else {
            panic!("{locator:?} does not address a live entry");
        };

        chain.remove(locator.slot - 1);
        self.state.erased();
    }

    fn begin(&self) -> ChainLocator {
        self.settle(ChainLocator {
            bucket: 0,
            slot: self.buckets[0].len(),
        })
    }

    fn end(&self) -> ChainLocator {
        ChainLocator {
            bucket: self.buckets.len() - 1,
            slot: 0,
        }
    }

    fn advance(&self, locator: ChainLocator) -> ChainLocator {
        if locator.slot == 0 {
            return self.settle(locator);
        }
        self.settle(ChainLocator {
            bucket: locator.bucket,
            slot: locator.slot - 1,
        })
    }

    fn entry(&self, locator: ChainLocator) -> Option<(Key, &V)> {
        let index = locator.slot.checked_sub(1)?;
        self.buckets
            .get(locator.bucket)?
            .get(index)
            .map(|(key, value)| (*key, value))
    }

    fn entry_mut(&mut self, locator: ChainLocator) -> Option<(Key, &mut V)> {
        let index = locator.slot.checked_sub(1)?;
        self.buckets
            .get_mut(locator.bucket)?
            .get_mut(index)
            .map(|(key, value)| (*key, value))
    }

    fn clear(&mut self) {
        let capacity = self.state.reset();
        self.buckets = empty_buckets(capacity);
    }

    fn len(&self) -> usize {
        self.state.live()
    }
}

impl<V> HashStrategy for SeparateChaining<V> {
    fn with_hash(hash: UniversalHash) -> Self {
        Self {
            buckets: empty_buckets(hash.capacity()),
            state: GrowthState::new(hash),
        }
    }

    fn universal_hash(&self) -> &UniversalHash {
        self.state.universal_hash()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use rand::TryRngCore;
    use rand::rngs::OsRng;

    use super::*;
    use crate::ChainedTable;
    use crate::universal_hash::WORD_BITS;

    /// Capacity 8 with multiplier 1: every small key lands in bucket 0.
    fn colliding() -> ChainedTable<char> {
        ChainedTable::with_multiplier(3, 1)
    }

    const COLLISION_KEYS: [Key; 6] = [0, 1, 2, 3, 4, 5];

    fn spread_key(i: u32) -> Key {
        i << (WORD_BITS - 3)
    }

    #[test]
    fn finds_every_colliding_entry() {
        let mut table = colliding();
        for (i, &key) in COLLISION_KEYS[..3].iter().enumerate() {
            table.insert(key, char::from(b'a' + i as u8));
        }

        assert_eq!(table.strategy().buckets[0].len(), 3);
        assert_eq!(table.get(0), Some(&'a'));
        assert_eq!(table.get(1), Some(&'b'));
        assert_eq!(table.get(2), Some(&'c'));
    }

    #[test]
    fn erase_keeps_other_colliding_entries() {
        for erased in [0, 1] {
            let mut table = colliding();
            for (i, &key) in COLLISION_KEYS[..3].iter().enumerate() {
                table.insert(key, char::from(b'a' + i as u8));
            }

            assert!(table.erase(erased));

            assert_eq!(table.get(2), Some(&'c'));
            assert_eq!(table.find(erased), None);
            assert_eq!(table.len(), 2);
        }
    }

    #[test]
    fn identity_hash_scenario() {
        let mut table: ChainedTable<char> = ChainedTable::with_multiplier(3, 1 << (WORD_BITS - 3));
        table.insert(0, 'a');
        table.insert(1, 'b');
        table.insert(2, 'c');
        for key in 0..3 {
            assert_eq!(table.find(key).map(|l| l.bucket()), Some(key as usize));
        }
        assert_eq!(table.get(2), Some(&'c'));

        assert!(table.erase(0));

        assert_eq!(table.get(2), Some(&'c'));
        assert_eq!(table.find(0), None);
    }

    #[test]
    fn newest_entry_heads_its_bucket() {
        let mut table = colliding();
        for &key in &COLLISION_KEYS[..4] {
            table.insert(key, 'x');
        }

        let order: Vec<Key> = table.iter().map(|(key, _)| key).collect();
        assert_eq!(order, [3, 2, 1, 0]);
    }

    #[test]
    fn prepend_does_not_move_existing_entries() {
        let mut table = colliding();
        let (first, _) = table.insert(0, 'a');
        table.insert(1, 'b');
        table.insert(2, 'c');

        assert_eq!(table.find(0), Some(first));
        assert_eq!(table.entry(first), Some((0, &'a')));
        assert_eq!(table.insert(0, 'z'), (first, false));
    }

    #[test]
    fn repacks_when_almost_full() {
        let mut table = colliding();
        let capacity = table.capacity();
        for i in 1..6 {
            table.insert(spread_key(i), char::from(b'a' + i as u8));
        }
        assert_eq!(table.capacity(), capacity);

        table.insert(spread_key(6), 'g');

        assert!(table.capacity() > capacity);
        assert_eq!(table.len(), 6);
        for i in 1..7 {
            assert_eq!(table.get(spread_key(i)), Some(&char::from(b'a' + i as u8)));
        }
    }

    #[test]
    fn lookups_do_not_disturb_table() {
        let mut table = colliding();
        for (i, &key) in COLLISION_KEYS[..3].iter().enumerate() {
            table.insert(key, char::from(b'a' + i as u8));
        }

        assert_eq!(table.find(COLLISION_KEYS[4]), None);

        for (i, &key) in COLLISION_KEYS[..3].iter().enumerate() {
            assert_eq!(table.get(key), Some(&char::from(b'a' + i as u8)));
        }
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
        assert_eq!(table.capacity(), 8);
    }

    #[test]
    fn iterates_across_buckets_and_growth() {
        let mut table = colliding();
        for &key in &COLLISION_KEYS[..5] {
            table.insert(key, 'a');
        }
        for i in 1..6 {
            table.insert(spread_key(i), 'a');
        }

        let mut seen: Vec<Key> = table.iter().map(|(key, value)| {
            assert_eq!(*value, 'a');
            key
        }).collect();
        assert_eq!(seen.len(), 10);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 10);
        for key in seen {
            assert!(table.contains_key(key));
        }
    }

    #[test]
    fn growth_loses_nothing() {
        let mut rng = OsRng;
        let mut table: ChainedTable<u32> = ChainedTable::with_exponent(2);
        let mut keys = Vec::new();
        while keys.len() < 2000 {
            let key = rng.try_next_u32().unwrap();
            let capacity = table.capacity();
            if table.insert(key, !key).1 {
                keys.push(key);
            }
            assert!(table.capacity() >= capacity);
            assert_eq!(table.len(), keys.len());
            assert!(table.len() <= crate::growth::max_live(table.capacity()));
        }

        assert!(table.capacity() >= 4096);
        for &key in &keys {
            assert_eq!(table.get(key), Some(&!key));
        }
    }

    #[test]
    fn clear_restores_construction_capacity() {
        let mut table: ChainedTable<u32> = ChainedTable::with_multiplier(3, 0x9E37_79B9);
        for key in 0..40 {
            table.insert(key, key);
        }
        assert!(table.capacity() > 8);

        table.clear();

        assert!(table.is_empty());
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.multiplier(), 0x9E37_79B9);
        assert_eq!(table.begin(), table.end());
    }

    #[test]
    fn stale_locator_reads_nothing() {
        let mut table = colliding();
        let (locator, _) = table.insert(0, 'a');
        table.erase(0);

        assert_eq!(table.entry(locator), None);
    }

    #[test]
    #[should_panic(expected = "does not address a live entry")]
    fn erasing_through_stale_locator_panics() {
        let mut table = colliding();
        let (locator, _) = table.insert(0, 'a');
        table.erase_without_search(locator);
        table.erase_without_search(locator);
    }

    #[cfg(feature = "stats")]
    #[test]
    fn stats_describe_chains() {
        let mut table = colliding();
        for &key in &COLLISION_KEYS[..3] {
            table.insert(key, 'a');
        }
        table.insert(spread_key(5), 'b');

        let stats = table.strategy().debug_stats();
        assert_eq!(stats.populated, 4);
        assert_eq!(stats.capacity, 8);
        assert_eq!(stats.occupied_positions, 2);
        assert_eq!(stats.longest_run, 3);
        assert_eq!(stats.tombstones, 0);

        let histogram = table.strategy().probe_histogram();
        assert_eq!(histogram.bins(), &[6, 1, 0, 1]);
        assert_eq!(histogram.total(), 8);
    }
}
