use alloc::vec::Vec;

use crate::growth::GrowthState;
use crate::table::HashStrategy;
use crate::table::TableStrategy;
use crate::universal_hash::DEFAULT_EXPONENT;
use crate::universal_hash::Key;
use crate::universal_hash::ProcessEntropy;
use crate::universal_hash::UniversalHash;

/// One position of the slot array.
///
/// A tombstone keeps its payload: erasing only relabels the slot. The payload
/// is dropped when the slot is reused or the table is repacked.
#[derive(Clone, Debug)]
enum Slot<V> {
    Empty,
    Occupied(Key, V),
    Tombstone(Key, V),
}

impl<V> Slot<V> {
    #[inline(always)]
    fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(..))
    }

    #[cfg(any(test, feature = "stats"))]
    #[inline(always)]
    fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone(..))
    }
}

fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || Slot::Empty);
    slots
}

/// Position of an entry in an [`OpenAddressing`] table. The end sentinel is
/// the capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotLocator(usize);

impl SlotLocator {
    /// Slot index this locator points at.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Hash table resolving collisions by quadratic probing over a single slot
/// array.
///
/// Step `s` of the probe sequence for a key visits
/// `(hash(key) + s²) mod capacity`. With a power-of-two capacity this sequence
/// is not guaranteed to reach every slot, so an insert whose sequence runs out
/// of non-occupied slots forces a repack and tries again.
///
/// Erasing leaves a tombstone. Lookups walk past tombstones and stop at the
/// first never-used slot; inserts may reuse a tombstone.
#[derive(Clone, Debug)]
pub struct OpenAddressing<V> {
    slots: Vec<Slot<V>>,
    state: GrowthState,
}

impl<V> Default for OpenAddressing<V> {
    fn default() -> Self {
        Self::with_hash(UniversalHash::from_entropy(
            DEFAULT_EXPONENT,
            &mut ProcessEntropy,
        ))
    }
}

impl<V> OpenAddressing<V> {
    /// Slot visited at `step` of a probe sequence starting at `base`.
    ///
    /// # Panics
    ///
    /// Panics if the slot array is empty.
    #[inline(always)]
    fn probe(&self, base: usize, step: usize) -> usize {
        let capacity = self.slots.len();
        assert!(capacity != 0, "probe on a zero-capacity table");
        base.wrapping_add(step.wrapping_mul(step)) & (capacity - 1)
    }

    fn probe_sequence(&self, key: Key) -> impl Iterator<Item = usize> + '_ {
        let base = self.state.hash(key);
        (0..self.slots.len()).map(move |step| self.probe(base, step))
    }

    /// First slot on `key`'s probe sequence that holds no live entry.
    fn vacant_slot(&self, key: Key) -> Option<usize> {
        self.probe_sequence(key)
            .find(|&index| !self.slots[index].is_occupied())
    }

    /// Stores an entry without consulting the load factor, repacking for as
    /// long as the probe sequence offers no room.
    fn place(&mut self, key: Key, value: V) -> SlotLocator {
        loop {
            if let Some(index) = self.vacant_slot(key) {
                self.slots[index] = Slot::Occupied(key, value);
                self.state.inserted();
                return SlotLocator(index);
            }
            self.repack();
        }
    }

    /// Doubles the slot array and reinserts live entries. Tombstones are not
    /// carried over.
    #[cold]
    fn repack(&mut self) {
        let capacity = self.state.grow();
        let old = core::mem::replace(&mut self.slots, empty_slots(capacity));
        for slot in old {
            if let Slot::Occupied(key, value) = slot {
                self.place(key, value);
            }
        }
    }

    fn settle(&self, from: usize) -> SlotLocator {
        let index = self.slots[from.min(self.slots.len())..]
            .iter()
            .position(Slot::is_occupied)
            .map_or(self.slots.len(), |offset| from + offset);
        SlotLocator(index)
    }

    /// Computes table statistics.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> crate::stats::DebugStats {
        let capacity = self.slots.len();
        let populated = self.state.live();
        let occupied = self.slots.iter().filter(|s| s.is_occupied()).count();
        let tombstones = self.slots.iter().filter(|s| s.is_tombstone()).count();
        let longest = self.probe_steps().max().unwrap_or(0);

        crate::stats::DebugStats {
            populated,
            capacity,
            exponent: self.state.universal_hash().exponent(),
            max_live: crate::growth::max_live(capacity),
            load_factor: populated as f64 / capacity as f64,
            occupied_positions: occupied,
            tombstones,
            longest_run: longest,
            total_bytes: self.slots.capacity() * core::mem::size_of::<Slot<V>>(),
        }
    }

    /// Counts live entries by the probe step they were placed at: bin `n`
    /// holds the number of keys found after `n` collisions.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> crate::stats::Histogram {
        let mut bins = alloc::vec![0usize; 1];
        for step in self.probe_steps() {
            if step >= bins.len() {
                bins.resize(step + 1, 0);
            }
            bins[step] += 1;
        }
        crate::stats::Histogram::new("probe step", bins)
    }

    #[cfg(feature = "stats")]
    fn probe_steps(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| match slot {
            Slot::Occupied(key, _) => self.probe_sequence(*key).position(|i| i == index),
            _ => None,
        })
    }
}

impl<V> TableStrategy for OpenAddressing<V> {
    type Value = V;
    type Locator = SlotLocator;

    fn find(&self, key: Key) -> Option<SlotLocator> {
        for index in self.probe_sequence(key) {
            match &self.slots[index] {
                Slot::Occupied(k, _) if *k == key => return Some(SlotLocator(index)),
                Slot::Empty => return None,
                Slot::Occupied(..) | Slot::Tombstone(..) => {}
            }
        }
        None
    }

    fn insert_without_search(&mut self, key: Key, value: V) -> SlotLocator {
        if self.state.must_grow() {
            self.repack();
        }
        self.place(key, value)
    }

    fn erase_without_search(&mut self, locator: SlotLocator) {
        let Some(slot) = self.slots.get_mut(locator.0).filter(|s| s.is_occupied()) else {
            panic!("{locator:?} does not address a live entry");
        };

        *slot = match core::mem::replace(slot, Slot::Empty) {
            Slot::Occupied(key, value) => Slot::Tombstone(key, value),
            other => other,
        };
        self.state.erased();
    }

    fn begin(&self) -> SlotLocator {
        self.settle(0)
    }

    fn end(&self) -> SlotLocator {
        SlotLocator(self.slots.len())
    }

    fn advance(&self, locator: SlotLocator) -> SlotLocator {
        self.settle(locator.0.saturating_add(1))
    }

    fn entry(&self, locator: SlotLocator) -> Option<(Key, &V)> {
        match self.slots.get(locator.0)? {
            Slot::Occupied(key, value) => Some((*key, value)),
            _ => None,
        }
    }

    fn entry_mut(&mut self, locator: SlotLocator) -> Option<(Key, &mut V)> {
        match self.slots.get_mut(locator.0)? {
            Slot::Occupied(key, value) => Some((*key, value)),
            _ => None,
        }
    }

    fn clear(&mut self) {
        let capacity = self.state.reset();
        self.slots = empty_slots(capacity);
    }

    fn len(&self) -> usize {
        self.state.live()
    }
}

impl<V> HashStrategy for OpenAddressing<V> {
    fn with_hash(hash: UniversalHash) -> Self {
        Self {
            slots: empty_slots(hash.capacity()),
            state: GrowthState::new(hash),
        }
    }

    fn universal_hash(&self) -> &UniversalHash {
        self.state.universal_hash()
    }
}
