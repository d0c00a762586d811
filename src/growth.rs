//! Load-factor bookkeeping shared by the hash strategies.

use crate::universal_hash::Key;
use crate::universal_hash::UniversalHash;

/// Numerator of the maximum load factor (`7 / 10`).
pub const MAX_LOAD_NUMERATOR: usize = 7;
/// Denominator of the maximum load factor (`7 / 10`).
pub const MAX_LOAD_DENOMINATOR: usize = 10;

/// Largest live count a table of `capacity` may hold after an insert.
#[inline(always)]
pub fn max_live(capacity: usize) -> usize {
    ((capacity as u128 * MAX_LOAD_NUMERATOR as u128) / MAX_LOAD_DENOMINATOR as u128) as usize
}

/// Hash parameters, live count and construction exponent of a hash table.
///
/// The strategies own the storage; this owns everything that decides where
/// entries go and when the storage has to double.
#[derive(Clone, Debug)]
pub(crate) struct GrowthState {
    hash: UniversalHash,
    initial_exponent: u32,
    live: usize,
}

impl GrowthState {
    pub(crate) fn new(hash: UniversalHash) -> Self {
        Self {
            initial_exponent: hash.exponent(),
            hash,
            live: 0,
        }
    }

    #[inline(always)]
    pub(crate) fn hash(&self, key: Key) -> usize {
        self.hash.hash(key)
    }

    #[inline(always)]
    pub(crate) fn universal_hash(&self) -> &UniversalHash {
        &self.hash
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.hash.capacity()
    }

    #[inline(always)]
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    /// Whether one more insert would push the table past the load factor.
    #[inline(always)]
    pub(crate) fn must_grow(&self) -> bool {
        self.live + 1 > max_live(self.capacity())
    }

    /// Doubles the capacity and zeroes the live count, ready for the caller to
    /// reinsert. Returns the new capacity.
    #[cold]
    pub(crate) fn grow(&mut self) -> usize {
        self.live = 0;
        self.hash.grow()
    }

    /// Back to the construction capacity with no live entries. Returns that
    /// capacity. The multiplier is kept.
    pub(crate) fn reset(&mut self) -> usize {
        self.live = 0;
        self.hash.set_exponent(self.initial_exponent);
        self.capacity()
    }

    #[inline(always)]
    pub(crate) fn inserted(&mut self) {
        self.live += 1;
        debug_assert!(self.live <= max_live(self.capacity()));
    }

    #[inline(always)]
    pub(crate) fn erased(&mut self) {
        debug_assert!(self.live > 0);
        self.live -= 1;
    }
}
