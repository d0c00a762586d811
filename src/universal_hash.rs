//! Multiplicative universal hashing over `u32` keys.
//!
//! A [`UniversalHash`] maps a key to an index in `[0, 2^M)` by taking the top
//! `M` bits of `multiplier * key` modulo `2^32`. The multiplier is drawn once
//! per table from an [`EntropySource`], so an adversary that does not know the
//! multiplier cannot pick a key sequence that collides on purpose.

use rand::RngCore;
use rand::TryRngCore;
use rand::rngs::OsRng;

/// Key type stored by every table in this crate.
pub type Key = u32;

/// Width in bits of the machine word the hash is computed in.
pub const WORD_BITS: u32 = Key::BITS;

/// Capacity exponent used when none is given (capacity `2^10`).
pub const DEFAULT_EXPONENT: u32 = 10;

/// Largest supported capacity exponent.
///
/// Bounded by the hash word width and by what fits in a `usize`.
pub const MAX_EXPONENT: u32 = if usize::BITS > WORD_BITS {
    WORD_BITS
} else {
    usize::BITS - 1
};

/// Fallback multiplier used when no entropy is available. Odd, so every key
/// still maps through a bijection before the shift.
const FALLBACK_MULTIPLIER: u32 = 0x9E37_79B9;

#[inline(always)]
fn assert_exponent(exponent: u32) {
    assert!(
        (1..=MAX_EXPONENT).contains(&exponent),
        "capacity exponent {exponent} out of range 1..={MAX_EXPONENT}"
    );
}

/// A source of hash multipliers.
///
/// Every [`RngCore`] is an entropy source, so a seeded `SmallRng` can be
/// injected to make a table reproducible. [`FixedMultiplier`] pins the
/// multiplier outright, which is how tests force collisions.
pub trait EntropySource {
    /// Draws the next multiplier.
    fn next_multiplier(&mut self) -> u32;
}

impl<R: RngCore + ?Sized> EntropySource for R {
    #[inline]
    fn next_multiplier(&mut self) -> u32 {
        self.next_u32()
    }
}

/// Draws multipliers from the operating system.
///
/// If the OS source fails, a `foldhash` random state is used instead when the
/// `foldhash` feature is enabled, and a fixed odd constant otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEntropy;

impl EntropySource for ProcessEntropy {
    fn next_multiplier(&mut self) -> u32 {
        let mut rng = OsRng;
        match rng.try_next_u32() {
            Ok(multiplier) => multiplier,
            Err(_) => fallback_multiplier(),
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        #[cold]
        fn fallback_multiplier() -> u32 {
            use core::hash::BuildHasher;

            foldhash::fast::RandomState::default().hash_one(FALLBACK_MULTIPLIER) as u32
        }
    } else {
        #[cold]
        fn fallback_multiplier() -> u32 {
            FALLBACK_MULTIPLIER
        }
    }
}

/// Always yields the same multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedMultiplier(pub u32);

impl EntropySource for FixedMultiplier {
    #[inline]
    fn next_multiplier(&mut self) -> u32 {
        self.0
    }
}

/// A member of the multiplicative hash family, fixed to one multiplier and one
/// capacity exponent.
///
/// # Examples
///
/// ```rust
/// use unihash_tables::universal_hash::UniversalHash;
///
/// // With multiplier 2^29 and 8 buckets, small keys hash to themselves.
/// let hash = UniversalHash::new(3, 1 << 29);
/// assert_eq!(hash.capacity(), 8);
/// for key in 0..8 {
///     assert_eq!(hash.hash(key), key as usize);
/// }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniversalHash {
    multiplier: u32,
    exponent: u32,
}

impl UniversalHash {
    /// Creates a hash with an explicit multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `exponent` is not in `1..=MAX_EXPONENT`.
    pub fn new(exponent: u32, multiplier: u32) -> Self {
        assert_exponent(exponent);
        Self {
            multiplier,
            exponent,
        }
    }

    /// Creates a hash whose multiplier is drawn once from `source`.
    ///
    /// # Panics
    ///
    /// Panics if `exponent` is not in `1..=MAX_EXPONENT`.
    pub fn from_entropy<E: EntropySource + ?Sized>(exponent: u32, source: &mut E) -> Self {
        Self::new(exponent, source.next_multiplier())
    }

    /// Maps `key` to an index in `0..self.capacity()`.
    #[inline(always)]
    pub fn hash(&self, key: Key) -> usize {
        (self.multiplier.wrapping_mul(key) >> (WORD_BITS - self.exponent)) as usize
    }

    /// The random parameter of this hash.
    #[inline]
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Capacity exponent `M`.
    #[inline]
    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    /// Number of distinct indices, `2^M`.
    #[inline]
    pub fn capacity(&self) -> usize {
        1usize << self.exponent
    }

    /// Doubles the index range, keeping the multiplier. Returns the new
    /// capacity.
    ///
    /// # Panics
    ///
    /// Panics if the exponent is already [`MAX_EXPONENT`].
    pub(crate) fn grow(&mut self) -> usize {
        assert!(self.exponent < MAX_EXPONENT, "table capacity overflow");
        self.exponent += 1;
        self.capacity()
    }

    /// Resets the exponent, keeping the multiplier.
    pub(crate) fn set_exponent(&mut self, exponent: u32) {
        assert_exponent(exponent);
        self.exponent = exponent;
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn identity_multiplier_maps_small_keys_to_themselves() {
        let hash = UniversalHash::new(3, 1 << (WORD_BITS - 3));
        for key in 0..8 {
            assert_eq!(hash.hash(key), key as usize);
        }
        // Wraps past the word width.
        assert_eq!(hash.hash(8), 0);
    }

    #[test]
    fn unit_multiplier_collides_small_keys() {
        let hash = UniversalHash::new(3, 1);
        for key in 0..6 {
            assert_eq!(hash.hash(key), 0);
        }
        assert_eq!(hash.hash(1 << (WORD_BITS - 3)), 1);
        assert_eq!(hash.hash(5 << (WORD_BITS - 3)), 5);
    }

    #[test]
    fn hash_stays_in_range() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for exponent in [1, 3, 10, 17, MAX_EXPONENT] {
            let hash = UniversalHash::from_entropy(exponent, &mut rng);
            for _ in 0..1000 {
                let key: Key = rng.random();
                assert!(hash.hash(key) < hash.capacity());
            }
        }
    }

    #[test]
    fn grow_keeps_multiplier() {
        let mut hash = UniversalHash::new(4, 0xDEAD_BEEF);
        assert_eq!(hash.grow(), 32);
        assert_eq!(hash.exponent(), 5);
        assert_eq!(hash.multiplier(), 0xDEAD_BEEF);

        hash.set_exponent(2);
        assert_eq!(hash.capacity(), 4);
        assert_eq!(hash.multiplier(), 0xDEAD_BEEF);
    }

    #[test]
    fn fixed_source_is_deterministic() {
        let a = UniversalHash::from_entropy(6, &mut FixedMultiplier(77));
        let b = UniversalHash::from_entropy(6, &mut FixedMultiplier(77));
        assert_eq!(a, b);
        assert_eq!(a.multiplier(), 77);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a = UniversalHash::from_entropy(10, &mut SmallRng::seed_from_u64(42));
        let b = UniversalHash::from_entropy(10, &mut SmallRng::seed_from_u64(42));
        assert_eq!(a.multiplier(), b.multiplier());
    }

    #[test]
    fn process_entropy_draws() {
        // Two draws agreeing is astronomically unlikely but not impossible, so
        // only check that drawing works.
        let hash = UniversalHash::from_entropy(DEFAULT_EXPONENT, &mut ProcessEntropy);
        assert_eq!(hash.capacity(), 1024);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn zero_exponent_is_rejected() {
        let _hash = UniversalHash::new(0, 1);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn growth_past_word_width_panics() {
        let mut hash = UniversalHash::new(MAX_EXPONENT, 1);
        hash.grow();
    }
}
