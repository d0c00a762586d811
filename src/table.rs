//! The generic table contract and the wrapper that dispatches through it.
//!
//! A [`TableStrategy`] supplies the storage-specific primitives: `find`,
//! `insert_without_search`, `erase_without_search` and locator traversal.
//! [`Table`] layers the checked operations on top, so `insert` never creates a
//! duplicate key and `erase` takes a key instead of a locator.
//!
//! # Locators
//!
//! Every strategy hands out a `Copy` locator naming an entry's position in its
//! backing array. A locator is only meaningful until the next mutating call on
//! the same table: growth rehashes everything into a new array, and erasing
//! or inserting may shift neighbours. Re-`find` after mutating.

use core::fmt;
use core::fmt::Debug;
use core::fmt::Display;
use core::iter::FusedIterator;

use crate::universal_hash::EntropySource;
use crate::universal_hash::FixedMultiplier;
use crate::universal_hash::Key;
use crate::universal_hash::ProcessEntropy;
use crate::universal_hash::UniversalHash;

/// Storage primitives behind a [`Table`].
///
/// Implementors need not guard against duplicate keys in
/// [`insert_without_search`](TableStrategy::insert_without_search); the
/// wrapper only calls it after a `find` miss.
pub trait TableStrategy {
    /// Value stored alongside each key.
    type Value;
    /// Position of an entry in the backing storage.
    type Locator: Copy + Eq + Debug;

    /// Locates the live entry for `key`.
    fn find(&self, key: Key) -> Option<Self::Locator>;

    /// Stores a new entry for `key`, which must not be present.
    fn insert_without_search(&mut self, key: Key, value: Self::Value) -> Self::Locator;

    /// Removes the live entry at `locator`.
    ///
    /// # Panics
    ///
    /// Panics if `locator` does not address a live entry.
    fn erase_without_search(&mut self, locator: Self::Locator);

    /// Locator of the first live entry, or [`end`](TableStrategy::end) when
    /// there is none.
    fn begin(&self) -> Self::Locator;

    /// Past-the-end sentinel.
    fn end(&self) -> Self::Locator;

    /// Locator of the next live entry after `locator`, or
    /// [`end`](TableStrategy::end).
    fn advance(&self, locator: Self::Locator) -> Self::Locator;

    /// The entry at `locator`, if it addresses a live one.
    fn entry(&self, locator: Self::Locator) -> Option<(Key, &Self::Value)>;

    /// Mutable access to the value at `locator`, if it addresses a live entry.
    fn entry_mut(&mut self, locator: Self::Locator) -> Option<(Key, &mut Self::Value)>;

    /// Drops every entry.
    fn clear(&mut self);

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Whether there are no live entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A strategy that places entries with a [`UniversalHash`].
pub trait HashStrategy: TableStrategy {
    /// Empty table sized and hashed by `hash`.
    fn with_hash(hash: UniversalHash) -> Self;

    /// The hash currently in use.
    fn universal_hash(&self) -> &UniversalHash;

    /// Number of buckets or slots.
    fn capacity(&self) -> usize {
        self.universal_hash().capacity()
    }
}

/// Position of an entry in an array-backed strategy; the end sentinel is the
/// entry count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexLocator(pub(crate) usize);

impl IndexLocator {
    /// Array index this locator points at.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A key-value table over any [`TableStrategy`].
///
/// # Examples
///
/// ```rust
/// use unihash_tables::ProbingTable;
///
/// let mut table = ProbingTable::new();
/// let (locator, inserted) = table.insert(7, "seven");
/// assert!(inserted);
///
/// let (again, inserted) = table.insert(7, "SEVEN");
/// assert!(!inserted);
/// assert_eq!(locator, again);
/// assert_eq!(table.get(7), Some(&"seven"));
///
/// assert!(table.erase(7));
/// assert!(!table.erase(7));
/// assert!(table.is_empty());
/// ```
#[derive(Clone)]
pub struct Table<S> {
    strategy: S,
}

impl<S: TableStrategy> Table<S> {
    /// Wraps an existing strategy.
    pub fn from_strategy(strategy: S) -> Self {
        Self { strategy }
    }

    /// The underlying strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Inserts `value` under `key` unless the key is already present.
    ///
    /// Returns the entry's locator and whether a new entry was created. When
    /// the key exists the table is left untouched and `value` is dropped.
    pub fn insert(&mut self, key: Key, value: S::Value) -> (S::Locator, bool) {
        if let Some(locator) = self.strategy.find(key) {
            return (locator, false);
        }
        (self.strategy.insert_without_search(key, value), true)
    }

    /// Removes `key`. Returns `false` if it was not present.
    pub fn erase(&mut self, key: Key) -> bool {
        match self.strategy.find(key) {
            Some(locator) => {
                self.strategy.erase_without_search(locator);
                true
            }
            None => false,
        }
    }

    /// Removes the entry at a locator obtained since the last mutation.
    ///
    /// # Panics
    ///
    /// Panics if `locator` does not address a live entry.
    pub fn erase_without_search(&mut self, locator: S::Locator) {
        self.strategy.erase_without_search(locator);
    }

    /// Locates `key`.
    pub fn find(&self, key: Key) -> Option<S::Locator> {
        self.strategy.find(key)
    }

    /// The value stored under `key`.
    pub fn get(&self, key: Key) -> Option<&S::Value> {
        let locator = self.strategy.find(key)?;
        self.strategy.entry(locator).map(|(_, value)| value)
    }

    /// Mutable access to the value stored under `key`.
    pub fn get_mut(&mut self, key: Key) -> Option<&mut S::Value> {
        let locator = self.strategy.find(key)?;
        self.strategy.entry_mut(locator).map(|(_, value)| value)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: Key) -> bool {
        self.strategy.find(key).is_some()
    }

    /// The entry at `locator`, if it addresses a live one.
    pub fn entry(&self, locator: S::Locator) -> Option<(Key, &S::Value)> {
        self.strategy.entry(locator)
    }

    /// Mutable access to the entry at `locator`.
    pub fn entry_mut(&mut self, locator: S::Locator) -> Option<(Key, &mut S::Value)> {
        self.strategy.entry_mut(locator)
    }

    /// Locator of the first live entry.
    pub fn begin(&self) -> S::Locator {
        self.strategy.begin()
    }

    /// Past-the-end sentinel.
    pub fn end(&self) -> S::Locator {
        self.strategy.end()
    }

    /// Locator following `locator` in iteration order.
    pub fn advance(&self, locator: S::Locator) -> S::Locator {
        self.strategy.advance(locator)
    }

    /// Iterates over live entries in the strategy's order.
    pub fn iter(&self) -> Iter<'_, S> {
        Iter {
            strategy: &self.strategy,
            cursor: self.strategy.begin(),
            end: self.strategy.end(),
            remaining: self.strategy.len(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.strategy.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.strategy.is_empty()
    }

    /// Drops every entry. Hash tables also return to the capacity they were
    /// constructed with.
    pub fn clear(&mut self) {
        self.strategy.clear();
    }
}

impl<S: TableStrategy + Default> Table<S> {
    /// Creates an empty table with the strategy's defaults.
    pub fn new() -> Self {
        Self::from_strategy(S::default())
    }
}

impl<S: TableStrategy + Default> Default for Table<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: HashStrategy> Table<S> {
    /// Creates a table of capacity `2^exponent` with an OS-drawn multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `exponent` is zero or exceeds
    /// [`MAX_EXPONENT`](crate::universal_hash::MAX_EXPONENT).
    pub fn with_exponent(exponent: u32) -> Self {
        Self::with_entropy(exponent, &mut ProcessEntropy)
    }

    /// Creates a table of capacity `2^exponent` drawing its multiplier from
    /// `source`.
    ///
    /// ```rust
    /// use rand::SeedableRng;
    /// use rand::rngs::SmallRng;
    /// use unihash_tables::ChainedTable;
    ///
    /// let mut rng = SmallRng::seed_from_u64(7);
    /// let a: ChainedTable<()> = ChainedTable::with_entropy(4, &mut rng);
    /// let mut rng = SmallRng::seed_from_u64(7);
    /// let b: ChainedTable<()> = ChainedTable::with_entropy(4, &mut rng);
    /// assert_eq!(a.multiplier(), b.multiplier());
    /// assert_eq!(a.capacity(), 16);
    /// ```
    pub fn with_entropy<E: EntropySource + ?Sized>(exponent: u32, source: &mut E) -> Self {
        Self::from_strategy(S::with_hash(UniversalHash::from_entropy(exponent, source)))
    }

    /// Creates a table with a fixed multiplier, for reproducible layouts.
    pub fn with_multiplier(exponent: u32, multiplier: u32) -> Self {
        Self::with_entropy(exponent, &mut FixedMultiplier(multiplier))
    }

    /// Number of buckets or slots.
    pub fn capacity(&self) -> usize {
        self.strategy.capacity()
    }

    /// Current capacity exponent.
    pub fn exponent(&self) -> u32 {
        self.strategy.universal_hash().exponent()
    }

    /// The hash multiplier drawn at construction.
    pub fn multiplier(&self) -> u32 {
        self.strategy.universal_hash().multiplier()
    }
}

impl<S> Debug for Table<S>
where
    S: TableStrategy,
    S::Value: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// One `(key, value)` line per live entry, in iteration order.
impl<S> Display for Table<S>
where
    S: TableStrategy,
    S::Value: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            writeln!(f, "({key}, {value})")?;
        }
        Ok(())
    }
}

impl<'a, S: TableStrategy> IntoIterator for &'a Table<S> {
    type Item = (Key, &'a S::Value);
    type IntoIter = Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the live entries of a [`Table`].
///
/// Created by [`Table::iter`].
pub struct Iter<'a, S: TableStrategy> {
    strategy: &'a S,
    cursor: S::Locator,
    end: S::Locator,
    remaining: usize,
}

impl<'a, S: TableStrategy> Iterator for Iter<'a, S> {
    type Item = (Key, &'a S::Value);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == self.end {
            return None;
        }

        let strategy: &'a S = self.strategy;
        let entry = strategy.entry(self.cursor);
        debug_assert!(entry.is_some(), "cursor {:?} is not live", self.cursor);
        self.cursor = strategy.advance(self.cursor);
        self.remaining = self.remaining.saturating_sub(1);
        entry
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<S: TableStrategy> ExactSizeIterator for Iter<'_, S> {}

impl<S: TableStrategy> FusedIterator for Iter<'_, S> {}
