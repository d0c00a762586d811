#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod universal_hash;

pub mod growth;

pub mod table;

/// Hash table with separate chaining.
///
/// Each bucket is a list of entries headed by the most recent insert.
pub mod separate_chaining;

/// Hash table with open addressing and quadratic probing.
pub mod open_addressing;

/// Table kept in insertion order and scanned linearly.
pub mod unsorted_table;

/// Table kept sorted by key and binary-searched.
pub mod sorted_table;

#[cfg(feature = "stats")]
pub mod stats;

pub use open_addressing::OpenAddressing;
pub use open_addressing::SlotLocator;
pub use separate_chaining::ChainLocator;
pub use separate_chaining::SeparateChaining;
pub use sorted_table::SortedArray;
pub use table::HashStrategy;
pub use table::IndexLocator;
pub use table::Table;
pub use table::TableStrategy;
pub use universal_hash::EntropySource;
pub use universal_hash::Key;
pub use universal_hash::UniversalHash;
pub use unsorted_table::UnsortedArray;

/// Hash table resolving collisions by separate chaining.
pub type ChainedTable<V> = Table<SeparateChaining<V>>;

/// Hash table resolving collisions by quadratic probing.
pub type ProbingTable<V> = Table<OpenAddressing<V>>;

/// Table that appends and scans linearly.
pub type UnsortedTable<V> = Table<UnsortedArray<V>>;

/// Table kept ordered by key.
pub type SortedTable<V> = Table<SortedArray<V>>;
