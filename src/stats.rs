//! Statistics for inspecting hash table layout.

use alloc::vec::Vec;

/// Debug statistics for hash table analysis.
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live entries
    pub populated: usize,
    /// Number of buckets or slots
    pub capacity: usize,
    /// Capacity exponent
    pub exponent: u32,
    /// Live entries allowed before the next insert repacks
    pub max_live: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Non-empty buckets (chaining) or occupied slots (open addressing)
    pub occupied_positions: usize,
    /// Tombstoned slots; always zero for chaining
    pub tombstones: usize,
    /// Longest chain (chaining) or largest probe step of a live key (open
    /// addressing)
    pub longest_run: usize,
    /// Heap bytes held by the backing storage
    pub total_bytes: usize,
}

impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor, repack above {})",
            self.populated,
            self.capacity,
            self.load_factor * 100.0,
            self.max_live
        );
        println!(
            "Capacity: 2^{} ({} occupied positions, {} tombstones)",
            self.exponent, self.occupied_positions, self.tombstones
        );
        println!("Longest run: {}", self.longest_run);
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// A histogram over small non-negative integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    label: &'static str,
    bins: Vec<usize>,
}

impl Histogram {
    pub(crate) fn new(label: &'static str, bins: Vec<usize>) -> Self {
        Self { label, bins }
    }

    /// What the bin index measures.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Count per bin.
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    /// Sum over all bins.
    pub fn total(&self) -> usize {
        self.bins.iter().sum()
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("{} histogram: empty", self.label);
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("{} histogram ({} total):", self.label, self.total());

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            let partial = match units % 8 {
                1 => Some('▏'),
                2 => Some('▎'),
                3 => Some('▍'),
                4 => Some('▌'),
                5 => Some('▋'),
                6 => Some('▊'),
                7 => Some('▉'),
                _ => None,
            };
            bar.extend(partial);
            bar
        };

        let width = self.bins.len().saturating_sub(1).to_string().len();
        for (i, &count) in self.bins.iter().enumerate() {
            println!("{i:>width$} | {} ({count})", make_bar(count));
        }
    }
}
