//! Types for implementing a table of predictors.

use crate::error::*;

/// Interface to a table of predictors.
pub trait PredictorTable {
    /// The type of input to the table used to form an index.
    type Input<'a>;

    /// The type of entry in the table.
    type Entry;

    /// Returns the number of entries in the table.
    fn size(&self) -> usize;

    /// Given some input, return the corresponding index into the table.
    fn get_index(&self, input: Self::Input<'_>) -> usize;

    /// Returns a reference to an entry in the table.
    fn get_entry(&self, idx: usize) -> &Self::Entry;

    /// Returns a mutable reference to an entry in the table.
    fn get_entry_mut(&mut self, idx: usize) -> &mut Self::Entry;
}

/// Interface to a *tagged* table of predictors.
pub trait TaggedPredictorTable: PredictorTable {
    fn get_tag(&self, input: Self::Input<'_>) -> u64;
}

/// Number of entries in a table addressed by `bits` index bits.
///
/// Tables wider than 2^24 entries are rejected outright; no reachable budget
/// accommodates them.
pub fn table_entries(what: &str, bits: u32) -> Result<usize> {
    if bits == 0 || bits > 24 {
        return Err(Error::InvalidConfig(
            format!("{what} must be between 1 and 24 bits (got {bits})")
        ));
    }
    Ok(1 << bits)
}

/// Storage cost of a table with `2^bits` entries of `entry_bits` each.
/// Saturates instead of overflowing so that absurd configurations are still
/// caught by the budget check.
pub fn table_cost(bits: u32, entry_bits: usize) -> usize {
    1usize.checked_shl(bits)
        .map_or(usize::MAX, |n| n.saturating_mul(entry_bits))
}
