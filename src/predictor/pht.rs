//! Implementation of a pattern history table (PHT).

use crate::Outcome;
use crate::predictor::*;

/// A table of [SaturatingCounter] indexed [modulo its size] by some key.
///
/// Depending on the owner, the key is a history pattern (Global, PAp) or a
/// program counter value (the Tournament selector).
#[derive(Clone, Debug)]
pub struct PatternTable {
    /// Table of counters
    data: Vec<SaturatingCounter>,
}
impl PatternTable {
    /// Create a table of `size` counters, each `ctr_bits` wide.
    ///
    /// Callers are expected to have validated `size` and `ctr_bits`.
    pub fn new(size: usize, ctr_bits: u32) -> Self {
        debug_assert!(size > 0);
        Self { data: vec![SaturatingCounter::new(ctr_bits); size] }
    }

    /// Number of storage bits.
    pub fn storage_bits(&self) -> usize {
        self.data.len() * self.data[0].bits() as usize
    }

    /// Predicted direction for some key.
    pub fn predict(&self, key: usize) -> Outcome {
        self.get_entry(self.get_index(key)).predict()
    }

    /// Move the counter selected by some key toward the provided outcome.
    pub fn update(&mut self, key: usize, outcome: Outcome) {
        let idx = self.get_index(key);
        self.get_entry_mut(idx).update(outcome);
    }
}

impl PredictorTable for PatternTable {
    type Input<'a> = usize;
    type Entry = SaturatingCounter;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, key: usize) -> usize {
        key % self.data.len()
    }

    fn get_entry(&self, idx: usize) -> &SaturatingCounter {
        &self.data[idx % self.data.len()]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut SaturatingCounter {
        let len = self.data.len();
        &mut self.data[idx % len]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keys_wrap_around() {
        let mut pht = PatternTable::new(10, 2);
        pht.update(13, Outcome::T);
        pht.update(3, Outcome::T);
        assert_eq!(pht.get_entry(3).value(), 2);
        assert_eq!(pht.predict(23), Outcome::T);
        assert_eq!(pht.predict(4), Outcome::N);
        assert_eq!(pht.storage_bits(), 20);
    }
}
