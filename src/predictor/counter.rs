//! Implementation of a saturating counter.

use crate::Outcome;
use crate::error::*;

/// Reject counter widths that don't fit in the backing [u8].
pub fn check_counter_bits(what: &str, bits: u32) -> Result<()> {
    if bits == 0 || bits > 8 {
        return Err(Error::InvalidConfig(
            format!("{what} must be between 1 and 8 bits (got {bits})")
        ));
    }
    Ok(())
}

/// An N-bit unsigned saturating counter used to follow the behavior of a
/// branch.
///
/// The value always lies in `[0, 2^N - 1]`. Values in the upper half predict
/// 'taken'. Incrementing at the maximum and decrementing at zero are no-ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounter {
    bits: u32,
    ctr: u8,
}
impl SaturatingCounter {
    /// Create a counter with the given width, initialized to zero.
    ///
    /// Widths are checked when a predictor configuration is built
    /// (see [check_counter_bits]).
    pub fn new(bits: u32) -> Self {
        debug_assert!((1..=8).contains(&bits));
        Self { bits, ctr: 0 }
    }

    /// Number of storage bits.
    pub fn bits(&self) -> u32 { self.bits }

    /// The current value.
    pub fn value(&self) -> u8 { self.ctr }

    /// The largest representable value.
    pub fn max(&self) -> u8 { ((1u16 << self.bits) - 1) as u8 }

    /// The smallest value that predicts 'taken'.
    pub fn midpoint(&self) -> u8 { 1 << (self.bits - 1) }

    pub fn inc(&mut self) {
        if self.ctr < self.max() {
            self.ctr += 1;
        }
    }

    pub fn dec(&mut self) {
        self.ctr = self.ctr.saturating_sub(1);
    }

    /// Force the counter to some value [clamped into range].
    pub fn reset(&mut self, val: u8) {
        self.ctr = val.min(self.max());
    }

    pub fn clear(&mut self) { self.ctr = 0; }

    /// Return the current predicted direction.
    pub fn predict(&self) -> Outcome {
        Outcome::from(self.ctr >= self.midpoint())
    }

    /// Returns true when the counter sits on either side of the midpoint.
    pub fn is_weak(&self) -> bool {
        let mid = self.midpoint();
        self.ctr == mid || self.ctr == mid - 1
    }

    /// Move the counter toward the provided outcome.
    pub fn update(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::T => self.inc(),
            Outcome::N => self.dec(),
        }
    }
}
