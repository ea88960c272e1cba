
use bitvec::prelude::*;
use std::ops::Range;

use crate::Outcome;

/// A shift register of branch outcomes.
///
/// Bit 0 is the most recent outcome. Pushing a new outcome moves every bit
/// one place toward the end of the register and discards the oldest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRegister {
    data: BitVec<usize, Lsb0>,
}

// NOTE: This *reverses* the all of the bits and presents them in a format
// where the leftmost bit is the most-significant (index n) and the rightmost
// bit is the least-significant (index 0).
impl std::fmt::Display for HistoryRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let x: String = self.data.as_bitslice().iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect();
        write!(f, "{}", x)
    }
}

impl HistoryRegister {
    /// Create a register with the specified length in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(len: usize) -> Self {
        Self { data: bitvec![usize, Lsb0; 0; len] }
    }

    pub fn len(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }
    pub fn data(&self) -> &BitSlice { self.data.as_bitslice() }

    /// Shift in a new outcome.
    pub fn push(&mut self, outcome: Outcome) {
        if self.data.is_empty() {
            return;
        }
        self.data.shift_right(1);
        self.data.set(0, outcome.into());
    }

    /// Return the most recent `len` bits [or the whole register if it is
    /// shorter than that].
    pub fn slice(&self, len: usize) -> &BitSlice {
        &self.data[..len.min(self.data.len())]
    }

    /// Return the most recent `n` bits as an integer, most recent outcome in
    /// the least-significant position.
    pub fn low_bits(&self, n: usize) -> usize {
        let slice = self.slice(n.min(usize::BITS as usize));
        if slice.is_empty() { 0 } else { slice.load_le::<usize>() }
    }

    /// Fold [with XOR] some slice of bits.
    pub fn fold(&self, range: Range<usize>, output_bits: usize) -> usize {
        fold_bits(&self.data[range], output_bits)
    }
}

/// Fold a slice of bits down to `output_bits` by XOR'ing together
/// consecutive `output_bits`-wide chunks.
pub fn fold_bits<T: BitStore>(bits: &BitSlice<T, Lsb0>, output_bits: usize)
    -> usize
{
    assert!(output_bits > 0 && output_bits < usize::BITS as usize);
    let output_mask = (1 << output_bits) - 1;
    let res = bits.chunks(output_bits)
        .fold(0, |res, x| res ^ x.load_le::<usize>());
    res & output_mask
}
