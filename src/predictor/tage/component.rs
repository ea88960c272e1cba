
use bitvec::prelude::*;

use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

/// A function used to create an index from (a) a program counter value, and;
/// (b) the slice of global history visible to some component.
///
/// Ideally this is some kind of hash function.
pub type TAGEIndexFn = fn(pc: u64, history: &BitSlice, index_bits: u32) -> usize;

/// A function used to create a tag from a program counter value.
pub type TAGETagFn = fn(pc: u64, tag_bits: u32) -> u64;

/// The default index function: fold the program counter and the history
/// slice down to `index_bits` and XOR them together.
pub fn fold_index(pc: u64, history: &BitSlice, index_bits: u32) -> usize {
    let bits = index_bits as usize;
    fold_bits(pc.view_bits::<Lsb0>(), bits) ^ fold_bits(history, bits)
}

/// The default tag function: truncate the program counter.
pub fn truncate_tag(pc: u64, tag_bits: u32) -> u64 {
    if tag_bits >= u64::BITS {
        pc
    } else {
        pc & ((1 << tag_bits) - 1)
    }
}

/// Container for inputs passed to the components of a [`TAGEPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct TAGEInputs<'a> {
    /// Program counter associated with a predicted branch
    pub pc: u64,

    /// Global history shared by all components
    pub ghr: &'a HistoryRegister,
}

/// An entry in some [TAGEComponent].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TAGEEntry {
    /// State machine tracking a branch outcome
    pub ctr: SaturatingCounter,

    /// The 'useful' counter, used to determine when the entry is
    /// eligible to be invalidated and replaced
    pub useful: SaturatingCounter,

    /// Tag associated with this entry [undefined until first allocated]
    pub tag: Option<u64>,
}
impl TAGEEntry {
    pub fn new(ctr_bits: u32, useful_bits: u32) -> Self {
        Self {
            ctr: SaturatingCounter::new(ctr_bits),
            useful: SaturatingCounter::new(useful_bits),
            tag: None,
        }
    }

    /// Get the current predicted outcome.
    pub fn predict(&self) -> Outcome {
        self.ctr.predict()
    }

    /// Returns true if the provided tag matches this entry.
    pub fn tag_matches(&self, tag: u64) -> bool {
        self.tag == Some(tag)
    }

    /// Returns true for an entry that has low confidence and hasn't yet
    /// proven itself useful.
    pub fn is_unproven(&self) -> bool {
        self.ctr.is_weak() && self.useful.value() == 0
    }

    /// Claim this entry for a new tag, discarding everything learned so far.
    pub fn allocate(&mut self, tag: u64) {
        self.tag = Some(tag);
        let mid = self.ctr.midpoint();
        self.ctr.reset(mid);
        self.useful.clear();
    }
}

/// Configuration for a [`TAGEComponent`].
#[derive(Clone, Debug)]
pub struct TAGEComponentConfig {
    /// Number of index bits [the component has 2^index_bits entries]
    pub index_bits: u32,

    /// Number of global history bits folded into the index
    pub history_len: usize,

    /// Number of tag bits
    pub tag_bits: u32,

    /// Number of bits in the prediction counter
    pub ctr_bits: u32,

    /// Number of bits in the 'useful' counter
    pub useful_bits: u32,

    /// Strategy for indexing into the table
    pub index_fn: TAGEIndexFn,

    /// Strategy for creating tags
    pub tag_fn: TAGETagFn,
}
impl TAGEComponentConfig {
    /// Number of storage bits in a single entry.
    pub fn entry_bits(&self) -> usize {
        (self.tag_bits + self.ctr_bits + self.useful_bits) as usize
    }

    /// Number of storage bits.
    pub fn storage_bits(&self) -> usize {
        table_cost(self.index_bits, self.entry_bits())
    }

    /// Use this configuration to create a new [`TAGEComponent`].
    ///
    /// Callers are expected to have validated the widths.
    pub fn build(self) -> TAGEComponent {
        let entry = TAGEEntry::new(self.ctr_bits, self.useful_bits);
        let data = vec![entry; 1 << self.index_bits];
        TAGEComponent { cfg: self, data }
    }
}

/// A tagged component in the TAGE predictor.
#[derive(Clone, Debug)]
pub struct TAGEComponent {
    pub cfg: TAGEComponentConfig,

    /// Table of entries
    pub data: Vec<TAGEEntry>,
}
impl TAGEComponent {
    pub fn index_mask(&self) -> usize {
        self.data.len() - 1
    }

    pub fn num_useful_entries(&self) -> usize {
        self.data.iter().filter(|e| e.useful.value() != 0).count()
    }

    /// Fraction of entries that have been allocated at least once.
    pub fn utilization(&self) -> f64 {
        let used = self.data.iter().filter(|e| e.tag.is_some()).count();
        used as f64 / self.data.len() as f64
    }

    /// Number of storage bits.
    pub fn storage_bits(&self) -> usize {
        self.data.len() * self.cfg.entry_bits()
    }
}

impl PredictorTable for TAGEComponent {
    type Input<'a> = TAGEInputs<'a>;
    type Entry = TAGEEntry;

    fn size(&self) -> usize { self.data.len() }

    fn get_index(&self, input: TAGEInputs) -> usize {
        let history = input.ghr.slice(self.cfg.history_len);
        (self.cfg.index_fn)(input.pc, history, self.cfg.index_bits)
            & self.index_mask()
    }

    fn get_entry(&self, idx: usize) -> &TAGEEntry {
        &self.data[idx & self.index_mask()]
    }

    fn get_entry_mut(&mut self, idx: usize) -> &mut TAGEEntry {
        let index = idx & self.index_mask();
        &mut self.data[index]
    }
}

impl TaggedPredictorTable for TAGEComponent {
    fn get_tag(&self, input: TAGEInputs) -> u64 {
        (self.cfg.tag_fn)(input.pc, self.cfg.tag_bits)
    }
}
