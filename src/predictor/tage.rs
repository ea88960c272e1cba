//! Implementation of a "Tagged GEometric history length" (TAGE) predictor.

pub mod component;
pub mod stat;
pub mod config;

pub use component::*;
pub use stat::*;
pub use config::*;

use itertools::Itertools;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::trace;

use crate::Outcome;
use crate::error::*;
use crate::history::*;
use crate::predictor::*;

/// Identifies a particular component in a [`TAGEPredictor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TAGEProvider {
    /// The base [fallback] predictor
    Base,

    /// A tagged component
    Tagged(usize),
}

/// Container for output from [`TAGEPredictor::predict`], including the
/// predicted outcome and other metadata about how the prediction was made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TAGEPrediction {
    pc: u64,

    /// The predicted direction
    outcome: Outcome,

    /// The component providing the prediction
    pub provider: TAGEProvider,

    /// Direction predicted by the provider [which may have been overruled]
    pub provider_outcome: Outcome,

    /// The index identifying the entry used to make this prediction
    /// (zero when provided by the base predictor)
    pub idx: usize,

    /// Alternate component used to provide a prediction
    pub alt_provider: TAGEProvider,

    /// Predicted direction from the alternate component
    pub alt_outcome: Outcome,

    /// The index identifying the entry from the alternate component
    /// (zero when provided by the base predictor)
    pub alt_idx: usize,

    /// Whether the provider was passed over for the alternate
    alt_used: bool,

    /// Prediction made by the base predictor, which is always trained
    base: Box<AnyPrediction>,

    clk: u64,
}
impl TAGEPrediction {
    /// Returns true when the provider was passed over for the alternate.
    pub fn used_alt(&self) -> bool { self.alt_used }
}
impl Prediction for TAGEPrediction {
    fn pc(&self) -> u64 { self.pc }
    fn outcome(&self) -> Outcome { self.outcome }
}

/// The "TAgged GEometric history length" predictor.
///
/// Tagged components are stored in order of increasing history length, so
/// the component with the longest history is always the last one.
///
/// See the following:
///  - "A case for (partially) TAgged GEometric history length branch prediction"
///  (Seznec, 2006).
#[derive(Clone, Debug)]
pub struct TAGEPredictor {
    /// The configuration used to create this object
    pub cfg: TAGEConfig,

    pub stat: TAGEStats,

    /// Base [fallback] predictor
    pub base: AnyPredictor,

    /// Tagged components
    pub comp: Vec<TAGEComponent>,

    /// Global history shared by all tagged components
    pub ghr: HistoryRegister,

    /// Source of randomness for choosing between allocation candidates
    rng: StdRng,

    clk: u64,
}
impl TAGEPredictor {
    pub const NAME: &'static str = "TAGEPredictor";

    /// Return the number of tagged components.
    pub fn num_tagged_components(&self) -> usize {
        self.comp.len()
    }

    /// Return the index of the tagged component with the longest associated
    /// history length.
    pub fn longest_tagged_component(&self) -> usize {
        self.num_tagged_components() - 1
    }

    /// Index and tag for the given program counter value in every tagged
    /// component, at the current global history.
    pub fn lookup(&self, pc: u64) -> Vec<(usize, u64)> {
        let input = TAGEInputs { pc, ghr: &self.ghr };
        self.comp.iter()
            .map(|c| (c.get_index(input), c.get_tag(input)))
            .collect()
    }

    /// Given a program counter value and the provider of an incorrect
    /// prediction, try to allocate an entry in a component with a longer
    /// history. When no entry is eligible, age the 'useful' counters of every
    /// entry selected by this program counter instead.
    fn alloc(&mut self, pc: u64, provider: TAGEProvider) {
        // Only components with a longer history than the provider are
        // eligible, and there are none when the provider has the longest.
        let start = match provider {
            TAGEProvider::Base => 0,
            TAGEProvider::Tagged(idx) => idx + 1,
        };
        if start >= self.comp.len() {
            return;
        }

        // A component is only eligible when the entry associated with this
        // program counter has its 'useful' bits set to zero.
        let lookup = self.lookup(pc);
        let candidates = (start..self.comp.len())
            .filter(|c| {
                let (idx, _) = lookup[*c];
                self.comp[*c].get_entry(idx).useful.value() == 0
            })
            .take(2)
            .collect_vec();

        // When choosing between two candidates, the one with the longer
        // history is picked with probability 1/3.
        let choice = match candidates.as_slice() {
            [] => {
                trace!(pc, "no TAGE allocation candidate, aging entries");
                for (comp, (idx, _)) in self.comp.iter_mut().zip(lookup.iter()) {
                    comp.get_entry_mut(*idx).useful.dec();
                }
                self.stat.failed_alcs += 1;
                return;
            },
            [only] => *only,
            [shorter, longer, ..] => {
                if self.rng.gen_ratio(1, 3) { *longer } else { *shorter }
            },
        };

        let (idx, tag) = lookup[choice];
        self.comp[choice].get_entry_mut(idx).allocate(tag);
        self.stat.alcs += 1;
        trace!(pc, comp = choice, idx, tag, "allocated TAGE entry");
    }
}

impl Predictor for TAGEPredictor {
    type Prediction = TAGEPrediction;

    fn name(&self) -> &'static str { Self::NAME }

    /// Make a prediction for the provided program counter value.
    ///
    /// The matching component with the longest history provides the
    /// prediction, and the next matching component [or the base predictor]
    /// is the alternate. A provider entry that is weak and has never been
    /// useful is passed over for the alternate.
    fn predict(&self, pc: u64) -> TAGEPrediction {
        let base = self.base.predict(pc);
        let base_outcome = base.outcome();
        let mut result = TAGEPrediction {
            pc,
            outcome: base_outcome,
            provider: TAGEProvider::Base,
            provider_outcome: base_outcome,
            idx: 0,
            alt_provider: TAGEProvider::Base,
            alt_outcome: base_outcome,
            alt_idx: 0,
            alt_used: false,
            base: Box::new(base),
            clk: self.clk,
        };

        // Find the two longest-history components that yield a match
        let lookup = self.lookup(pc);
        let mut hits = self.comp.iter().zip(lookup).enumerate().rev()
            .filter_map(|(comp_idx, (comp, (idx, tag)))| {
                let entry = comp.get_entry(idx);
                entry.tag_matches(tag).then_some((comp_idx, idx, entry))
            });

        let Some((comp_idx, idx, entry)) = hits.next() else {
            return result;
        };
        if let Some((alt_comp_idx, alt_idx, alt_entry)) = hits.next() {
            result.alt_provider = TAGEProvider::Tagged(alt_comp_idx);
            result.alt_outcome = alt_entry.predict();
            result.alt_idx = alt_idx;
        }

        result.provider = TAGEProvider::Tagged(comp_idx);
        result.provider_outcome = entry.predict();
        result.idx = idx;
        result.alt_used = entry.is_unproven();
        result.outcome = if result.alt_used {
            result.alt_outcome
        } else {
            result.provider_outcome
        };
        result
    }

    /// Given a particular prediction and the resolved outcome, update the
    /// state of the predictor.
    fn update(&mut self, prediction: TAGEPrediction, outcome: Outcome)
        -> Result<()>
    {
        check_generation(prediction.clk, self.clk)?;

        // The 'useful' counter only moves when the provider disagreed with
        // the alternate.
        if let TAGEProvider::Tagged(comp_idx) = prediction.provider {
            let entry = self.comp[comp_idx].get_entry_mut(prediction.idx);
            if prediction.provider_outcome != prediction.alt_outcome {
                if prediction.provider_outcome == outcome {
                    entry.useful.inc();
                } else {
                    entry.useful.dec();
                }
            }
            entry.ctr.update(outcome);
        }

        self.base.update(*prediction.base, outcome)?;

        let hit = prediction.outcome == outcome;
        self.stat.record(prediction.provider, hit);
        if !hit {
            self.alloc(prediction.pc, prediction.provider);
        }

        self.ghr.push(outcome);
        self.clk += 1;
        Ok(())
    }

    fn storage_bits(&self) -> usize {
        let comp: usize = self.comp.iter().map(|c| c.storage_bits()).sum();
        self.base.storage_bits() + self.ghr.len() + comp
    }
}
