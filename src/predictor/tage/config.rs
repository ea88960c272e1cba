
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{ Deserialize, Serialize };
use tracing::info;

use crate::config::PredictorConfig;
use crate::error::*;
use crate::history::*;
use crate::predictor::*;

fn default_useful_bits() -> u32 { 2 }
fn default_index_fn() -> TAGEIndexFn { fold_index }
fn default_tag_fn() -> TAGETagFn { truncate_tag }

/// Configuration for a [`TAGEPredictor`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TAGEConfig {
    /// Fallback predictor, consulted when no tagged component matches
    pub base: Box<PredictorConfig>,

    /// Ratio between the history lengths of neighbouring components
    pub alpha: f64,

    /// History length of the first [shortest] tagged component
    pub min_history: usize,

    /// Length of the global history register
    pub history_bits: usize,

    /// Number of bits in each prediction counter
    pub ctr_bits: u32,

    /// Number of tag bits
    pub tag_bits: u32,

    /// Number of bits in each 'useful' counter
    #[serde(default = "default_useful_bits")]
    pub useful_bits: u32,

    /// Number of index bits for each tagged component, ordered from the
    /// shortest to the longest history length
    pub index_bits: Vec<u32>,

    /// Seed for choosing between allocation candidates
    #[serde(default)]
    pub seed: u64,

    /// Strategy for indexing into the tagged components
    #[serde(skip, default = "default_index_fn")]
    pub index_fn: TAGEIndexFn,

    /// Strategy for creating tags
    #[serde(skip, default = "default_tag_fn")]
    pub tag_fn: TAGETagFn,
}
impl TAGEConfig {
    /// A configuration that fits in the reference budget: a Global(10, 2)
    /// fallback and four 512-entry components with history lengths
    /// 4, 12, 36 and 108.
    pub fn reference() -> Self {
        Self {
            base: Box::new(PredictorConfig::Global(
                GlobalConfig { pattern_bits: 10, ctr_bits: 2 }
            )),
            alpha: 3.0,
            min_history: 4,
            history_bits: 128,
            ctr_bits: 3,
            tag_bits: 8,
            useful_bits: default_useful_bits(),
            index_bits: vec![9, 9, 9, 9],
            seed: 0,
            index_fn: fold_index,
            tag_fn: truncate_tag,
        }
    }

    /// History length of each tagged component: `min_history * alpha^i`,
    /// truncated to the length of the global history register.
    pub fn history_lengths(&self) -> Vec<usize> {
        (0..self.index_bits.len())
            .map(|i| self.min_history as f64 * self.alpha.powi(i as i32))
            .map(|len| (len as usize).min(self.history_bits))
            .collect()
    }

    /// Configurations for each tagged component, shortest history first.
    pub fn components(&self) -> Vec<TAGEComponentConfig> {
        self.index_bits.iter().zip(self.history_lengths())
            .map(|(index_bits, history_len)| TAGEComponentConfig {
                index_bits: *index_bits,
                history_len,
                tag_bits: self.tag_bits,
                ctr_bits: self.ctr_bits,
                useful_bits: self.useful_bits,
                index_fn: self.index_fn,
                tag_fn: self.tag_fn,
            })
            .collect()
    }

    pub fn total_entries(&self) -> usize {
        self.index_bits.iter()
            .map(|bits| 1usize.checked_shl(*bits).unwrap_or(usize::MAX))
            .fold(0, usize::saturating_add)
    }

    /// Number of storage bits: the fallback predictor, the global history
    /// register and every tagged component.
    pub fn storage_bits(&self) -> usize {
        self.components().iter()
            .map(|c| c.storage_bits())
            .fold(self.base.storage_bits(), usize::saturating_add)
            .saturating_add(self.history_bits)
    }

    fn validate(&self) -> Result<()> {
        if self.index_bits.is_empty() {
            return Err(Error::InvalidConfig(
                "TAGE needs at least one tagged component".to_string()
            ));
        }
        if !self.alpha.is_finite() || self.alpha < 1.0 {
            return Err(Error::InvalidConfig(
                format!("TAGE alpha must be at least 1.0 (got {})", self.alpha)
            ));
        }
        if self.min_history == 0 || self.history_bits == 0 {
            return Err(Error::InvalidConfig(
                "TAGE history lengths must be non-zero".to_string()
            ));
        }
        if self.tag_bits == 0 || self.tag_bits > 32 {
            return Err(Error::InvalidConfig(
                format!("TAGE tags must be between 1 and 32 bits (got {})",
                    self.tag_bits)
            ));
        }
        check_counter_bits("TAGE counter", self.ctr_bits)?;
        check_counter_bits("TAGE useful counter", self.useful_bits)?;
        for bits in self.index_bits.iter() {
            table_entries("TAGE component index", *bits)?;
        }
        Ok(())
    }

    /// Use this configuration to create a new [`TAGEPredictor`], seeding the
    /// allocation policy from [`TAGEConfig::seed`].
    pub fn build(self, budget: usize) -> Result<TAGEPredictor> {
        let rng = StdRng::seed_from_u64(self.seed);
        self.build_with_rng(budget, rng)
    }

    /// Use this configuration to create a new [`TAGEPredictor`] with the
    /// provided source of randomness.
    pub fn build_with_rng(self, budget: usize, rng: StdRng)
        -> Result<TAGEPredictor>
    {
        self.validate()?;
        let bits = self.storage_bits();
        check_budget(TAGEPredictor::NAME, bits, budget)?;

        let base = self.base.as_ref().clone().build(budget)?;
        let comp: Vec<TAGEComponent> = self.components().into_iter()
            .map(|c| c.build())
            .collect();
        info!(bits, components = comp.len(),
            history = ?self.history_lengths(),
            "TAGEPredictor total bits used");

        Ok(TAGEPredictor {
            stat: TAGEStats::new(comp.len()),
            ghr: HistoryRegister::new(self.history_bits),
            cfg: self,
            base,
            comp,
            rng,
            clk: 0,
        })
    }
}
