//! A two-level adaptive predictor with a per-address branch history table and
//! per-address pattern history tables (PAp).

use serde::{ Deserialize, Serialize };
use tracing::info;

use crate::Outcome;
use crate::error::*;
use crate::history::*;
use crate::predictor::*;

/// Configuration for a [`PApPredictor`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PApConfig {
    /// Number of local history bits used to index a pattern table
    pub pattern_bits: u32,

    /// Number of per-address buckets [each with a history register and a
    /// pattern table]
    pub buckets: usize,

    /// Width of each saturating counter
    pub ctr_bits: u32,
}
impl PApConfig {
    /// Number of storage bits: every bucket's history register and pattern
    /// table.
    pub fn storage_bits(&self) -> usize {
        let history = (self.pattern_bits as usize).saturating_mul(self.buckets);
        let tables = table_cost(self.pattern_bits, self.ctr_bits as usize)
            .saturating_mul(self.buckets);
        history.saturating_add(tables)
    }

    /// Use this configuration to create a new [`PApPredictor`].
    pub fn build(self, budget: usize) -> Result<PApPredictor> {
        check_counter_bits("PAp counter", self.ctr_bits)?;
        let size = table_entries("PAp pattern", self.pattern_bits)?;
        if self.buckets == 0 {
            return Err(Error::InvalidConfig(
                "PAp predictor needs at least one bucket".to_string()
            ));
        }
        let bits = self.storage_bits();
        check_budget(PApPredictor::NAME, bits, budget)?;
        info!(bits, buckets = self.buckets, "PApPredictor total bits used");

        let bht = vec![HistoryRegister::new(self.pattern_bits as usize);
            self.buckets];
        let pht = vec![PatternTable::new(size, self.ctr_bits); self.buckets];
        Ok(PApPredictor { cfg: self, bht, pht, clk: 0 })
    }
}

/// Output from [`PApPredictor::predict`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PApPrediction {
    pc: u64,
    bucket: usize,
    pattern: usize,
    outcome: Outcome,
    clk: u64,
}
impl PApPrediction {
    /// The bucket selected by the program counter.
    pub fn bucket(&self) -> usize { self.bucket }

    /// The local history pattern used to select a counter.
    pub fn pattern(&self) -> usize { self.pattern }
}
impl Prediction for PApPrediction {
    fn pc(&self) -> u64 { self.pc }
    fn outcome(&self) -> Outcome { self.outcome }
}

/// Predicts each branch from its own history.
///
/// Unrelated branches whose addresses land in the same bucket share a history
/// register and a pattern table.
#[derive(Clone, Debug)]
pub struct PApPredictor {
    cfg: PApConfig,

    /// Branch history table
    bht: Vec<HistoryRegister>,

    /// Pattern history tables
    pht: Vec<PatternTable>,

    clk: u64,
}
impl PApPredictor {
    pub const NAME: &'static str = "PApPredictor";

    pub fn cfg(&self) -> &PApConfig { &self.cfg }

    /// Select a bucket for some program counter value.
    pub fn index(&self, pc: u64) -> usize {
        (pc % self.bht.len() as u64) as usize
    }

    /// The current history pattern for some bucket.
    pub fn pattern(&self, bucket: usize) -> usize {
        self.bht[bucket].low_bits(self.cfg.pattern_bits as usize)
    }
}

impl Predictor for PApPredictor {
    type Prediction = PApPrediction;

    fn name(&self) -> &'static str { Self::NAME }

    fn predict(&self, pc: u64) -> PApPrediction {
        let bucket = self.index(pc);
        let pattern = self.pattern(bucket);
        PApPrediction {
            pc,
            bucket,
            pattern,
            outcome: self.pht[bucket].predict(pattern),
            clk: self.clk,
        }
    }

    fn update(&mut self, prediction: PApPrediction, outcome: Outcome)
        -> Result<()>
    {
        check_generation(prediction.clk, self.clk)?;
        let bucket = prediction.bucket;
        self.pht[bucket].update(prediction.pattern, outcome);
        self.bht[bucket].push(outcome);
        self.clk += 1;
        Ok(())
    }

    fn storage_bits(&self) -> usize {
        let history: usize = self.bht.iter().map(|h| h.len()).sum();
        let tables: usize = self.pht.iter().map(|t| t.storage_bits()).sum();
        history + tables
    }
}
