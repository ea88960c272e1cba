//! A two-level predictor with one global history register and one shared
//! pattern history table.

use serde::{ Deserialize, Serialize };
use tracing::info;

use crate::Outcome;
use crate::error::*;
use crate::history::*;
use crate::predictor::*;

/// Configuration for a [`GlobalPredictor`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Number of history bits used to index the pattern table
    pub pattern_bits: u32,

    /// Width of each saturating counter
    pub ctr_bits: u32,
}
impl GlobalConfig {
    /// Number of storage bits: the history register plus the pattern table.
    pub fn storage_bits(&self) -> usize {
        table_cost(self.pattern_bits, self.ctr_bits as usize)
            .saturating_add(self.pattern_bits as usize)
    }

    /// Use this configuration to create a new [`GlobalPredictor`].
    pub fn build(self, budget: usize) -> Result<GlobalPredictor> {
        check_counter_bits("global counter", self.ctr_bits)?;
        let size = table_entries("global pattern", self.pattern_bits)?;
        let bits = self.storage_bits();
        check_budget(GlobalPredictor::NAME, bits, budget)?;
        info!(bits, "GlobalPredictor total bits used");

        Ok(GlobalPredictor {
            ghr: HistoryRegister::new(self.pattern_bits as usize),
            pht: PatternTable::new(size, self.ctr_bits),
            cfg: self,
            clk: 0,
        })
    }
}

/// Output from [`GlobalPredictor::predict`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalPrediction {
    pc: u64,
    pattern: usize,
    outcome: Outcome,
    clk: u64,
}
impl GlobalPrediction {
    /// The history pattern used to select a counter.
    pub fn pattern(&self) -> usize { self.pattern }
}
impl Prediction for GlobalPrediction {
    fn pc(&self) -> u64 { self.pc }
    fn outcome(&self) -> Outcome { self.outcome }
}

/// Predicts every branch from the same global history.
#[derive(Clone, Debug)]
pub struct GlobalPredictor {
    cfg: GlobalConfig,
    ghr: HistoryRegister,
    pht: PatternTable,
    clk: u64,
}
impl GlobalPredictor {
    pub const NAME: &'static str = "GlobalPredictor";

    pub fn cfg(&self) -> &GlobalConfig { &self.cfg }
    pub fn history(&self) -> &HistoryRegister { &self.ghr }

    fn pattern(&self) -> usize {
        self.ghr.low_bits(self.cfg.pattern_bits as usize)
    }
}

impl Predictor for GlobalPredictor {
    type Prediction = GlobalPrediction;

    fn name(&self) -> &'static str { Self::NAME }

    fn predict(&self, pc: u64) -> GlobalPrediction {
        let pattern = self.pattern();
        GlobalPrediction {
            pc,
            pattern,
            outcome: self.pht.predict(pattern),
            clk: self.clk,
        }
    }

    fn update(&mut self, prediction: GlobalPrediction, outcome: Outcome)
        -> Result<()>
    {
        check_generation(prediction.clk, self.clk)?;
        self.pht.update(prediction.pattern, outcome);
        self.ghr.push(outcome);
        self.clk += 1;
        Ok(())
    }

    fn storage_bits(&self) -> usize {
        self.ghr.len() + self.pht.storage_bits()
    }
}
