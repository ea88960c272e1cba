//! A tournament predictor choosing between two sub-predictors with a
//! per-address selector.

use serde::{ Deserialize, Serialize };
use tracing::info;

use crate::Outcome;
use crate::config::PredictorConfig;
use crate::error::*;
use crate::predictor::*;

/// Configuration for a [`TournamentPredictor`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Sub-predictor chosen while the selector counter predicts 'taken'
    pub first: Box<PredictorConfig>,

    /// Sub-predictor chosen otherwise
    pub second: Box<PredictorConfig>,

    /// Number of selector counters
    pub selector_size: usize,

    /// Width of each selector counter
    pub ctr_bits: u32,
}
impl TournamentConfig {
    /// Number of storage bits: both sub-predictors plus the selector table.
    pub fn storage_bits(&self) -> usize {
        self.first.storage_bits()
            .saturating_add(self.second.storage_bits())
            .saturating_add(
                self.selector_size.saturating_mul(self.ctr_bits as usize)
            )
    }

    /// Use this configuration to create a new [`TournamentPredictor`].
    pub fn build(self, budget: usize) -> Result<TournamentPredictor> {
        check_counter_bits("selector counter", self.ctr_bits)?;
        if self.selector_size == 0 {
            return Err(Error::InvalidConfig(
                "tournament selector needs at least one entry".to_string()
            ));
        }
        let bits = self.storage_bits();
        check_budget(TournamentPredictor::NAME, bits, budget)?;

        let first = self.first.build(budget)?;
        let second = self.second.build(budget)?;
        info!(bits, first = first.name(), second = second.name(),
            "TournamentPredictor total bits used");

        Ok(TournamentPredictor {
            first,
            second,
            selector: PatternTable::new(self.selector_size, self.ctr_bits),
            stat: TournamentStats::default(),
            clk: 0,
        })
    }
}

/// Identifies one of the two sub-predictors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Choice { First, Second }

/// How often each sub-predictor was selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TournamentStats {
    pub first: u64,
    pub second: u64,
}
impl TournamentStats {
    pub fn total(&self) -> u64 { self.first + self.second }

    /// Fraction of predictions served by each sub-predictor.
    pub fn shares(&self) -> (f64, f64) {
        let total = self.total() as f64;
        if total == 0.0 {
            return (0.0, 0.0);
        }
        (self.first as f64 / total, self.second as f64 / total)
    }
}

/// Output from [`TournamentPredictor::predict`].
///
/// Holds the predictions from *both* sub-predictors, since both of them are
/// trained regardless of which one was selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TournamentPrediction {
    pc: u64,
    outcome: Outcome,
    choice: Choice,
    first: Box<AnyPrediction>,
    second: Box<AnyPrediction>,
    clk: u64,
}
impl TournamentPrediction {
    /// The sub-predictor whose prediction was used.
    pub fn choice(&self) -> Choice { self.choice }
    pub fn first(&self) -> &AnyPrediction { &self.first }
    pub fn second(&self) -> &AnyPrediction { &self.second }
}
impl Prediction for TournamentPrediction {
    fn pc(&self) -> u64 { self.pc }
    fn outcome(&self) -> Outcome { self.outcome }
}

#[derive(Clone, Debug)]
pub struct TournamentPredictor {
    first: AnyPredictor,
    second: AnyPredictor,

    /// Selector counters, indexed by program counter
    selector: PatternTable,

    pub stat: TournamentStats,

    clk: u64,
}
impl TournamentPredictor {
    pub const NAME: &'static str = "TournamentPredictor";

    pub fn first(&self) -> &AnyPredictor { &self.first }
    pub fn second(&self) -> &AnyPredictor { &self.second }

    /// The selector counter responsible for some program counter value.
    pub fn selector(&self, pc: u64) -> &SaturatingCounter {
        self.selector.get_entry(self.selector_index(pc))
    }

    fn selector_index(&self, pc: u64) -> usize {
        (pc % self.selector.size() as u64) as usize
    }
}

impl Predictor for TournamentPredictor {
    type Prediction = TournamentPrediction;

    fn name(&self) -> &'static str { Self::NAME }

    fn predict(&self, pc: u64) -> TournamentPrediction {
        let first = self.first.predict(pc);
        let second = self.second.predict(pc);
        let (choice, outcome) = match self.selector(pc).predict() {
            Outcome::T => (Choice::First, first.outcome()),
            Outcome::N => (Choice::Second, second.outcome()),
        };
        TournamentPrediction {
            pc,
            outcome,
            choice,
            first: Box::new(first),
            second: Box::new(second),
            clk: self.clk,
        }
    }

    fn update(&mut self, prediction: TournamentPrediction, outcome: Outcome)
        -> Result<()>
    {
        check_generation(prediction.clk, self.clk)?;

        // Move the selector toward whichever sub-predictor was right, but
        // only when the other one was wrong
        let first_hit = prediction.first.outcome() == outcome;
        let second_hit = prediction.second.outcome() == outcome;
        let idx = self.selector_index(prediction.pc);
        let selector = self.selector.get_entry_mut(idx);
        match (first_hit, second_hit) {
            (true, false) => selector.inc(),
            (false, true) => selector.dec(),
            _ => {},
        }

        match prediction.choice {
            Choice::First => self.stat.first += 1,
            Choice::Second => self.stat.second += 1,
        }

        self.first.update(*prediction.first, outcome)?;
        self.second.update(*prediction.second, outcome)?;
        self.clk += 1;
        Ok(())
    }

    fn storage_bits(&self) -> usize {
        self.first.storage_bits()
            + self.second.storage_bits()
            + self.selector.storage_bits()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::BIT_BUDGET;

    const PC: u64 = 0x4000;

    fn global(ctr_bits: u32) -> Box<PredictorConfig> {
        Box::new(PredictorConfig::Global(
            GlobalConfig { pattern_bits: 1, ctr_bits }
        ))
    }

    /// The first sub-predictor learns 'taken' after a single update, the
    /// second one needs four.
    fn fast_and_slow() -> TournamentPredictor {
        TournamentConfig {
            first: global(1),
            second: global(3),
            selector_size: 16,
            ctr_bits: 2,
        }.build(BIT_BUDGET).unwrap()
    }

    fn step(t: &mut TournamentPredictor, outcome: Outcome)
        -> TournamentPrediction
    {
        let prediction = t.predict(PC);
        t.update(prediction.clone(), outcome).unwrap();
        prediction
    }

    #[test]
    fn reference_cost() {
        let cfg = match PredictorConfig::default() {
            PredictorConfig::Tournament(cfg) => cfg,
            _ => unreachable!(),
        };
        assert_eq!(cfg.storage_bits(), 32990);
        let t = cfg.build(BIT_BUDGET).unwrap();
        assert_eq!(t.storage_bits(), 32990);
    }

    #[test]
    fn selector_follows_the_winner() {
        let mut t = fast_and_slow();

        // Both wrong
        for _ in 0..2 {
            let p = step(&mut t, Outcome::T);
            assert_eq!(p.first().outcome(), Outcome::N);
            assert_eq!(p.second().outcome(), Outcome::N);
            assert_eq!(t.selector(PC).value(), 0);
        }

        // Only the first is right
        for expected in [1, 2, 3] {
            let p = step(&mut t, Outcome::T);
            assert_eq!(p.first().outcome(), Outcome::T);
            assert_eq!(p.second().outcome(), Outcome::N);
            assert_eq!(t.selector(PC).value(), expected);
        }

        // Both right
        let p = step(&mut t, Outcome::T);
        assert_eq!(p.choice(), Choice::First);
        assert_eq!(p.second().outcome(), Outcome::T);
        assert_eq!(t.selector(PC).value(), 3);
    }

    #[test]
    fn selector_moves_toward_second() {
        let mut t = TournamentConfig {
            first: global(3),
            second: global(1),
            selector_size: 16,
            ctr_bits: 2,
        }.build(BIT_BUDGET).unwrap();
        let idx = t.selector_index(PC);
        t.selector.get_entry_mut(idx).reset(3);

        step(&mut t, Outcome::T);
        step(&mut t, Outcome::T);
        assert_eq!(t.selector(PC).value(), 3);

        let p = step(&mut t, Outcome::T);
        assert_eq!(p.choice(), Choice::First);
        assert_eq!(p.outcome(), Outcome::N);
        assert_eq!(t.selector(PC).value(), 2);
        assert_eq!(t.stat, TournamentStats { first: 3, second: 0 });
    }

    #[test]
    fn both_sub_predictors_train() {
        let mut t = fast_and_slow();
        for _ in 0..6 {
            step(&mut t, Outcome::T);
        }
        assert_eq!(t.first().predict(PC).outcome(), Outcome::T);
        assert_eq!(t.second().predict(PC).outcome(), Outcome::T);
    }
}
