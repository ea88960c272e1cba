//! A thread-safe context object for running a predictor over a stream of
//! branches.
//!
//! The predictor and its statistics live behind a single lock, which is held
//! across the whole predict/update pair for a branch. Branches reported from
//! several threads are therefore serialized, and every prediction is
//! consumed before the next one is made.

use std::sync::{ Mutex, MutexGuard };

use tracing::debug;

use crate::branch::*;
use crate::config::*;
use crate::error::*;
use crate::predictor::*;
use crate::report::*;
use crate::stats::*;

struct EngineState {
    predictor: AnyPredictor,
    outcomes: OutcomeStats,
    branches: BranchStats,
}

pub struct Engine {
    state: Mutex<EngineState>,
}
impl Engine {
    pub fn new(predictor: impl Into<AnyPredictor>) -> Self {
        let predictor = predictor.into();
        debug!(predictor = predictor.name(), bits = predictor.storage_bits(),
            "created engine");
        Self {
            state: Mutex::new(EngineState {
                predictor,
                outcomes: OutcomeStats::default(),
                branches: BranchStats::new(),
            }),
        }
    }

    /// Build the configured predictor and wrap it in a new engine.
    pub fn from_config(cfg: &SimConfig) -> Result<Self> {
        let predictor = cfg.predictor.clone().build(cfg.bit_budget)?;
        Ok(Self::new(predictor))
    }

    fn lock(&self) -> Result<MutexGuard<'_, EngineState>> {
        self.state.lock().map_err(|_| Error::Poisoned)
    }

    /// Predict the branch at `pc`, then train the predictor with the
    /// resolved outcome. Returns the predicted direction.
    pub fn handle_branch(&self, pc: u64, outcome: impl Into<Outcome>)
        -> Result<Outcome>
    {
        let record = BranchRecord::new(pc, outcome);
        let mut state = self.lock()?;

        let prediction = state.predictor.predict(record.pc);
        let predicted = prediction.outcome();
        state.predictor.update(prediction, record.outcome)?;

        state.outcomes.record(predicted, record.outcome);
        state.branches.record(&record, predicted);
        debug!(pc = format_args!("{:#x}", record.pc),
            predicted = ?predicted, outcome = ?record.outcome, "branch");
        Ok(predicted)
    }

    /// Run every record through [`Engine::handle_branch`].
    pub fn run<'a>(&self, records: impl IntoIterator<Item = &'a BranchRecord>)
        -> Result<()>
    {
        for record in records {
            self.handle_branch(record.pc, record.outcome)?;
        }
        Ok(())
    }

    /// Prediction results so far.
    pub fn outcomes(&self) -> Result<OutcomeStats> {
        Ok(self.lock()?.outcomes)
    }

    /// Snapshot of the statistics gathered so far.
    pub fn report(&self) -> Result<Report> {
        let state = self.lock()?;
        Ok(Report::new(&state.predictor, state.outcomes, &state.branches))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn global() -> Engine {
        let cfg = SimConfig {
            predictor: PredictorConfig::Global(
                GlobalConfig { pattern_bits: 4, ctr_bits: 2 }
            ),
            ..SimConfig::default()
        };
        Engine::from_config(&cfg).unwrap()
    }

    #[test]
    fn counts_every_branch() {
        let e = global();
        assert_eq!(e.handle_branch(0x100, true).unwrap(), Outcome::N);
        e.handle_branch(0x100, Outcome::N).unwrap();
        let o = e.outcomes().unwrap();
        assert_eq!(o.total(), 2);
        assert_eq!(o.taken_incorrect, 1);
        assert_eq!(o.not_taken_correct, 1);
    }

    #[test]
    fn over_budget_config() {
        let cfg = SimConfig { bit_budget: 1000, ..SimConfig::default() };
        assert!(matches!(Engine::from_config(&cfg),
            Err(Error::BudgetExceeded { .. })));
    }

    #[test]
    fn concurrent_branches() {
        let e = Arc::new(global());
        let handles: Vec<_> = (0..4u64).map(|t| {
            let e = Arc::clone(&e);
            thread::spawn(move || {
                for i in 0..250u64 {
                    e.handle_branch(0x1000 + t * 4, i % 3 != 0).unwrap();
                }
            })
        }).collect();
        for h in handles {
            h.join().unwrap();
        }

        let report = e.report().unwrap();
        assert_eq!(report.outcomes.total(), 1000);
        assert_eq!(report.unique_branches, 4);
        assert_eq!(report.predictor, "GlobalPredictor");
    }

    #[test]
    fn poisoned_lock() {
        let e = Arc::new(global());
        let e2 = Arc::clone(&e);
        let _ = thread::spawn(move || {
            let _guard = e2.state.lock().unwrap();
            panic!("poison the engine lock");
        }).join();
        assert!(matches!(e.handle_branch(0x100, true), Err(Error::Poisoned)));
    }
}
