//! Implementations of different branch predictors.

pub mod table;
pub mod counter;
pub mod pht;
pub mod global;
pub mod pap;
pub mod tournament;
pub mod tage;

pub use table::*;
pub use counter::*;
pub use pht::*;
pub use global::*;
pub use pap::*;
pub use tournament::*;
pub use tage::*;

use crate::Outcome;
use crate::error::*;

/// Output from [`Predictor::predict`].
///
/// A prediction carries whatever transient state the predictor needs in
/// order to train itself, and must be handed back to [`Predictor::update`]
/// before the next prediction is made.
pub trait Prediction {
    /// Program counter value of the predicted branch.
    fn pc(&self) -> u64;

    /// The predicted direction.
    fn outcome(&self) -> Outcome;
}

/// Interface to a predictor with some internal state which is only subject to
/// change by the correct branch outcome.
pub trait Predictor {
    type Prediction: Prediction;

    fn name(&self) -> &'static str;

    /// Predict the direction of the branch at `pc`.
    ///
    /// This never changes the state of the predictor.
    fn predict(&self, pc: u64) -> Self::Prediction;

    /// Consume a prediction and train with the resolved outcome.
    ///
    /// Fails with [`Error::StalePrediction`] when another update has been
    /// committed since the prediction was made.
    fn update(&mut self, prediction: Self::Prediction, outcome: Outcome)
        -> Result<()>;

    /// Number of storage bits used by the predictor.
    fn storage_bits(&self) -> usize;
}

/// Check that a prediction issued at update `issued` is being consumed while
/// the predictor is still at update `issued`.
pub(crate) fn check_generation(issued: u64, current: u64) -> Result<()> {
    if issued != current {
        return Err(Error::StalePrediction { issued, current });
    }
    Ok(())
}

/// One of the supported predictors.
#[derive(Clone, Debug)]
pub enum AnyPredictor {
    Global(GlobalPredictor),
    PAp(PApPredictor),
    Tournament(Box<TournamentPredictor>),
    Tage(Box<TAGEPredictor>),
}

/// A prediction made by an [`AnyPredictor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyPrediction {
    Global(GlobalPrediction),
    PAp(PApPrediction),
    Tournament(TournamentPrediction),
    Tage(TAGEPrediction),
}
impl AnyPrediction {
    /// Name of the kind of predictor that made this prediction.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Global(_) => GlobalPredictor::NAME,
            Self::PAp(_) => PApPredictor::NAME,
            Self::Tournament(_) => TournamentPredictor::NAME,
            Self::Tage(_) => TAGEPredictor::NAME,
        }
    }
}

impl Prediction for AnyPrediction {
    fn pc(&self) -> u64 {
        match self {
            Self::Global(p) => p.pc(),
            Self::PAp(p) => p.pc(),
            Self::Tournament(p) => p.pc(),
            Self::Tage(p) => p.pc(),
        }
    }
    fn outcome(&self) -> Outcome {
        match self {
            Self::Global(p) => p.outcome(),
            Self::PAp(p) => p.outcome(),
            Self::Tournament(p) => p.outcome(),
            Self::Tage(p) => p.outcome(),
        }
    }
}

impl AnyPredictor {
    pub fn as_tournament(&self) -> Option<&TournamentPredictor> {
        match self {
            Self::Tournament(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_tage(&self) -> Option<&TAGEPredictor> {
        match self {
            Self::Tage(p) => Some(p),
            _ => None,
        }
    }
}

impl Predictor for AnyPredictor {
    type Prediction = AnyPrediction;

    fn name(&self) -> &'static str {
        match self {
            Self::Global(p) => p.name(),
            Self::PAp(p) => p.name(),
            Self::Tournament(p) => p.name(),
            Self::Tage(p) => p.name(),
        }
    }

    fn predict(&self, pc: u64) -> AnyPrediction {
        match self {
            Self::Global(p) => AnyPrediction::Global(p.predict(pc)),
            Self::PAp(p) => AnyPrediction::PAp(p.predict(pc)),
            Self::Tournament(p) => AnyPrediction::Tournament(p.predict(pc)),
            Self::Tage(p) => AnyPrediction::Tage(p.predict(pc)),
        }
    }

    fn update(&mut self, prediction: AnyPrediction, outcome: Outcome)
        -> Result<()>
    {
        match (self, prediction) {
            (Self::Global(p), AnyPrediction::Global(x)) => p.update(x, outcome),
            (Self::PAp(p), AnyPrediction::PAp(x)) => p.update(x, outcome),
            (Self::Tournament(p), AnyPrediction::Tournament(x)) => {
                p.update(x, outcome)
            },
            (Self::Tage(p), AnyPrediction::Tage(x)) => p.update(x, outcome),
            (p, x) => Err(Error::MismatchedPrediction {
                expected: p.name(),
                found: x.name(),
            }),
        }
    }

    fn storage_bits(&self) -> usize {
        match self {
            Self::Global(p) => p.storage_bits(),
            Self::PAp(p) => p.storage_bits(),
            Self::Tournament(p) => p.storage_bits(),
            Self::Tage(p) => p.storage_bits(),
        }
    }
}

impl From<GlobalPredictor> for AnyPredictor {
    fn from(p: GlobalPredictor) -> Self { Self::Global(p) }
}
impl From<PApPredictor> for AnyPredictor {
    fn from(p: PApPredictor) -> Self { Self::PAp(p) }
}
impl From<TournamentPredictor> for AnyPredictor {
    fn from(p: TournamentPredictor) -> Self { Self::Tournament(Box::new(p)) }
}
impl From<TAGEPredictor> for AnyPredictor {
    fn from(p: TAGEPredictor) -> Self { Self::Tage(Box::new(p)) }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::BIT_BUDGET;

    fn global() -> AnyPredictor {
        GlobalConfig { pattern_bits: 4, ctr_bits: 2 }.build(BIT_BUDGET)
            .unwrap().into()
    }

    fn pap() -> AnyPredictor {
        PApConfig { pattern_bits: 2, buckets: 16, ctr_bits: 2 }
            .build(BIT_BUDGET).unwrap().into()
    }

    #[test]
    fn rejects_prediction_from_other_variant() {
        let g = global();
        let mut p = pap();
        let err = p.update(g.predict(0x40), Outcome::T).unwrap_err();
        assert!(matches!(err, Error::MismatchedPrediction {
            expected: "PApPredictor", found: "GlobalPredictor"
        }));
    }

    #[test]
    fn rejects_stale_prediction() {
        let mut g = global();
        let first = g.predict(0x40);
        let second = g.predict(0x44);
        g.update(first, Outcome::T).unwrap();
        let err = g.update(second, Outcome::T).unwrap_err();
        assert!(matches!(err,
            Error::StalePrediction { issued: 0, current: 1 }
        ));
    }
}
