//! Configuration for building predictors and running an evaluation.
//!
//! Everything here is resolved once at construction. Configurations are
//! usually written as JSON, for example:
//!
//! ```json
//! {
//!   "predictor": {
//!     "kind": "tournament",
//!     "first":  { "kind": "pap", "pattern_bits": 2, "buckets": 1990, "ctr_bits": 3 },
//!     "second": { "kind": "global", "pattern_bits": 10, "ctr_bits": 2 },
//!     "selector_size": 1024,
//!     "ctr_bits": 3
//!   },
//!   "output": "result.out"
//! }
//! ```

use std::path::{ Path, PathBuf };

use serde::{ Deserialize, Serialize };

use crate::error::*;
use crate::predictor::*;

/// The hardware storage budget [in bits] of the reference configuration.
pub const BIT_BUDGET: usize = 33_000;

fn default_bit_budget() -> usize { BIT_BUDGET }

/// Configuration for one of the supported predictors.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictorConfig {
    Global(GlobalConfig),
    #[serde(rename = "pap")]
    PAp(PApConfig),
    Tournament(TournamentConfig),
    Tage(TAGEConfig),
}

impl PredictorConfig {
    /// Number of storage bits the predictor will use.
    pub fn storage_bits(&self) -> usize {
        match self {
            Self::Global(c) => c.storage_bits(),
            Self::PAp(c) => c.storage_bits(),
            Self::Tournament(c) => c.storage_bits(),
            Self::Tage(c) => c.storage_bits(),
        }
    }

    /// Use this configuration to create a new predictor, failing if it does
    /// not fit in `budget` bits.
    pub fn build(self, budget: usize) -> Result<AnyPredictor> {
        Ok(match self {
            Self::Global(c) => c.build(budget)?.into(),
            Self::PAp(c) => c.build(budget)?.into(),
            Self::Tournament(c) => c.build(budget)?.into(),
            Self::Tage(c) => c.build(budget)?.into(),
        })
    }
}

/// The reference configuration: a tournament between a PAp predictor and a
/// global-history predictor.
impl Default for PredictorConfig {
    fn default() -> Self {
        Self::Tournament(TournamentConfig {
            first: Box::new(Self::PAp(PApConfig {
                pattern_bits: 2,
                buckets: 1990,
                ctr_bits: 3,
            })),
            second: Box::new(Self::Global(GlobalConfig {
                pattern_bits: 10,
                ctr_bits: 2,
            })),
            selector_size: 1024,
            ctr_bits: 3,
        })
    }
}

/// Top-level configuration for an evaluation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimConfig {
    /// The predictor under evaluation
    #[serde(default)]
    pub predictor: PredictorConfig,

    /// Storage budget the predictor must fit in
    #[serde(default = "default_bit_budget")]
    pub bit_budget: usize,

    /// Where to write the final statistics
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            predictor: PredictorConfig::default(),
            bit_budget: BIT_BUDGET,
            output: None,
        }
    }
}

impl SimConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json(&s)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_config_is_reference() {
        let cfg = SimConfig::from_json("{}").unwrap();
        assert_eq!(cfg.bit_budget, 33000);
        assert_eq!(cfg.output, None);
        assert_eq!(cfg.predictor.storage_bits(), 32990);
    }

    #[test]
    fn parse_tage() {
        let cfg = SimConfig::from_json(r#"{
            "predictor": {
                "kind": "tage",
                "base": { "kind": "pap", "pattern_bits": 2, "buckets": 256, "ctr_bits": 2 },
                "alpha": 2.0,
                "min_history": 5,
                "history_bits": 80,
                "ctr_bits": 3,
                "tag_bits": 8,
                "index_bits": [9, 9, 9, 9],
                "seed": 7
            },
            "bit_budget": 40000,
            "output": "tage.out"
        }"#).unwrap();

        let PredictorConfig::Tage(tage) = &cfg.predictor else {
            panic!("expected a TAGE configuration");
        };
        assert_eq!(tage.useful_bits, 2);
        assert_eq!(tage.history_lengths(), vec![5, 10, 20, 40]);
        assert_eq!(cfg.predictor.storage_bits(), 512 + 256 * 8 + 80 + 2048 * 13);
        assert_eq!(cfg.output.as_deref(), Some(Path::new("tage.out")));

        let p = cfg.predictor.build(cfg.bit_budget).unwrap();
        assert_eq!(p.name(), "TAGEPredictor");
    }

    #[test]
    fn unknown_kind() {
        let err = SimConfig::from_json(r#"{ "predictor": { "kind": "perceptron" } }"#)
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn reference_tage_plus_tournament_is_over_budget() {
        let cfg = PredictorConfig::Tage(TAGEConfig {
            base: Box::new(PredictorConfig::default()),
            ..TAGEConfig::reference()
        });
        assert!(matches!(cfg.build(BIT_BUDGET),
            Err(Error::BudgetExceeded { .. })));
    }
}
