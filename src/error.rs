//! Error types.
//!
//! Only construction and protocol misuse can fail. Once a predictor has been
//! built, lookups and counter updates are total: saturation and modular
//! indexing absorb every reachable input.

use thiserror::Error;

/// Errors reported by predictor construction, the predict/update protocol,
/// and the surrounding engine plumbing.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration needs more storage than the hardware budget allows.
    #[error("{name} requires {required} bits, exceeding the {budget}-bit budget")]
    BudgetExceeded {
        name: &'static str,
        required: usize,
        budget: usize,
    },

    /// A configuration describes a table or counter that cannot exist.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A prediction was consumed after the predictor had already moved on.
    #[error("stale prediction (issued at update {issued}, predictor is at update {current})")]
    StalePrediction { issued: u64, current: u64 },

    /// A prediction was handed to a different kind of predictor.
    #[error("prediction from {found} cannot update {expected}")]
    MismatchedPrediction {
        expected: &'static str,
        found: &'static str,
    },

    /// Another thread panicked while holding the engine lock.
    #[error("engine lock poisoned")]
    Poisoned,

    /// A trace line could not be parsed.
    #[error("trace line {line}: {reason}")]
    Trace { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fail with [`Error::BudgetExceeded`] when `required` is over `budget`.
pub fn check_budget(name: &'static str, required: usize, budget: usize)
    -> Result<()>
{
    if required > budget {
        return Err(Error::BudgetExceeded { name, required, budget });
    }
    Ok(())
}
