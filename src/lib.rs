//! Budgeted conditional branch predictors: global-history, per-address
//! (PAp), tournament and TAGE designs, plus the plumbing needed to evaluate
//! them against branch traces.

pub mod branch;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod predictor;
pub mod report;
pub mod stats;
pub mod trace;

pub use branch::*;
pub use config::*;
pub use engine::*;
pub use error::{ Error, Result };
pub use history::*;
pub use predictor::*;
pub use report::*;
pub use stats::*;
pub use trace::*;
