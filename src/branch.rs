//! Types for representing branches and branch outcomes.

use serde::{ Deserialize, Serialize };

/// A branch outcome.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize)]
pub enum Outcome {
    /// Not taken
    N = 0,
    /// Taken
    T = 1
}

impl Outcome {
    /// Returns true if this outcome is 'taken'.
    pub fn is_taken(self) -> bool { matches!(self, Self::T) }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::T => "t",
            Self::N => "n",
        };
        write!(f, "{}", s)
    }
}

impl std::ops::Not for Outcome {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::N => Self::T,
            Self::T => Self::N,
        }
    }
}

impl From<bool> for Outcome {
    fn from(x: bool) -> Self {
        match x {
            true => Self::T,
            false => Self::N
        }
    }
}

impl From<Outcome> for bool {
    fn from(x: Outcome) -> Self {
        match x {
            Outcome::T => true,
            Outcome::N => false,
        }
    }
}

/// A record of one dynamically executed conditional branch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BranchRecord {
    /// The program counter value for this branch
    pub pc: u64,

    /// The outcome evaluated for this branch
    pub outcome: Outcome,
}
impl BranchRecord {
    pub fn new(pc: u64, outcome: impl Into<Outcome>) -> Self {
        Self { pc, outcome: outcome.into() }
    }
}
