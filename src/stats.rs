//! Helpers for collecting statistics.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use crate::branch::*;

/// A count of predictions and how many of them were correct.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HitStat {
    pub total: u64,
    pub correct: u64,
}
impl HitStat {
    pub fn record(&mut self, hit: bool) {
        self.total += 1;
        if hit { self.correct += 1; }
    }

    pub fn misses(&self) -> u64 { self.total - self.correct }

    /// Fraction of correct predictions [zero when nothing was recorded].
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Prediction results split by the resolved direction of each branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeStats {
    pub taken_correct: u64,
    pub taken_incorrect: u64,
    pub not_taken_correct: u64,
    pub not_taken_incorrect: u64,
}
impl OutcomeStats {
    pub fn record(&mut self, predicted: Outcome, actual: Outcome) {
        let hit = predicted == actual;
        match (actual, hit) {
            (Outcome::T, true) => self.taken_correct += 1,
            (Outcome::T, false) => self.taken_incorrect += 1,
            (Outcome::N, true) => self.not_taken_correct += 1,
            (Outcome::N, false) => self.not_taken_incorrect += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.taken_correct + self.taken_incorrect
            + self.not_taken_correct + self.not_taken_incorrect
    }

    pub fn correct(&self) -> u64 {
        self.taken_correct + self.not_taken_correct
    }

    pub fn accuracy(&self) -> f64 {
        HitStat { total: self.total(), correct: self.correct() }.accuracy()
    }
}

/// Per-branch statistics, indexed by program counter value.
#[derive(Clone, Debug, Default)]
pub struct BranchStats {
    data: BTreeMap<u64, HitStat>,
}
impl BranchStats {
    pub fn new() -> Self { Self::default() }

    pub fn record(&mut self, record: &BranchRecord, predicted: Outcome) {
        self.data.entry(record.pc)
            .or_default()
            .record(predicted == record.outcome);
    }

    pub fn get(&self, pc: u64) -> Option<&HitStat> {
        self.data.get(&pc)
    }

    /// Number of unique observed branches.
    pub fn num_unique_branches(&self) -> usize {
        self.data.len()
    }

    /// The `n` branches with the most mispredictions, worst first.
    pub fn worst_branches(&self, n: usize) -> Vec<(u64, HitStat)> {
        self.data.iter()
            .filter(|(_, s)| s.misses() != 0)
            .sorted_by(|x, y| y.1.misses().cmp(&x.1.misses()).then(x.0.cmp(y.0)))
            .take(n)
            .map(|(pc, s)| (*pc, *s))
            .collect()
    }
}
