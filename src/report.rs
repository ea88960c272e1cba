//! Final statistics for an evaluation run.

use std::fmt;
use std::path::Path;

use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::error::*;
use crate::predictor::*;
use crate::stats::*;

/// Summary of one tagged component in a [`TAGEPredictor`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentReport {
    pub history_len: usize,
    pub entries: usize,
    pub hits: HitStat,
    pub useful_entries: usize,
    pub utilization: f64,
}

/// Summary of a [`TAGEPredictor`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TAGEReport {
    pub base: HitStat,
    pub components: Vec<ComponentReport>,
    pub alcs: u64,
    pub failed_alcs: u64,
}
impl TAGEReport {
    pub fn new(p: &TAGEPredictor) -> Self {
        let components = p.comp.iter().zip(p.stat.comp.iter())
            .map(|(c, hits)| ComponentReport {
                history_len: c.cfg.history_len,
                entries: c.size(),
                hits: *hits,
                useful_entries: c.num_useful_entries(),
                utilization: c.utilization(),
            })
            .collect();
        Self {
            base: p.stat.base,
            components,
            alcs: p.stat.alcs,
            failed_alcs: p.stat.failed_alcs,
        }
    }
}

/// A mispredicted branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BranchReport {
    pub pc: u64,
    pub hits: HitStat,
}

/// Everything reported at the end of a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub predictor: &'static str,
    pub storage_bits: usize,
    pub outcomes: OutcomeStats,
    pub unique_branches: usize,
    pub worst_branches: Vec<BranchReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tournament: Option<TournamentStats>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tage: Option<TAGEReport>,
}
impl Report {
    /// Number of mispredicted branches listed in a report.
    pub const WORST_BRANCHES: usize = 8;

    pub fn new(p: &AnyPredictor, outcomes: OutcomeStats, branches: &BranchStats)
        -> Self
    {
        let worst_branches = branches.worst_branches(Self::WORST_BRANCHES)
            .into_iter()
            .map(|(pc, hits)| BranchReport { pc, hits })
            .collect();
        Self {
            predictor: p.name(),
            storage_bits: p.storage_bits(),
            outcomes,
            unique_branches: branches.num_unique_branches(),
            worst_branches,
            tournament: p.as_tournament().map(|t| t.stat),
            tage: p.as_tage().map(TAGEReport::new),
        }
    }

    /// Write the text form of this report to a file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "writing report");
        std::fs::write(path, self.to_string())?;
        Ok(())
    }

    /// Write this report to a file as JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "writing JSON report");
        let s = serde_json::to_string_pretty(self)?;
        std::fs::write(path, s)?;
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let o = &self.outcomes;
        writeln!(f, "takenCorrect: {} takenIncorrect: {} notTakenCorrect: {} notTakenIncorrect: {}",
            o.taken_correct, o.taken_incorrect,
            o.not_taken_correct, o.not_taken_incorrect)?;
        writeln!(f, "predictor: {} ({} bits)", self.predictor, self.storage_bits)?;
        writeln!(f, "accuracy: {:.4} ({}/{}) over {} branches",
            o.accuracy(), o.correct(), o.total(), self.unique_branches)?;

        if let Some(t) = &self.tournament {
            let (first, second) = t.shares();
            writeln!(f, "selector: first {} ({:.2}%) second {} ({:.2}%)",
                t.first, first * 100.0, t.second, second * 100.0)?;
        }

        if let Some(t) = &self.tage {
            writeln!(f, "base: {}/{} hits", t.base.correct, t.base.total)?;
            for (idx, c) in t.components.iter().enumerate() {
                writeln!(f, "comp[{}] hist={:3} hits={}/{} useful={}/{} util={:.2}%",
                    idx, c.history_len, c.hits.correct, c.hits.total,
                    c.useful_entries, c.entries, c.utilization * 100.0)?;
            }
            writeln!(f, "allocations: {} failed: {}", t.alcs, t.failed_alcs)?;
        }

        if !self.worst_branches.is_empty() {
            let worst = self.worst_branches.iter()
                .map(|b| format!("{:#x} ({}/{})", b.pc, b.hits.misses(), b.hits.total))
                .join(", ");
            writeln!(f, "worst: {}", worst)?;
        }
        Ok(())
    }
}
