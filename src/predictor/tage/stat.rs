
use serde::Serialize;

use crate::predictor::TAGEProvider;
use crate::stats::HitStat;

/// Container for [TAGEPredictor](crate::predictor::TAGEPredictor) runtime
/// stats.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TAGEStats {
    /// Predictions where no tagged component matched
    pub base: HitStat,

    /// Predictions provided by each tagged component
    pub comp: Vec<HitStat>,

    /// All predictions
    pub overall: HitStat,

    /// Successful allocations
    pub alcs: u64,

    /// Failed allocations [each of which ages the 'useful' counters]
    pub failed_alcs: u64,
}
impl TAGEStats {
    pub fn new(num_comp: usize) -> Self {
        Self {
            comp: vec![HitStat::default(); num_comp],
            ..Default::default()
        }
    }

    /// Record the result of a prediction made by some provider.
    pub fn record(&mut self, provider: TAGEProvider, hit: bool) {
        match provider {
            TAGEProvider::Base => self.base.record(hit),
            TAGEProvider::Tagged(idx) => self.comp[idx].record(hit),
        }
        self.overall.record(hit);
    }
}
