//! Shared helpers for the integration tests.

#![allow(dead_code)]

use arbor::*;

/// Four branches at distinct addresses, resolved taken, taken, not-taken and
/// not-taken, in program order.
pub const PROGRAM: [(u64, Outcome); 4] = [
    (0x4000, Outcome::T),
    (0x4004, Outcome::T),
    (0x4008, Outcome::N),
    (0x400c, Outcome::N),
];

/// Run [`PROGRAM`] `reps` times, returning the accuracy measured after the
/// first `warmup` repetitions.
pub fn program_accuracy(p: &mut AnyPredictor, reps: usize, warmup: usize) -> f64 {
    let mut hits = HitStat::default();
    for rep in 0..reps {
        for (pc, outcome) in PROGRAM {
            let prediction = p.predict(pc);
            let predicted = prediction.outcome();
            p.update(prediction, outcome).unwrap();
            if rep >= warmup {
                hits.record(predicted == outcome);
            }
        }
    }
    hits.accuracy()
}

pub fn global(pattern_bits: u32, ctr_bits: u32) -> PredictorConfig {
    PredictorConfig::Global(GlobalConfig { pattern_bits, ctr_bits })
}

pub fn pap(pattern_bits: u32, buckets: usize, ctr_bits: u32) -> PredictorConfig {
    PredictorConfig::PAp(PApConfig { pattern_bits, buckets, ctr_bits })
}
