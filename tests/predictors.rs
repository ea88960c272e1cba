//! End-to-end behavior of each predictor variant.

mod common;

use arbor::*;
use common::*;
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case::global(global(4, 2), 2)]
#[case::global_3bit(global(4, 3), 2)]
#[case::pap(pap(2, 64, 2), 2)]
#[case::tournament(PredictorConfig::default(), 10)]
#[case::tage(PredictorConfig::Tage(TAGEConfig::reference()), 10)]
fn learns_repeating_program(#[case] cfg: PredictorConfig, #[case] warmup: usize) {
    let mut p = cfg.build(BIT_BUDGET).unwrap();
    let accuracy = program_accuracy(&mut p, 100, warmup);
    assert!(accuracy >= 0.95, "{} reached {:.3}", p.name(), accuracy);
}

#[test]
fn tournament_selects_per_address() {
    // A single bit of global history can't tell the taken branches from the
    // not-taken ones that follow them, so only the not-taken branches stay
    // with the global predictor.
    let cfg = PredictorConfig::Tournament(TournamentConfig {
        first: Box::new(pap(2, 64, 2)),
        second: Box::new(global(1, 2)),
        selector_size: 64,
        ctr_bits: 2,
    });
    let mut p = cfg.build(BIT_BUDGET).unwrap();
    let accuracy = program_accuracy(&mut p, 100, 10);
    assert!(accuracy >= 0.95, "reached {:.3}", accuracy);

    let t = p.as_tournament().unwrap();
    for (pc, outcome) in PROGRAM {
        let expected = match outcome {
            Outcome::T => Choice::First,
            Outcome::N => Choice::Second,
        };
        assert_eq!(t.predict(pc).choice(), expected, "pc {:#x}", pc);
    }
    assert_eq!(t.stat.total(), 400);
}

#[test]
fn tage_allocates_on_mispredictions() {
    let mut p = PredictorConfig::Tage(TAGEConfig::reference())
        .build(BIT_BUDGET).unwrap();
    program_accuracy(&mut p, 20, 0);
    let tage = p.as_tage().unwrap();
    assert!(tage.stat.alcs > 0);
    assert_eq!(tage.stat.overall.total, 80);
    assert_eq!(
        tage.stat.base.total + tage.stat.comp.iter().map(|s| s.total).sum::<u64>(),
        80,
    );
}

#[rstest]
#[case::global(global(10, 2), 2058)]
#[case::pap(pap(2, 1990, 3), 27860)]
#[case::tournament(PredictorConfig::default(), 32990)]
#[case::tage(PredictorConfig::Tage(TAGEConfig::reference()), 28810)]
fn reference_costs(#[case] cfg: PredictorConfig, #[case] bits: usize) {
    assert_eq!(cfg.storage_bits(), bits);
    assert!(bits <= BIT_BUDGET);
    let p = cfg.build(BIT_BUDGET).unwrap();
    assert_eq!(p.storage_bits(), bits);
}

#[test]
fn budget_is_checked_at_construction() {
    let err = global(16, 2).build(BIT_BUDGET).unwrap_err();
    assert!(matches!(err, Error::BudgetExceeded {
        name: "GlobalPredictor", required: 131088, budget: 33000,
    }));
    assert!(global(16, 2).build(200_000).is_ok());
}

fn any_config() -> impl Strategy<Value = PredictorConfig> {
    prop_oneof![
        (1u32..=10, 1u32..=3).prop_map(|(h, c)| global(h, c)),
        (1u32..=4, 1usize..=128, 1u32..=3).prop_map(|(h, b, c)| pap(h, b, c)),
        Just(PredictorConfig::default()),
        Just(PredictorConfig::Tage(TAGEConfig::reference())),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn storage_bits_do_not_drift(
        cfg in any_config(),
        stream in prop::collection::vec((0u64..64, any::<bool>()), 0..200),
    ) {
        let expected = cfg.storage_bits();
        let mut p = cfg.build(BIT_BUDGET).unwrap();
        prop_assert_eq!(p.storage_bits(), expected);
        for (pc, taken) in stream {
            let prediction = p.predict(pc * 4);
            p.update(prediction, Outcome::from(taken)).unwrap();
        }
        prop_assert_eq!(p.storage_bits(), expected);
    }

    #[test]
    fn stale_predictions_are_rejected(cfg in any_config(), pc in 0u64..1024) {
        let mut p = cfg.build(BIT_BUDGET).unwrap();
        let first = p.predict(pc);
        let second = p.predict(pc);
        p.update(first, Outcome::T).unwrap();
        let is_stale = matches!(p.update(second, Outcome::T),
            Err(Error::StalePrediction { issued: 0, current: 1 }));
        prop_assert!(is_stale);
    }
}
