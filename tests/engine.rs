//! Running predictors through the engine, from configuration to report.

mod common;

use std::sync::Arc;
use std::thread;

use arbor::*;
use common::*;
use pretty_assertions::assert_eq;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("arbor-{}-{}", std::process::id(), name))
}

#[test]
fn config_file_to_report() {
    let cfg_path = temp_path("pap.json");
    std::fs::write(&cfg_path, r#"{
        "predictor": { "kind": "pap", "pattern_bits": 2, "buckets": 64, "ctr_bits": 2 },
        "bit_budget": 1024
    }"#).unwrap();
    let cfg = SimConfig::from_file(&cfg_path).unwrap();
    assert_eq!(cfg.bit_budget, 1024);

    let mut text = String::from("# pc outcome\n");
    for _ in 0..50 {
        for (pc, outcome) in PROGRAM {
            let o = if outcome.is_taken() { "T" } else { "N" };
            text.push_str(&format!("{:#x} {}\n", pc, o));
        }
    }
    let trace_path = temp_path("program.txt");
    std::fs::write(&trace_path, text).unwrap();
    let trace = TextTrace::from_file(&trace_path).unwrap();
    assert_eq!(trace.len(), 200);

    let engine = Engine::from_config(&cfg).unwrap();
    engine.run(trace.as_slice()).unwrap();
    let report = engine.report().unwrap();
    assert_eq!(report.predictor, "PApPredictor");
    assert_eq!(report.storage_bits, 640);
    assert_eq!(report.outcomes.total(), 200);
    assert_eq!(report.unique_branches, 4);
    assert!(report.outcomes.accuracy() > 0.9);

    let out = temp_path("report.json");
    report.write_json(&out).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["outcomes"]["takenCorrect"], report.outcomes.taken_correct);

    for path in [cfg_path, trace_path, out] {
        let _ = std::fs::remove_file(path);
    }
}

#[test]
fn missing_files() {
    assert!(matches!(SimConfig::from_file(temp_path("missing.json")),
        Err(Error::Io(_))));
    assert!(matches!(TextTrace::from_file(temp_path("missing.txt")),
        Err(Error::Io(_))));
}

#[test]
fn threads_share_one_predictor() {
    let engine = Arc::new(Engine::from_config(&SimConfig::default()).unwrap());
    let handles: Vec<_> = PROGRAM.into_iter().map(|(pc, outcome)| {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for _ in 0..500 {
                engine.handle_branch(pc, outcome).unwrap();
            }
        })
    }).collect();
    for h in handles {
        h.join().unwrap();
    }

    let report = engine.report().unwrap();
    assert_eq!(report.outcomes.total(), 2000);
    assert_eq!(report.outcomes.taken_correct + report.outcomes.taken_incorrect, 1000);
    assert_eq!(report.tournament.map(|t| t.total()), Some(2000));
}
