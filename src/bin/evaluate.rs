//! Evaluate a predictor against one or more text branch traces.
//!
//! ```text
//! evaluate --config tage.json trace0.txt trace1.txt
//! RUST_LOG=debug evaluate --json -o result.json trace.txt
//! ```

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use tracing::{ error, info };
use tracing_subscriber::EnvFilter;

use arbor::*;

#[derive(Parser, Debug)]
#[command(name = "evaluate", version,
    about = "Run a budgeted branch predictor over branch traces")]
struct Cli {
    /// JSON configuration file [defaults to the reference tournament predictor]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the final statistics [overrides the configuration]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write statistics as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Override the storage budget [in bits]
    #[arg(long)]
    budget: Option<usize>,

    /// Text traces, one '<pc> <T|N>' record per line
    #[arg(required = true)]
    traces: Vec<PathBuf>,
}

fn run(cli: Cli) -> Result<()> {
    let mut cfg = match &cli.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(budget) = cli.budget {
        cfg.bit_budget = budget;
    }
    if cli.output.is_some() {
        cfg.output = cli.output.clone();
    }

    let engine = Engine::from_config(&cfg)?;
    for path in cli.traces.iter() {
        let trace = TextTrace::from_file(path)?;
        let start = Instant::now();
        engine.run(trace.as_slice())?;
        info!(trace = %trace.name, records = trace.len(),
            elapsed = ?start.elapsed(), "finished trace");
    }

    let report = engine.report()?;
    match (&cfg.output, cli.json) {
        (Some(path), true) => report.write_json(path)?,
        (Some(path), false) => report.write_to(path)?,
        (None, true) => println!("{}", serde_json::to_string_pretty(&report)?),
        (None, false) => print!("{}", report),
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        error!("{}", e);
        process::exit(1);
    }
}
