//! Dominion Intel - Entry Point
//!
//! Loads the race catalog and a JSON file of intelligence snapshots, runs
//! every estimator over each dominion, and prints the reports as JSON.

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use dominion_intel::catalog::load_races;
use dominion_intel::core::error::Result;
use dominion_intel::intel::{assess_realm, DominionIntel, RealmQuery};

/// Assess dominions from intelligence snapshots
#[derive(Parser, Debug)]
#[command(name = "dominion-intel")]
#[command(about = "Estimate military power and safe sends from intelligence snapshots")]
struct Args {
    /// Directory of race definition TOML files
    #[arg(long, default_value = "races")]
    races: PathBuf,

    /// JSON file with an array of dominion intelligence records
    #[arg(long)]
    snapshots: PathBuf,

    /// Attacker offense to plan defense against
    #[arg(long)]
    enemy_op: Option<f64>,

    /// Current in-game day, for dock protection of boats
    #[arg(long, default_value_t = 0)]
    day: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dominion_intel=info".into()),
        )
        .init();

    let args = Args::parse();

    let races = load_races(&args.races)?;
    tracing::info!(count = races.len(), "race catalog loaded");

    let payload = fs::read_to_string(&args.snapshots)?;
    let dominions: Vec<DominionIntel> = serde_json::from_str(&payload)?;
    tracing::info!(count = dominions.len(), "snapshots loaded");

    let query = RealmQuery {
        enemy_op: args.enemy_op,
        current_day: args.day,
    };

    let mut reports = Vec::new();
    let mut failures = 0usize;
    for result in assess_realm(&races, &dominions, &query) {
        match result {
            Ok(report) => reports.push(report),
            Err(_) => failures += 1,
        }
    }
    if failures > 0 {
        tracing::warn!(failures, "some dominions could not be assessed");
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
