//! Scenario replay entry point

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

mod scenario;

use scenario::{replay, Scenario};

/// Replay date picker and query tab actions and print the resulting states
#[derive(Parser, Debug)]
#[command(name = "hvreplay")]
#[command(version, about, long_about = None)]
struct Args {
    /// Scenario JSON file
    scenario: PathBuf,

    /// Log the state after every applied action
    #[arg(long, default_value_t = false)]
    step_log: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    info!(scenario = %args.scenario.display(), "Replaying scenario");

    let json = fs::read_to_string(&args.scenario)
        .with_context(|| format!("Failed to read {}", args.scenario.display()))?;
    let scenario = Scenario::from_json(&json)?;

    let today = chrono::Local::now().date_naive();
    let report = replay(scenario, today, args.step_log)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
