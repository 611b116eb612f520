//! Full vocabulary seeding run: cleanup, CSV load, theme and lesson
//! resolution, vocab materialization, batched write. Prints the
//! structured run report as JSON on stdout.
//!
//! Usage: `seed_vocab [csv-path]` (defaults to
//! `$SEEDS_DIR/cleaned_vocab_refined.csv`).

use env_logger::Env;
use log::error;
use seeder::config::Config;
use seeder::pipeline::{self, RunOptions};
use seeder::store::SeedStore;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_VOCAB_FILE: &str = "cleaned_vocab_refined.csv";

fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> seeder::Result<()> {
    let config = Config::from_env()?;
    let csv_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.seeds_dir.join(DEFAULT_VOCAB_FILE));

    let mut store = SeedStore::open(&config.database_path)?;
    let report = pipeline::run(
        &mut store,
        &RunOptions {
            csv_path,
            key_policy: config.key_policy,
        },
    )?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
