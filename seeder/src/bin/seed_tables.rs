//! Generic upsert seeder for exported table CSVs.
//!
//! Usage: `seed_tables [table] [csv-path]`. The table defaults to
//! `vocab`, the path to the table's conventional export file under
//! `$SEEDS_DIR`. Rows upsert on their primary id; a missing file means
//! nothing to seed.

use env_logger::Env;
use log::error;
use seeder::config::Config;
use seeder::store::SeedStore;
use seeder::tables::{self, TableTarget};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

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
    let mut args = env::args().skip(1);
    let target: TableTarget = match args.next() {
        Some(name) => name.parse()?,
        None => TableTarget::Vocab,
    };
    let csv_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.seeds_dir.join(target.default_file()));

    let store = SeedStore::open(&config.database_path)?;
    let report = tables::seed_table(&store, target, &csv_path)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
