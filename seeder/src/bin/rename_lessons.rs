//! Maintenance job: rewrite lesson names from each lesson's first
//! vocab word. Run after seeding, never as part of it.

use env_logger::Env;
use log::{error, info};
use seeder::config::Config;
use seeder::jobs::rename::rename_lessons;
use seeder::store::SeedStore;
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
    let mut store = SeedStore::open(&config.database_path)?;
    let renamed = rename_lessons(&mut store)?;
    info!("lesson renaming complete: {renamed} lessons updated");
    Ok(())
}
