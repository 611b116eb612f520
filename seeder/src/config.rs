use crate::error::{Result, SeedError};
use crate::pipeline::keys::KeyPolicy;
use log::info;
use std::env;
use std::path::PathBuf;

/// Runtime configuration, read from the environment.
///
/// `DATABASE_PATH` must be set; an unreachable store is a fatal
/// startup error, not something handled mid-run.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub seeds_dir: PathBuf,
    pub key_policy: KeyPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_path = env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .map_err(|_| SeedError::Config("DATABASE_PATH is not set".to_string()))?;

        let seeds_dir = match env::var("SEEDS_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                info!("SEEDS_DIR not set, using default: seeds");
                PathBuf::from("seeds")
            }
        };

        let key_policy = key_policy_from(env::var("STRICT_KEYS").ok().as_deref());

        Ok(Config {
            database_path,
            seeds_dir,
            key_policy,
        })
    }
}

fn key_policy_from(raw: Option<&str>) -> KeyPolicy {
    match raw {
        Some("1") | Some("true") | Some("yes") => KeyPolicy::Strict,
        _ => KeyPolicy::Lenient,
    }
}
