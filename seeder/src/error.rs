use std::path::PathBuf;
use thiserror::Error;

/// Failure modes of a seeding run.
///
/// Row-scoped problems (malformed keys, resolution misses) only show
/// up here when strict key parsing is enabled; lenient runs record
/// them in the report instead.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("seed file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("malformed key `{key}`: {reason}")]
    MalformedKey { key: String, reason: String },

    #[error("key grammar error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SeedError>;
