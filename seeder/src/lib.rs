//! Offline batch seeding for the vocabulary platform's relational store.
//!
//! Three jobs live here, one binary each:
//! - `seed_vocab`: the full pipeline (cleanup, CSV load, theme pass,
//!   lesson pass, vocab materialization, batched write).
//! - `seed_tables`: generic per-row upsert seeder for exported table
//!   CSVs, keyed by primary id.
//! - `rename_lessons`: maintenance job that rewrites lesson names from
//!   each lesson's first vocab word. Runs after seeding, never during.

pub mod config;
pub mod error;
pub mod jobs;
pub mod pipeline;
pub mod store;
pub mod tables;

pub use error::{Result, SeedError};
