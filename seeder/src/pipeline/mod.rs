//! The vocabulary seeding pipeline.
//!
//! Strictly linear and single-pass: each stage fully materializes its
//! output before the next begins, and all store writes are sequential
//! so the lookup tables built from read-after-write stay valid.

pub mod keys;
pub mod lessons;
pub mod loader;
pub mod themes;
pub mod vocab;

use crate::error::Result;
use crate::pipeline::keys::{KeyGrammar, KeyPolicy};
use crate::store::SeedStore;
use common::jobs::RunPhase;
use common::model::report::SeedReport;
use log::{error, info, warn};
use std::path::PathBuf;

pub struct RunOptions {
    pub csv_path: PathBuf,
    pub key_policy: KeyPolicy,
}

/// Runs the full pipeline: Cleaning → Loading → ResolvingThemes →
/// ResolvingLessons → MaterializingVocab → Writing → Done. There is no
/// retry or resume; a failed run is restarted from Cleaning.
pub fn run(store: &mut SeedStore, opts: &RunOptions) -> Result<SeedReport> {
    let mut phase = RunPhase::Idle;
    match execute(store, opts, &mut phase) {
        Ok(report) => Ok(report),
        Err(err) => {
            error!("seeding failed during {}: {}", phase.as_str(), err);
            enter(&mut phase, RunPhase::Failed);
            Err(err)
        }
    }
}

fn execute(store: &mut SeedStore, opts: &RunOptions, phase: &mut RunPhase) -> Result<SeedReport> {
    let grammar = KeyGrammar::new()?;
    let mut report = SeedReport::default();

    enter(phase, RunPhase::Cleaning);
    store.clean()?;
    info!("cleaned vocab, lesson and theme tables");

    enter(phase, RunPhase::Loading);
    let rows = loader::load_rows(&opts.csv_path)?;
    report.rows_read = rows.len();
    info!("loaded {} rows from {}", rows.len(), opts.csv_path.display());

    enter(phase, RunPhase::ResolvingThemes);
    let themes = themes::seed_themes(store, &rows, opts.key_policy, &mut report)?;

    enter(phase, RunPhase::ResolvingLessons);
    let lessons = lessons::seed_lessons(store, &rows, &grammar, opts.key_policy, &themes, &mut report)?;

    enter(phase, RunPhase::MaterializingVocab);
    let records =
        vocab::materialize_vocab(&rows, &grammar, opts.key_policy, &themes, &lessons, &mut report)?;

    enter(phase, RunPhase::Writing);
    vocab::write_vocab(store, &records, &mut report)?;

    enter(phase, RunPhase::Done);
    if report.skipped.is_empty() {
        info!("seeding complete: {} vocab records", report.vocab_written);
    } else {
        warn!(
            "seeding complete: {} vocab records, {} rows skipped",
            report.vocab_written,
            report.skipped.len()
        );
    }
    Ok(report)
}

fn enter(phase: &mut RunPhase, next: RunPhase) {
    *phase = next;
    info!("phase: {}", next.as_str());
}
