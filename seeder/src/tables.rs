//! Generic per-row upsert seeder for exported table CSVs.
//!
//! Unlike the vocab pipeline, these CSVs carry their primary ids, and
//! the write path is an upsert keyed by id: chunks of 100, one
//! statement per row, constraint violations logged and swallowed so a
//! partially bad export still seeds everything it can.

use crate::error::{Result, SeedError};
use crate::pipeline::loader::{self, field, optional, RawRow};
use crate::store::{is_constraint_violation, LessonUpsert, SeedStore, ThemeUpsert, VocabUpsert};
use common::model::level::Level;
use common::model::report::TableSeedReport;
use common::model::vocab::NewVocab;
use log::{info, warn};
use std::path::Path;
use std::str::FromStr;

pub const UPSERT_BATCH_SIZE: usize = 100;

/// The closed set of seedable tables. Each variant owns its column
/// transform and upsert statement, so an unknown table name fails at
/// argument parsing rather than at some point mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableTarget {
    Theme,
    Lesson,
    Vocab,
}

impl TableTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableTarget::Theme => "theme",
            TableTarget::Lesson => "lesson",
            TableTarget::Vocab => "vocab",
        }
    }

    /// Conventional export file name for this table.
    pub fn default_file(&self) -> &'static str {
        match self {
            TableTarget::Theme => "Theme.csv",
            TableTarget::Lesson => "Lesson.csv",
            TableTarget::Vocab => "Vocab.csv",
        }
    }

    /// Transforms one raw row and upserts it. `Ok(false)` means the
    /// row failed the typed transform (missing/invalid columns) and
    /// was skipped before any store access.
    fn apply(&self, store: &SeedStore, row: &RawRow) -> rusqlite::Result<bool> {
        let Ok(id) = field(row, "id").parse::<i64>() else {
            return Ok(false);
        };
        match self {
            TableTarget::Theme => {
                let name = field(row, "name");
                let Ok(level) = field(row, "level").parse::<Level>() else {
                    return Ok(false);
                };
                if name.is_empty() {
                    return Ok(false);
                }
                store.upsert_theme_row(&ThemeUpsert {
                    id,
                    name: name.to_string(),
                    level,
                })?;
            }
            TableTarget::Lesson => {
                let Ok(order) = field(row, "order").parse::<u32>() else {
                    return Ok(false);
                };
                let Ok(level) = field(row, "level").parse::<Level>() else {
                    return Ok(false);
                };
                let Ok(theme_id) = field(row, "theme_id").parse::<i64>() else {
                    return Ok(false);
                };
                store.upsert_lesson_row(&LessonUpsert {
                    id,
                    name: field(row, "name").to_string(),
                    order,
                    level,
                    theme_id,
                })?;
            }
            TableTarget::Vocab => {
                let internal_id = field(row, "internalId");
                if internal_id.is_empty() {
                    return Ok(false);
                }
                let Ok(theme_id) = field(row, "theme_id").parse::<i64>() else {
                    return Ok(false);
                };
                let Ok(lesson_id) = field(row, "lesson_id").parse::<i64>() else {
                    return Ok(false);
                };
                store.upsert_vocab_row(&VocabUpsert {
                    id,
                    record: NewVocab {
                        internal_id: internal_id.to_string(),
                        word: field(row, "word").to_string(),
                        word_type: optional(row, "type"),
                        cefr: optional(row, "cefr"),
                        ipa_us: optional(row, "ipa_us"),
                        ipa_uk: optional(row, "ipa_uk"),
                        meaning_en: optional(row, "meaning_en"),
                        meaning_vn: optional(row, "meaning_vn"),
                        example: optional(row, "example"),
                        audio_url: optional(row, "audio_url"),
                        theme_id,
                        lesson_id,
                    },
                })?;
            }
        }
        Ok(true)
    }
}

impl FromStr for TableTarget {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "theme" => Ok(TableTarget::Theme),
            "lesson" => Ok(TableTarget::Lesson),
            "vocab" => Ok(TableTarget::Vocab),
            other => Err(SeedError::Config(format!(
                "unknown table `{other}` (expected theme, lesson or vocab)"
            ))),
        }
    }
}

/// Seeds one table from an exported CSV. A missing file means
/// "nothing to seed" and is not an error; a row-level constraint
/// violation is swallowed and counted; everything else aborts.
pub fn seed_table(store: &SeedStore, target: TableTarget, path: &Path) -> Result<TableSeedReport> {
    let rows = match loader::load_rows(path) {
        Ok(rows) => rows,
        Err(SeedError::FileNotFound(missing)) => {
            warn!("seed file missing, nothing to seed: {}", missing.display());
            return Ok(TableSeedReport::default());
        }
        Err(err) => return Err(err),
    };
    info!(
        "seeding {} from {} ({} rows)",
        target.as_str(),
        path.display(),
        rows.len()
    );

    let mut report = TableSeedReport {
        rows_read: rows.len(),
        ..TableSeedReport::default()
    };
    let total = rows.len().div_ceil(UPSERT_BATCH_SIZE);
    for (i, chunk) in rows.chunks(UPSERT_BATCH_SIZE).enumerate() {
        for row in chunk {
            match target.apply(store, row) {
                Ok(true) => report.written += 1,
                Ok(false) => report.bad_rows += 1,
                Err(err) if is_constraint_violation(&err) => {
                    warn!(
                        "skipping {} row id {}: {}",
                        target.as_str(),
                        field(row, "id"),
                        err
                    );
                    report.conflicts += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
        info!(
            "upserted batch {}/{} into {}",
            i + 1,
            total,
            target.as_str()
        );
    }
    Ok(report)
}
