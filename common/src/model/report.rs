use serde::{Deserialize, Serialize};

/// Why a CSV row was dropped before reaching the batch writer.
///
/// Lenient runs collect these instead of failing; strict runs turn the
/// malformed-key cases into run failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The `lesson` column was empty.
    MissingLessonKey,
    /// The `lesson` column did not match the composite key grammar.
    /// Carries the offending key text.
    MalformedLessonKey(String),
    /// The `level` column was empty or not a recognized level name.
    InvalidLevel(String),
    /// No theme exists for the row's `{theme}_{level}` key.
    UnknownTheme(String),
    /// No lesson exists for the resolved `(theme_id, order)` pair.
    UnknownLesson { theme_id: i64, order: u32 },
}

/// One dropped row, identified by its 0-based position in the source CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub position: usize,
    pub word: String,
    pub reason: SkipReason,
}

/// Structured outcome of a seeding run, serialized to stdout as JSON
/// so callers can distinguish "rows seeded" from "rows skipped".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    pub rows_read: usize,
    pub themes_seeded: usize,
    pub lessons_seeded: usize,
    pub vocab_written: usize,
    pub skipped: Vec<SkippedRow>,
}

impl SeedReport {
    pub fn skip(&mut self, position: usize, word: &str, reason: SkipReason) {
        self.skipped.push(SkippedRow {
            position,
            word: word.to_string(),
            reason,
        });
    }
}

/// Outcome of one generic table-seeding run. Conflicts are rows whose
/// upsert hit a unique-constraint violation and were swallowed;
/// bad rows failed the typed column transform and never reached the
/// store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSeedReport {
    pub rows_read: usize,
    pub written: usize,
    pub conflicts: usize,
    pub bad_rows: usize,
}
