//! Lesson pass: parse composite lesson keys, resolve the owning theme,
//! deduplicate on `(theme_id, order)` and bulk-insert.

use crate::error::Result;
use crate::pipeline::keys::{KeyGrammar, KeyPolicy};
use crate::pipeline::loader::{field, RawRow};
use crate::pipeline::themes::ThemeLookup;
use crate::store::SeedStore;
use common::model::lesson::{LessonRecord, NewLesson};
use common::model::report::SeedReport;
use log::info;
use std::collections::{HashMap, HashSet};

/// `(theme_id, order)` to id mapping, re-read from the store after the
/// bulk insert.
#[derive(Debug)]
pub struct LessonLookup {
    by_key: HashMap<(i64, u32), i64>,
}

impl LessonLookup {
    pub fn from_records(records: Vec<LessonRecord>) -> Self {
        let by_key = records
            .into_iter()
            .map(|l| ((l.theme_id, l.order), l.id))
            .collect();
        LessonLookup { by_key }
    }

    pub fn get(&self, theme_id: i64, order: u32) -> Option<i64> {
        self.by_key.get(&(theme_id, order)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Derives one lesson per unique `(theme_id, order)` pair, first
/// occurrence wins, and inserts them in a single bulk operation.
/// Plain insert, not upsert: the cleanup phase guarantees a clean
/// slate, so the dedup step alone makes this duplicate-safe.
///
/// Rows whose theme/level cannot be resolved contribute no lesson and
/// are not an error; they surface later in the vocab pass report.
pub fn seed_lessons(
    store: &mut SeedStore,
    rows: &[RawRow],
    grammar: &KeyGrammar,
    policy: KeyPolicy,
    themes: &ThemeLookup,
    report: &mut SeedReport,
) -> Result<LessonLookup> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for row in rows {
        let raw = field(row, "lesson");
        if raw.is_empty() {
            continue;
        }
        let key = match grammar.parse_lesson(raw) {
            Ok(key) => key,
            Err(err) if policy == KeyPolicy::Strict => return Err(err),
            Err(_) => continue,
        };
        let Some(theme_id) = themes.get(&key.theme, key.level) else {
            continue;
        };
        if seen.insert((theme_id, key.order)) {
            candidates.push(NewLesson {
                name: format!("Lesson {}", key.order),
                order: key.order,
                level: key.level,
                theme_id,
            });
        }
    }

    store.insert_lessons(&candidates)?;
    report.lessons_seeded = candidates.len();
    info!("seeded {} lessons", candidates.len());

    Ok(LessonLookup::from_records(store.all_lessons()?))
}
