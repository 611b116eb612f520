//! Theme pass: derive deduplicated themes from the row set, upsert
//! them on the natural key, and re-read the authoritative lookup.

use crate::error::{Result, SeedError};
use crate::pipeline::keys::{theme_key, KeyPolicy};
use crate::pipeline::loader::{field, RawRow};
use crate::store::SeedStore;
use common::model::level::Level;
use common::model::report::SeedReport;
use common::model::theme::{NewTheme, ThemeRecord};
use log::info;
use std::collections::{HashMap, HashSet};

/// Authoritative `{name}_{level}` to id mapping, rebuilt from the
/// store after the upserts so ids are never guessed.
#[derive(Debug)]
pub struct ThemeLookup {
    by_key: HashMap<String, i64>,
}

impl ThemeLookup {
    pub fn from_records(records: Vec<ThemeRecord>) -> Self {
        let by_key = records
            .into_iter()
            .map(|t| (theme_key(&t.name, t.level), t.id))
            .collect();
        ThemeLookup { by_key }
    }

    pub fn get(&self, name: &str, level: Level) -> Option<i64> {
        self.by_key.get(&theme_key(name, level)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Upserts one theme per unique `(name, level)` pair, in first-seen
/// order from the source rows so runs are reproducible.
pub fn seed_themes(
    store: &SeedStore,
    rows: &[RawRow],
    policy: KeyPolicy,
    report: &mut SeedReport,
) -> Result<ThemeLookup> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for row in rows {
        let name = field(row, "theme");
        let level_raw = field(row, "level");
        if name.is_empty() || level_raw.is_empty() {
            continue;
        }
        let level = match level_raw.parse::<Level>() {
            Ok(level) => level,
            Err(_) if policy == KeyPolicy::Strict => {
                return Err(SeedError::MalformedKey {
                    key: level_raw.to_string(),
                    reason: "level is not Beginner/Intermediate/Advanced".to_string(),
                })
            }
            Err(_) => continue,
        };
        if seen.insert(theme_key(name, level)) {
            candidates.push(NewTheme {
                name: name.to_string(),
                level,
            });
        }
    }

    for theme in &candidates {
        store.upsert_theme(theme)?;
    }
    report.themes_seeded = candidates.len();
    info!("seeded {} theme/level combinations", candidates.len());

    Ok(ThemeLookup::from_records(store.all_themes()?))
}
