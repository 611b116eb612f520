//! SQLite-backed store handle for the seeding jobs.
//!
//! A `SeedStore` is constructed once per run and passed into each
//! pipeline stage, so the stages never reach for a process-global
//! connection and tests can run against an in-memory store.

use crate::error::Result;
use common::model::lesson::{LessonRecord, NewLesson};
use common::model::level::{Level, ParseLevelError};
use common::model::theme::{NewTheme, ThemeRecord};
use common::model::vocab::NewVocab;
use rusqlite::{params, Connection};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS theme (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL,
    level TEXT NOT NULL,
    UNIQUE (name, level)
);
CREATE TABLE IF NOT EXISTS lesson (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT NOT NULL,
    \"order\" INTEGER NOT NULL,
    level    TEXT NOT NULL,
    theme_id INTEGER NOT NULL REFERENCES theme (id),
    UNIQUE (theme_id, \"order\")
);
CREATE TABLE IF NOT EXISTS vocab (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    internalId TEXT NOT NULL UNIQUE,
    word       TEXT NOT NULL,
    type       TEXT,
    cefr       TEXT,
    ipa_us     TEXT,
    ipa_uk     TEXT,
    meaning_en TEXT,
    meaning_vn TEXT,
    example    TEXT,
    audio_url  TEXT,
    theme_id   INTEGER NOT NULL REFERENCES theme (id),
    lesson_id  INTEGER NOT NULL REFERENCES lesson (id)
);
";

/// Owned connection to the seeding database. Schema is bootstrapped on
/// open; every statement the pipeline issues goes through here.
pub struct SeedStore {
    conn: Connection,
}

/// Source row for the lesson rename job: the lesson, its theme name,
/// and the word of its lowest-id vocab (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonNameSource {
    pub id: i64,
    pub theme_name: String,
    pub order: u32,
    pub first_word: Option<String>,
}

/// Row shapes for the generic upsert seeder. Unlike the `New*` types,
/// these carry the exported primary id, which is the upsert key.
#[derive(Debug, Clone)]
pub struct ThemeUpsert {
    pub id: i64,
    pub name: String,
    pub level: Level,
}

#[derive(Debug, Clone)]
pub struct LessonUpsert {
    pub id: i64,
    pub name: String,
    pub order: u32,
    pub level: Level,
    pub theme_id: i64,
}

#[derive(Debug, Clone)]
pub struct VocabUpsert {
    pub id: i64,
    pub record: NewVocab,
}

impl SeedStore {
    /// Opens (creating if needed) the database at `path` and ensures
    /// the schema exists. Failure here is fatal to the run.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::bootstrap(&conn)?;
        Ok(SeedStore { conn })
    }

    /// In-memory store with the same schema, for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(&conn)?;
        Ok(SeedStore { conn })
    }

    fn bootstrap(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)
    }

    /// Deletes all seeded rows in reverse dependency order so foreign
    /// keys never dangle: vocab, then lesson, then theme.
    pub fn clean(&self) -> Result<()> {
        self.conn.execute("DELETE FROM vocab", [])?;
        self.conn.execute("DELETE FROM lesson", [])?;
        self.conn.execute("DELETE FROM theme", [])?;
        Ok(())
    }

    /// Insert-if-absent on the natural key `(name, level)`. An existing
    /// theme is left untouched, so re-running the pass is a no-op.
    pub fn upsert_theme(&self, theme: &NewTheme) -> Result<()> {
        self.conn.execute(
            "INSERT INTO theme (name, level) VALUES (?1, ?2)
             ON CONFLICT (name, level) DO NOTHING",
            params![theme.name, theme.level.as_str()],
        )?;
        Ok(())
    }

    pub fn all_themes(&self) -> Result<Vec<ThemeRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, level FROM theme ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(ThemeRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                level: parse_level(2, row.get(2)?)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Plain bulk insert of lesson candidates in one transaction.
    /// No conflict tolerance: the caller is expected to have
    /// deduplicated on `(theme_id, order)` after a clean slate, and a
    /// duplicate here fails the whole run.
    pub fn insert_lessons(&mut self, lessons: &[NewLesson]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO lesson (name, \"order\", level, theme_id)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for lesson in lessons {
                stmt.execute(params![
                    lesson.name,
                    lesson.order,
                    lesson.level.as_str(),
                    lesson.theme_id
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn all_lessons(&self) -> Result<Vec<LessonRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, \"order\", level, theme_id FROM lesson ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(LessonRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                order: row.get(2)?,
                level: parse_level(3, row.get(3)?)?,
                theme_id: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Writes one chunk of vocab records atomically. A constraint
    /// violation rolls the chunk back and propagates.
    pub fn insert_vocab_chunk(&mut self, chunk: &[NewVocab]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO vocab (internalId, word, type, cefr, ipa_us, ipa_uk,
                                    meaning_en, meaning_vn, example, audio_url,
                                    theme_id, lesson_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for v in chunk {
                stmt.execute(params![
                    v.internal_id,
                    v.word,
                    v.word_type,
                    v.cefr,
                    v.ipa_us,
                    v.ipa_uk,
                    v.meaning_en,
                    v.meaning_vn,
                    v.example,
                    v.audio_url,
                    v.theme_id,
                    v.lesson_id
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn upsert_theme_row(&self, row: &ThemeUpsert) -> rusqlite::Result<usize> {
        self.conn.execute(
            "INSERT INTO theme (id, name, level) VALUES (?1, ?2, ?3)
             ON CONFLICT (id) DO UPDATE SET name = excluded.name, level = excluded.level",
            params![row.id, row.name, row.level.as_str()],
        )
    }

    pub fn upsert_lesson_row(&self, row: &LessonUpsert) -> rusqlite::Result<usize> {
        self.conn.execute(
            "INSERT INTO lesson (id, name, \"order\", level, theme_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (id) DO UPDATE SET
                 name = excluded.name,
                 \"order\" = excluded.\"order\",
                 level = excluded.level,
                 theme_id = excluded.theme_id",
            params![
                row.id,
                row.name,
                row.order,
                row.level.as_str(),
                row.theme_id
            ],
        )
    }

    pub fn upsert_vocab_row(&self, row: &VocabUpsert) -> rusqlite::Result<usize> {
        let v = &row.record;
        self.conn.execute(
            "INSERT INTO vocab (id, internalId, word, type, cefr, ipa_us, ipa_uk,
                                meaning_en, meaning_vn, example, audio_url,
                                theme_id, lesson_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT (id) DO UPDATE SET
                 internalId = excluded.internalId,
                 word = excluded.word,
                 type = excluded.type,
                 cefr = excluded.cefr,
                 ipa_us = excluded.ipa_us,
                 ipa_uk = excluded.ipa_uk,
                 meaning_en = excluded.meaning_en,
                 meaning_vn = excluded.meaning_vn,
                 example = excluded.example,
                 audio_url = excluded.audio_url,
                 theme_id = excluded.theme_id,
                 lesson_id = excluded.lesson_id",
            params![
                row.id,
                v.internal_id,
                v.word,
                v.word_type,
                v.cefr,
                v.ipa_us,
                v.ipa_uk,
                v.meaning_en,
                v.meaning_vn,
                v.example,
                v.audio_url,
                v.theme_id,
                v.lesson_id
            ],
        )
    }

    /// Every lesson joined with its theme name and the word of its
    /// lowest-id vocab, for the rename maintenance job.
    pub fn lessons_with_first_word(&self) -> Result<Vec<LessonNameSource>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.id, t.name, l.\"order\",
                    (SELECT v.word FROM vocab v
                     WHERE v.lesson_id = l.id
                     ORDER BY v.id ASC LIMIT 1)
             FROM lesson l
             JOIN theme t ON t.id = l.theme_id
             ORDER BY l.id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(LessonNameSource {
                id: row.get(0)?,
                theme_name: row.get(1)?,
                order: row.get(2)?,
                first_word: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Applies all lesson renames in one transaction.
    pub fn apply_lesson_names(&mut self, updates: &[(i64, String)]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("UPDATE lesson SET name = ?1 WHERE id = ?2")?;
            for (id, name) in updates {
                stmt.execute(params![name, id])?;
            }
        }
        tx.commit()?;
        Ok(updates.len())
    }

    pub fn theme_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM theme", [], |row| row.get(0))?)
    }

    pub fn lesson_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM lesson", [], |row| row.get(0))?)
    }

    pub fn vocab_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM vocab", [], |row| row.get(0))?)
    }
}

/// True when the error is a unique/foreign-key constraint failure, the
/// only error class the upsert writer tolerates.
pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn parse_level(idx: usize, raw: String) -> rusqlite::Result<Level> {
    raw.parse().map_err(|e: ParseLevelError| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(name: &str, level: Level) -> NewTheme {
        NewTheme {
            name: name.to_string(),
            level,
        }
    }

    #[test]
    fn theme_upsert_is_idempotent_on_natural_key() {
        let store = SeedStore::open_in_memory().unwrap();
        let t = theme("Travel", Level::Beginner);
        store.upsert_theme(&t).unwrap();
        store.upsert_theme(&t).unwrap();

        let all = store.all_themes().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Travel");
        assert_eq!(all[0].level, Level::Beginner);
    }

    #[test]
    fn same_name_different_level_gets_its_own_theme() {
        let store = SeedStore::open_in_memory().unwrap();
        store.upsert_theme(&theme("Travel", Level::Beginner)).unwrap();
        store.upsert_theme(&theme("Travel", Level::Advanced)).unwrap();
        assert_eq!(store.theme_count().unwrap(), 2);
    }

    #[test]
    fn duplicate_lesson_in_bulk_insert_rolls_back_the_chunk() {
        let mut store = SeedStore::open_in_memory().unwrap();
        store.upsert_theme(&theme("Travel", Level::Beginner)).unwrap();
        let theme_id = store.all_themes().unwrap()[0].id;

        let lesson = NewLesson {
            name: "Lesson 1".to_string(),
            order: 1,
            level: Level::Beginner,
            theme_id,
        };
        let err = store
            .insert_lessons(&[lesson.clone(), lesson])
            .unwrap_err();
        match err {
            crate::SeedError::Store(e) => assert!(is_constraint_violation(&e)),
            other => panic!("unexpected error: {other}"),
        }
        // Atomic chunk: neither row survives.
        assert_eq!(store.lesson_count().unwrap(), 0);
    }

    #[test]
    fn clean_removes_everything_in_dependency_order() {
        let mut store = SeedStore::open_in_memory().unwrap();
        store.upsert_theme(&theme("Food", Level::Beginner)).unwrap();
        let theme_id = store.all_themes().unwrap()[0].id;
        store
            .insert_lessons(&[NewLesson {
                name: "Lesson 1".to_string(),
                order: 1,
                level: Level::Beginner,
                theme_id,
            }])
            .unwrap();
        let lesson_id = store.all_lessons().unwrap()[0].id;
        store
            .insert_vocab_chunk(&[NewVocab {
                internal_id: "1-apple".to_string(),
                word: "Apple".to_string(),
                word_type: None,
                cefr: None,
                ipa_us: None,
                ipa_uk: None,
                meaning_en: None,
                meaning_vn: None,
                example: None,
                audio_url: None,
                theme_id,
                lesson_id,
            }])
            .unwrap();

        store.clean().unwrap();
        assert_eq!(store.vocab_count().unwrap(), 0);
        assert_eq!(store.lesson_count().unwrap(), 0);
        assert_eq!(store.theme_count().unwrap(), 0);
    }
}
