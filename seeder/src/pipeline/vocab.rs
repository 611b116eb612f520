//! Vocab pass: resolve both parents for every row, map columns into
//! insertable records, and write them in fixed-size batches.

use crate::error::{Result, SeedError};
use crate::pipeline::keys::{KeyGrammar, KeyPolicy};
use crate::pipeline::lessons::LessonLookup;
use crate::pipeline::loader::{field, optional, RawRow};
use crate::pipeline::themes::ThemeLookup;
use crate::store::SeedStore;
use common::model::level::Level;
use common::model::report::{SeedReport, SkipReason};
use common::model::vocab::NewVocab;
use log::info;

pub const VOCAB_BATCH_SIZE: usize = 500;

const INTERNAL_ID_MAX_LEN: usize = 255;

/// Maps each row into a `NewVocab`, recomputing the theme and lesson
/// keys exactly as the earlier passes did. A row whose parents fail to
/// resolve is dropped whole, never partially inserted, and recorded
/// in the report.
pub fn materialize_vocab(
    rows: &[RawRow],
    grammar: &KeyGrammar,
    policy: KeyPolicy,
    themes: &ThemeLookup,
    lessons: &LessonLookup,
    report: &mut SeedReport,
) -> Result<Vec<NewVocab>> {
    let mut records = Vec::new();
    for (position, row) in rows.iter().enumerate() {
        let word = field(row, "word");
        let level_raw = field(row, "level");
        let level = match level_raw.parse::<Level>() {
            Ok(level) => level,
            Err(err) if policy == KeyPolicy::Strict && !level_raw.is_empty() => {
                return Err(SeedError::MalformedKey {
                    key: level_raw.to_string(),
                    reason: err.to_string(),
                })
            }
            Err(_) => {
                report.skip(position, word, SkipReason::InvalidLevel(level_raw.to_string()));
                continue;
            }
        };

        let raw_lesson = field(row, "lesson");
        if raw_lesson.is_empty() {
            report.skip(position, word, SkipReason::MissingLessonKey);
            continue;
        }
        let lesson_key = match grammar.parse_lesson(raw_lesson) {
            Ok(key) => key,
            Err(err) if policy == KeyPolicy::Strict => return Err(err),
            Err(_) => {
                report.skip(
                    position,
                    word,
                    SkipReason::MalformedLessonKey(raw_lesson.to_string()),
                );
                continue;
            }
        };

        let theme_name = field(row, "theme");
        let Some(theme_id) = themes.get(theme_name, level) else {
            report.skip(
                position,
                word,
                SkipReason::UnknownTheme(format!("{}_{}", theme_name, level)),
            );
            continue;
        };
        let Some(lesson_id) = lessons.get(theme_id, lesson_key.order) else {
            report.skip(
                position,
                word,
                SkipReason::UnknownLesson {
                    theme_id,
                    order: lesson_key.order,
                },
            );
            continue;
        };

        records.push(NewVocab {
            internal_id: internal_id(position, word),
            word: word.to_string(),
            word_type: optional(row, "type"),
            cefr: optional(row, "cefr"),
            ipa_us: optional(row, "phon_n_am"),
            ipa_uk: optional(row, "phon_br"),
            meaning_en: optional(row, "definition"),
            meaning_vn: optional(row, "meaning_vn"),
            example: optional(row, "example"),
            audio_url: optional(row, "us"),
            theme_id,
            lesson_id,
        });
    }
    info!(
        "materialized {} vocab records ({} rows skipped)",
        records.len(),
        report.skipped.len()
    );
    Ok(records)
}

/// Writes the materialized records in contiguous chunks of
/// `VOCAB_BATCH_SIZE`, one transaction per chunk, strictly in order.
/// Any failure, including a duplicate key, aborts the run.
pub fn write_vocab(
    store: &mut SeedStore,
    records: &[NewVocab],
    report: &mut SeedReport,
) -> Result<()> {
    let total = records.len().div_ceil(VOCAB_BATCH_SIZE);
    for (i, chunk) in records.chunks(VOCAB_BATCH_SIZE).enumerate() {
        store.insert_vocab_chunk(chunk)?;
        info!("wrote vocab batch {}/{} ({} records)", i + 1, total, chunk.len());
    }
    report.vocab_written = records.len();
    Ok(())
}

/// `"{position+1}-{normalized word}"`, truncated to 255 bytes. The row
/// position is injective, so the id stays unique even when the same
/// word appears on many rows.
pub fn internal_id(position: usize, word: &str) -> String {
    let mut id = format!("{}-{}", position + 1, normalize_word(word));
    id.truncate(INTERNAL_ID_MAX_LEN);
    id
}

/// Lower-cases the word and replaces every byte outside `[a-z0-9]`
/// with `-`. The output is pure ASCII, which keeps the byte-level
/// truncation above safe.
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::lessons::seed_lessons;
    use crate::pipeline::themes::seed_themes;

    fn vocab_row(word: &str, theme: &str, level: &str, lesson: &str) -> RawRow {
        [
            ("word", word),
            ("theme", theme),
            ("level", level),
            ("lesson", lesson),
            ("definition", "a definition"),
            ("meaning_vn", ""),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    struct Fixture {
        store: SeedStore,
        themes: ThemeLookup,
        lessons: LessonLookup,
        grammar: KeyGrammar,
        report: SeedReport,
    }

    fn prepare(rows: &[RawRow]) -> Fixture {
        let mut store = SeedStore::open_in_memory().unwrap();
        let grammar = KeyGrammar::new().unwrap();
        let mut report = SeedReport::default();
        let themes = seed_themes(&store, rows, KeyPolicy::Lenient, &mut report).unwrap();
        let lessons = seed_lessons(
            &mut store,
            rows,
            &grammar,
            KeyPolicy::Lenient,
            &themes,
            &mut report,
        )
        .unwrap();
        Fixture {
            store,
            themes,
            lessons,
            grammar,
            report,
        }
    }

    #[test]
    fn round_trip_for_a_single_row() {
        let rows = vec![vocab_row("Apple", "Fruit", "Beginner", "Fruit_Beginner_Lesson1")];
        let mut fx = prepare(&rows);
        let records = materialize_vocab(
            &rows,
            &fx.grammar,
            KeyPolicy::Lenient,
            &fx.themes,
            &fx.lessons,
            &mut fx.report,
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        let v = &records[0];
        assert_eq!(v.internal_id, "1-apple");
        assert_eq!(v.word, "Apple");
        let theme_id = fx.themes.get("Fruit", Level::Beginner).unwrap();
        assert_eq!(v.theme_id, theme_id);
        assert_eq!(v.lesson_id, fx.lessons.get(theme_id, 1).unwrap());
        assert_eq!(v.meaning_en.as_deref(), Some("a definition"));
        assert_eq!(v.meaning_vn, None);
    }

    #[test]
    fn unresolved_parent_drops_the_row_with_a_reason() {
        let rows = vec![
            vocab_row("Apple", "Fruit", "Beginner", "Fruit_Beginner_Lesson1"),
            vocab_row("Ghost", "Unknown", "Advanced", "Unknown_Advanced_Lesson1"),
        ];
        // Seed parents from the first row only, so the Ghost row's
        // theme/level pair genuinely does not exist in the store.
        let mut fx = prepare(&rows[..1]);
        let records = materialize_vocab(
            &rows,
            &fx.grammar,
            KeyPolicy::Lenient,
            &fx.themes,
            &fx.lessons,
            &mut fx.report,
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        let skipped = fx
            .report
            .skipped
            .iter()
            .find(|s| s.word == "Ghost")
            .unwrap();
        assert_eq!(skipped.position, 1);
        assert_eq!(
            skipped.reason,
            SkipReason::UnknownTheme("Unknown_Advanced".to_string())
        );
    }

    #[test]
    fn internal_ids_stay_unique_for_duplicate_words() {
        let rows = vec![
            vocab_row("set", "Fruit", "Beginner", "Fruit_Beginner_Lesson1"),
            vocab_row("set", "Fruit", "Beginner", "Fruit_Beginner_Lesson1"),
        ];
        let mut fx = prepare(&rows);
        let records = materialize_vocab(
            &rows,
            &fx.grammar,
            KeyPolicy::Lenient,
            &fx.themes,
            &fx.lessons,
            &mut fx.report,
        )
        .unwrap();
        assert_eq!(records[0].internal_id, "1-set");
        assert_eq!(records[1].internal_id, "2-set");
    }

    #[test]
    fn batch_of_501_issues_two_writes() {
        let rows = vec![vocab_row("Apple", "Fruit", "Beginner", "Fruit_Beginner_Lesson1")];
        let mut fx = prepare(&rows);
        let template = materialize_vocab(
            &rows,
            &fx.grammar,
            KeyPolicy::Lenient,
            &fx.themes,
            &fx.lessons,
            &mut fx.report,
        )
        .unwrap()
        .remove(0);

        let records: Vec<NewVocab> = (0..501)
            .map(|i| {
                let mut v = template.clone();
                v.internal_id = format!("{}-apple", i + 1);
                v
            })
            .collect();
        assert_eq!(records.chunks(VOCAB_BATCH_SIZE).count(), 2);

        let mut report = SeedReport::default();
        write_vocab(&mut fx.store, &records, &mut report).unwrap();
        assert_eq!(report.vocab_written, 501);
        assert_eq!(fx.store.vocab_count().unwrap(), 501);
    }

    #[test]
    fn duplicate_key_in_bulk_write_aborts_the_run() {
        let rows = vec![vocab_row("Apple", "Fruit", "Beginner", "Fruit_Beginner_Lesson1")];
        let mut fx = prepare(&rows);
        let record = materialize_vocab(
            &rows,
            &fx.grammar,
            KeyPolicy::Lenient,
            &fx.themes,
            &fx.lessons,
            &mut fx.report,
        )
        .unwrap()
        .remove(0);

        let mut report = SeedReport::default();
        let err = write_vocab(&mut fx.store, &[record.clone(), record], &mut report);
        assert!(err.is_err());
        assert_eq!(fx.store.vocab_count().unwrap(), 0);
    }

    #[test]
    fn word_normalization() {
        assert_eq!(normalize_word("Apple"), "apple");
        assert_eq!(normalize_word("self-esteem"), "self-esteem");
        assert_eq!(normalize_word("give up!"), "give-up-");
        assert_eq!(normalize_word("café"), "caf-");
    }

    #[test]
    fn internal_id_is_truncated_to_255_bytes() {
        let long_word = "x".repeat(400);
        let id = internal_id(0, &long_word);
        assert_eq!(id.len(), 255);
        assert!(id.starts_with("1-xxx"));
    }
}
