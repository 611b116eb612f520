//! End-to-end runs of the vocabulary seeding pipeline over real CSV
//! files, against an in-memory store.

use seeder::jobs::rename::rename_lessons;
use seeder::pipeline::keys::KeyPolicy;
use seeder::pipeline::{run, RunOptions};
use seeder::store::SeedStore;
use seeder::SeedError;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str =
    "word,meaning_vn,type,cefr,phon_br,phon_n_am,definition,example,us,level,theme,lesson";

fn csv_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

fn options(file: &NamedTempFile, policy: KeyPolicy) -> RunOptions {
    RunOptions {
        csv_path: file.path().to_path_buf(),
        key_policy: policy,
    }
}

#[test]
fn seeds_a_small_csv_end_to_end() {
    let file = csv_file(&[
        "Apple,qua tao,noun,A1,/ap.l/,/ae.pl/,a round fruit,An apple a day.,apple.mp3,Beginner,Fruit,Fruit_Beginner_Lesson1",
        "Banana,qua chuoi,noun,A1,,,a long fruit,,,Beginner,Fruit,Fruit_Beginner_Lesson1",
        "Visa,thi thuc,noun,B1,,,travel permit,,,Intermediate,Travel,Travel_Intermediate_Lesson2",
    ]);
    let mut store = SeedStore::open_in_memory().unwrap();
    let report = run(&mut store, &options(&file, KeyPolicy::Lenient)).unwrap();

    assert_eq!(report.rows_read, 3);
    assert_eq!(report.themes_seeded, 2);
    assert_eq!(report.lessons_seeded, 2);
    assert_eq!(report.vocab_written, 3);
    assert!(report.skipped.is_empty());

    assert_eq!(store.theme_count().unwrap(), 2);
    assert_eq!(store.lesson_count().unwrap(), 2);
    assert_eq!(store.vocab_count().unwrap(), 3);

    // Round trip for the first row.
    let themes = store.all_themes().unwrap();
    let fruit = themes.iter().find(|t| t.name == "Fruit").unwrap();
    let lessons = store.all_lessons().unwrap();
    let lesson1 = lessons
        .iter()
        .find(|l| l.theme_id == fruit.id && l.order == 1)
        .unwrap();
    assert_eq!(lesson1.name, "Lesson 1");
    assert_eq!(lesson1.level.as_str(), "Beginner");
}

#[test]
fn unknown_theme_reference_is_dropped_not_fatal() {
    // The Ghost row carries no theme of its own and references a
    // theme/level pair no row ever declares.
    let file = csv_file(&[
        "Apple,,,,,,fruit,,,Beginner,Fruit,Fruit_Beginner_Lesson1",
        "Ghost,,,,,,spirit,,,Advanced,,Unknown_Advanced_Lesson1",
    ]);
    let mut store = SeedStore::open_in_memory().unwrap();
    let report = run(&mut store, &options(&file, KeyPolicy::Lenient)).unwrap();

    assert_eq!(report.vocab_written, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].word, "Ghost");
    assert_eq!(report.rows_read, report.vocab_written + report.skipped.len());
}

#[test]
fn rerunning_the_pipeline_is_reproducible() {
    let file = csv_file(&[
        "Apple,,,,,,fruit,,,Beginner,Fruit,Fruit_Beginner_Lesson1",
        "Banana,,,,,,fruit,,,Beginner,Fruit,Fruit_Beginner_Lesson2",
    ]);
    let mut store = SeedStore::open_in_memory().unwrap();
    let first = run(&mut store, &options(&file, KeyPolicy::Lenient)).unwrap();
    // Second run starts from Cleaning, so nothing accumulates.
    let second = run(&mut store, &options(&file, KeyPolicy::Lenient)).unwrap();

    assert_eq!(first, second);
    assert_eq!(store.vocab_count().unwrap(), 2);
    assert_eq!(store.lesson_count().unwrap(), 2);
}

#[test]
fn strict_mode_turns_malformed_keys_into_run_failures() {
    let file = csv_file(&[
        "Apple,,,,,,fruit,,,Beginner,Fruit,Fruit_Beginner_Lesson1",
        "Pear,,,,,,fruit,,,Beginner,Fruit,Fruit_Beginner_LessonX",
    ]);

    let mut lenient_store = SeedStore::open_in_memory().unwrap();
    let report = run(&mut lenient_store, &options(&file, KeyPolicy::Lenient)).unwrap();
    assert_eq!(report.vocab_written, 1);
    assert_eq!(report.skipped.len(), 1);

    let mut strict_store = SeedStore::open_in_memory().unwrap();
    let err = run(&mut strict_store, &options(&file, KeyPolicy::Strict)).unwrap_err();
    assert!(matches!(err, SeedError::MalformedKey { .. }));
}

#[test]
fn missing_csv_fails_the_run() {
    let mut store = SeedStore::open_in_memory().unwrap();
    let opts = RunOptions {
        csv_path: "does/not/exist.csv".into(),
        key_policy: KeyPolicy::Lenient,
    };
    let err = run(&mut store, &opts).unwrap_err();
    assert!(matches!(err, SeedError::FileNotFound(_)));
}

#[test]
fn rename_job_after_seeding_uses_first_vocab_words() {
    let file = csv_file(&[
        "Apple,,,,,,fruit,,,Beginner,Fruit,Fruit_Beginner_Lesson1",
        "Banana,,,,,,fruit,,,Beginner,Fruit,Fruit_Beginner_Lesson1",
    ]);
    let mut store = SeedStore::open_in_memory().unwrap();
    run(&mut store, &options(&file, KeyPolicy::Lenient)).unwrap();

    let renamed = rename_lessons(&mut store).unwrap();
    assert_eq!(renamed, 1);
    let lessons = store.all_lessons().unwrap();
    assert_eq!(lessons[0].name, "Fruit - Lesson 1: Apple");
}
