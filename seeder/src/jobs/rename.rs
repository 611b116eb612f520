//! Lesson-name maintenance job.
//!
//! Rewrites every lesson's name from the word of its lowest-id vocab:
//! `"{theme} - Lesson {order}: {word}"`, or `"{theme} - Lesson
//! {order}"` when the lesson has no vocab. This is the only update
//! path in the system and runs as a distinct job after seeding, so the
//! seeding run itself stays create-once.

use crate::error::Result;
use crate::store::SeedStore;
use log::info;

pub fn rename_lessons(store: &mut SeedStore) -> Result<usize> {
    let sources = store.lessons_with_first_word()?;
    let updates: Vec<(i64, String)> = sources
        .iter()
        .map(|s| {
            let name = match &s.first_word {
                Some(word) => format!("{} - Lesson {}: {}", s.theme_name, s.order, word),
                None => format!("{} - Lesson {}", s.theme_name, s.order),
            };
            (s.id, name)
        })
        .collect();

    let updated = store.apply_lesson_names(&updates)?;
    info!("renamed {} lessons", updated);
    Ok(updated)
}
