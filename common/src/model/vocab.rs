use serde::{Deserialize, Serialize};

/// A fully resolved vocab record ready for the batch writer.
///
/// `internal_id` is globally unique: it is seeded by the 1-based CSV
/// row position, so duplicate words never collide. Both parent ids are
/// guaranteed resolved; rows that failed resolution are dropped
/// before this struct is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVocab {
    pub internal_id: String,
    pub word: String,
    pub word_type: Option<String>,
    pub cefr: Option<String>,
    pub ipa_us: Option<String>,
    pub ipa_uk: Option<String>,
    pub meaning_en: Option<String>,
    pub meaning_vn: Option<String>,
    pub example: Option<String>,
    pub audio_url: Option<String>,
    pub theme_id: i64,
    pub lesson_id: i64,
}
