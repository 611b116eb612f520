//! Composite-key grammar shared by the lesson and vocab passes.
//!
//! The CSV producer encodes parent references as underscore-joined
//! strings; this module is the one place that grammar is defined:
//!
//! - theme key:  `{theme}_{level}`
//! - lesson key: `{theme}_{level}_Lesson{order}` (no separator between
//!   the literal `Lesson` and the digits, order > 0)

use crate::error::{Result, SeedError};
use common::model::level::Level;
use regex::Regex;

/// How malformed composite keys are handled. Production batch runs are
/// lenient (skip the row); development runs fail loudly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    Lenient,
    Strict,
}

/// A successfully parsed lesson key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonKey {
    pub theme: String,
    pub level: Level,
    pub order: u32,
}

/// Compiled lesson-key pattern, built once per run.
pub struct KeyGrammar {
    lesson_re: Regex,
}

impl KeyGrammar {
    pub fn new() -> Result<Self> {
        Ok(KeyGrammar {
            lesson_re: Regex::new(r"^([^_]+)_([^_]+)_Lesson([0-9]+)$")?,
        })
    }

    /// Parses a `lesson` cell into its three components. All failure
    /// modes come back as `SeedError::MalformedKey`; callers decide
    /// whether that skips the row or aborts the run.
    pub fn parse_lesson(&self, raw: &str) -> Result<LessonKey> {
        let caps = self
            .lesson_re
            .captures(raw)
            .ok_or_else(|| malformed(raw, "expected `<theme>_<level>_Lesson<order>`"))?;
        let level: Level = caps[2]
            .parse()
            .map_err(|_| malformed(raw, "level segment is not Beginner/Intermediate/Advanced"))?;
        let order: u32 = caps[3]
            .parse()
            .map_err(|_| malformed(raw, "order does not fit a 32-bit integer"))?;
        if order == 0 {
            return Err(malformed(raw, "order must be positive"));
        }
        Ok(LessonKey {
            theme: caps[1].to_string(),
            level,
            order,
        })
    }
}

/// The `{name}_{level}` key used for theme lookups.
pub fn theme_key(name: &str, level: Level) -> String {
    format!("{}_{}", name, level.as_str())
}

fn malformed(key: &str, reason: &str) -> SeedError {
    SeedError::MalformedKey {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
