use super::level::Level;
use serde::{Deserialize, Serialize};

/// A lesson candidate awaiting insertion. `(theme_id, order)` is the
/// natural key; the name is synthesized as `Lesson {order}` at seed
/// time and may later be rewritten by the rename maintenance job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLesson {
    pub name: String,
    pub order: u32,
    pub level: Level,
    pub theme_id: i64,
}

/// A lesson row as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRecord {
    pub id: i64,
    pub name: String,
    pub order: u32,
    pub level: Level,
    pub theme_id: i64,
}
