use super::level::Level;
use serde::{Deserialize, Serialize};

/// A theme candidate derived from the CSV, not yet written to the store.
///
/// `(name, level)` is the natural key; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTheme {
    pub name: String,
    pub level: Level,
}

/// A theme row as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeRecord {
    pub id: i64,
    pub name: String,
    pub level: Level,
}
