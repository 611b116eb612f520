use serde::Serialize;

/// Phases of a seeding run, in execution order. `Failed` is terminal
/// and reachable from any phase; a failed run restarts from `Cleaning`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RunPhase {
    Idle,
    Cleaning,
    Loading,
    ResolvingThemes,
    ResolvingLessons,
    MaterializingVocab,
    Writing,
    Done,
    Failed,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Idle => "Idle",
            RunPhase::Cleaning => "Cleaning",
            RunPhase::Loading => "Loading",
            RunPhase::ResolvingThemes => "ResolvingThemes",
            RunPhase::ResolvingLessons => "ResolvingLessons",
            RunPhase::MaterializingVocab => "MaterializingVocab",
            RunPhase::Writing => "Writing",
            RunPhase::Done => "Done",
            RunPhase::Failed => "Failed",
        }
    }
}
