pub mod lesson;
pub mod level;
pub mod report;
pub mod theme;
pub mod vocab;
