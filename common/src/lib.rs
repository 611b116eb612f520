pub mod jobs;
pub mod model;
