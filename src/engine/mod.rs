pub mod quiz;
pub mod scoring;
pub mod stats;

pub use quiz::{EngineNotice, QuizEngine};
