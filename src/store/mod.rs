pub mod background;
pub mod json_store;
pub mod schema;

use thiserror::Error;

use crate::bank::model::DifficultyTier;
use crate::session::result::QuizResult;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode results: {0}")]
    Json(#[from] serde_json::Error),
    #[error("result writer is no longer running")]
    WorkerGone,
}

/// Write boundary for completed sessions. Called once per completed session.
pub trait ResultRecorder {
    fn record_result(
        &mut self,
        quiz_id: &str,
        category: &str,
        tier: DifficultyTier,
        result: &QuizResult,
    ) -> Result<(), PersistenceError>;
}
