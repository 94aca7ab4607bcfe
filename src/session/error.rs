use thiserror::Error;

use crate::store::PersistenceError;

/// Errors returned by engine operations. None of them change session state.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("select an answer before moving on")]
    AnswerRequired,
    #[error("that move is not available here")]
    InvalidNavigation,
    #[error("no quiz is in progress")]
    NoActiveSession,
    #[error("option {index} does not exist (question has {count})")]
    OptionOutOfRange { index: usize, count: usize },
    #[error("quiz '{0}' has no questions")]
    EmptyQuiz(String),
    #[error("no quiz with id '{0}'")]
    UnknownQuiz(String),
    #[error("result was not saved: {0}")]
    PersistenceFailure(#[from] PersistenceError),
}
