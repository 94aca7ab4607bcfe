use std::sync::Arc;

use crate::bank::model::{Question, Quiz};
use crate::session::machine::{SessionPhase, SessionState};
use crate::session::result::QuizResult;

/// What the host can observe about the session after any operation.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub quiz: Option<Arc<Quiz>>,
    pub current_index: usize,
    pub remaining_secs: u32,
    pub time_limit_secs: u32,
    pub selected_answer: Option<usize>,
    pub is_last_question: bool,
    pub answered_count: usize,
    pub answers: Vec<Option<usize>>,
    pub result: Option<QuizResult>,
}

impl SessionSnapshot {
    pub fn of(state: &SessionState) -> Self {
        match state {
            SessionState::Selecting => Self {
                phase: SessionPhase::Selecting,
                quiz: None,
                current_index: 0,
                remaining_secs: 0,
                time_limit_secs: 0,
                selected_answer: None,
                is_last_question: false,
                answered_count: 0,
                answers: Vec::new(),
                result: None,
            },
            SessionState::InProgress(s) => Self {
                phase: SessionPhase::InProgress,
                quiz: Some(Arc::clone(&s.quiz)),
                current_index: s.current_index,
                remaining_secs: s.countdown.remaining_secs(),
                time_limit_secs: s.countdown.limit_secs(),
                selected_answer: s.answers.get(s.current_index),
                is_last_question: s.is_last_question(),
                answered_count: s.answers.answered_count(),
                answers: s.answers.as_slice().to_vec(),
                result: None,
            },
            SessionState::Completed(s) => Self {
                phase: SessionPhase::Completed,
                quiz: Some(Arc::clone(&s.quiz)),
                current_index: s.current_index,
                remaining_secs: s.remaining_secs,
                time_limit_secs: s.quiz.time_limit_secs(),
                selected_answer: s.answers.get(s.current_index),
                is_last_question: s.current_index + 1 == s.quiz.len(),
                answered_count: s.answers.answered_count(),
                answers: s.answers.as_slice().to_vec(),
                result: Some(s.result),
            },
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz
            .as_ref()
            .and_then(|q| q.questions.get(self.current_index))
    }

    pub fn question_count(&self) -> usize {
        self.quiz.as_ref().map(|q| q.len()).unwrap_or(0)
    }

    /// 0.0 .. 1.0 share of the time limit still left.
    pub fn time_fraction_left(&self) -> f64 {
        if self.time_limit_secs == 0 {
            return 0.0;
        }
        self.remaining_secs as f64 / self.time_limit_secs as f64
    }
}
