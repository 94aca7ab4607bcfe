//! Quiz engine: the single entry point a host drives.
//!
//! Owns the question bank, the current [`SessionState`], a [`Clock`] and a
//! [`ResultRecorder`]. Each operation feeds one event through
//! [`machine::apply`] and performs the side effects of the transition:
//! recording a result exactly once when a session completes, and queueing
//! notices for the host.

use std::mem;

use crate::bank::QuestionBank;
use crate::session::clock::Clock;
use crate::session::error::EngineError;
use crate::session::machine::{self, Effect, SessionEvent, SessionPhase, SessionState};
use crate::session::result::QuizResult;
use crate::session::snapshot::SessionSnapshot;
use crate::store::{PersistenceError, ResultRecorder};

/// Things the host should tell the user about, in order of occurrence.
#[derive(Debug)]
pub enum EngineNotice {
    /// A session finished. `timed_out` on the result tells a forced
    /// completion apart from the user finishing the last question.
    Completed { quiz_id: String, result: QuizResult },
    PersistenceFailed(PersistenceError),
}

pub struct QuizEngine<C: Clock, R: ResultRecorder> {
    bank: QuestionBank,
    state: SessionState,
    clock: C,
    recorder: R,
    notices: Vec<EngineNotice>,
}

impl<C: Clock, R: ResultRecorder> QuizEngine<C, R> {
    pub fn new(bank: QuestionBank, clock: C, recorder: R) -> Self {
        Self {
            bank,
            state: SessionState::Selecting,
            clock,
            recorder,
            notices: Vec::new(),
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::of(&self.state)
    }

    /// Begin `quiz_id`, discarding any session still running. A session
    /// whose time ran out before this call is completed and recorded first.
    pub fn start_quiz(&mut self, quiz_id: &str) -> Result<SessionSnapshot, EngineError> {
        self.poll();
        let quiz = self
            .bank
            .get(quiz_id)
            .ok_or_else(|| EngineError::UnknownQuiz(quiz_id.to_string()))?;
        let unfinished = match &self.state {
            SessionState::InProgress(s) => Some(s.quiz.id.clone()),
            _ => None,
        };
        let now = self.clock.now();
        self.dispatch(SessionEvent::Start { quiz, now })?;
        if let Some(previous) = unfinished {
            tracing::info!("discarded unfinished session for {previous}");
        }
        tracing::info!("started quiz {quiz_id}");
        Ok(self.snapshot())
    }

    pub fn select_answer(&mut self, option: usize) -> Result<SessionSnapshot, EngineError> {
        self.poll();
        self.dispatch(SessionEvent::SelectAnswer(option))?;
        Ok(self.snapshot())
    }

    pub fn next(&mut self) -> Result<SessionSnapshot, EngineError> {
        self.poll();
        self.dispatch(SessionEvent::Next)?;
        Ok(self.snapshot())
    }

    pub fn previous(&mut self) -> Result<SessionSnapshot, EngineError> {
        self.poll();
        self.dispatch(SessionEvent::Previous)?;
        Ok(self.snapshot())
    }

    /// Back to quiz selection from any state. The countdown, if any, is
    /// cancelled and nothing is recorded for an unfinished session. An
    /// overdue timeout still completes and records before the reset.
    pub fn restart(&mut self) -> SessionSnapshot {
        self.poll();
        // Restart never rejects.
        let _ = self.dispatch(SessionEvent::Restart);
        self.snapshot()
    }

    /// Deliver elapsed seconds to the countdown. Returns the result when
    /// this call forced a timed-out completion.
    pub fn poll(&mut self) -> Option<QuizResult> {
        let now = self.clock.now();
        match self.dispatch(SessionEvent::Tick { now }) {
            Ok(Effect::Completed(result)) => Some(result),
            _ => None,
        }
    }

    pub fn drain_notices(&mut self) -> Vec<EngineNotice> {
        mem::take(&mut self.notices)
    }

    fn dispatch(&mut self, event: SessionEvent) -> Result<Effect, EngineError> {
        let state = mem::take(&mut self.state);
        let transition = machine::apply(state, event);
        self.state = transition.state;

        match transition.effect {
            Ok(Effect::Completed(result)) => {
                self.on_completed(result);
                Ok(Effect::Completed(result))
            }
            Ok(Effect::Abandoned) => {
                tracing::info!("session abandoned");
                Ok(Effect::Abandoned)
            }
            Ok(effect) => Ok(effect),
            Err(err) => {
                tracing::debug!("rejected: {err}");
                Err(err)
            }
        }
    }

    /// Only reachable from `InProgress`, so it runs once per session.
    fn on_completed(&mut self, result: QuizResult) {
        let Some(quiz) = self.state.quiz().cloned() else {
            return;
        };
        tracing::info!(
            "completed {} with {}% ({}/{}){}",
            quiz.id,
            result.score_percent,
            result.correct_count,
            result.total_questions,
            if result.timed_out { " after timeout" } else { "" }
        );

        if let Err(e) = self
            .recorder
            .record_result(&quiz.id, &quiz.category, quiz.tier, &result)
        {
            tracing::warn!("could not record result for {}: {e}", quiz.id);
            self.notices.push(EngineNotice::PersistenceFailed(e));
        }
        self.notices.push(EngineNotice::Completed {
            quiz_id: quiz.id.clone(),
            result,
        });
    }
}

impl<C: Clock, R: ResultRecorder> Drop for QuizEngine<C, R> {
    fn drop(&mut self) {
        if self.state.phase() == SessionPhase::InProgress {
            let _ = self.dispatch(SessionEvent::Restart);
        }
    }
}
