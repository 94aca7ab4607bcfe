//! Session state machine.
//!
//! ```text
//! Selecting --Start--> InProgress --Next on last / timer expiry--> Completed
//!     ^                    |  ^                                      |
//!     |                    |  +-- SelectAnswer / Next / Previous     |
//!     +------Restart-------+-----------------Restart-----------------+
//! ```
//!
//! [`apply`] is pure: it consumes the current state and an event and returns
//! the next state plus what happened. A rejected event hands back the state
//! it was given, untouched.

use std::sync::Arc;
use std::time::Duration;

use crate::bank::model::{Question, Quiz};
use crate::engine::scoring;
use crate::session::answers::AnswerTracker;
use crate::session::error::EngineError;
use crate::session::result::QuizResult;
use crate::session::timer::Countdown;

#[derive(Clone, Debug)]
pub struct ActiveSession {
    pub quiz: Arc<Quiz>,
    pub current_index: usize,
    pub answers: AnswerTracker,
    pub countdown: Countdown,
}

impl ActiveSession {
    fn begin(quiz: Arc<Quiz>, now: Duration) -> Self {
        let countdown = Countdown::arm(quiz.time_limit_secs(), now);
        Self {
            answers: AnswerTracker::new(quiz.len()),
            quiz,
            current_index: 0,
            countdown,
        }
    }

    pub fn current_question(&self) -> &Question {
        &self.quiz.questions[self.current_index]
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.quiz.len()
    }

    fn complete(mut self, timed_out: bool) -> CompletedSession {
        self.countdown.cancel();
        let result = scoring::compute_result(&self.quiz.questions, self.answers.as_slice(), timed_out);
        CompletedSession {
            remaining_secs: self.countdown.remaining_secs(),
            quiz: self.quiz,
            current_index: self.current_index,
            answers: self.answers,
            result,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CompletedSession {
    pub quiz: Arc<Quiz>,
    pub current_index: usize,
    pub answers: AnswerTracker,
    pub remaining_secs: u32,
    pub result: QuizResult,
}

#[derive(Clone, Debug, Default)]
pub enum SessionState {
    #[default]
    Selecting,
    InProgress(ActiveSession),
    Completed(CompletedSession),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Selecting,
    InProgress,
    Completed,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Selecting => SessionPhase::Selecting,
            SessionState::InProgress(_) => SessionPhase::InProgress,
            SessionState::Completed(_) => SessionPhase::Completed,
        }
    }

    pub fn quiz(&self) -> Option<&Arc<Quiz>> {
        match self {
            SessionState::Selecting => None,
            SessionState::InProgress(s) => Some(&s.quiz),
            SessionState::Completed(s) => Some(&s.quiz),
        }
    }

    pub fn result(&self) -> Option<QuizResult> {
        match self {
            SessionState::Completed(s) => Some(s.result),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub enum SessionEvent {
    Start { quiz: Arc<Quiz>, now: Duration },
    SelectAnswer(usize),
    Next,
    Previous,
    Tick { now: Duration },
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Started,
    Answered,
    Moved,
    Ticked { ticks: u32 },
    Completed(QuizResult),
    Abandoned,
}

#[derive(Debug)]
pub struct Transition {
    pub state: SessionState,
    pub effect: Result<Effect, EngineError>,
}

impl Transition {
    fn ok(state: SessionState, effect: Effect) -> Self {
        Self {
            state,
            effect: Ok(effect),
        }
    }

    fn rejected(state: SessionState, err: EngineError) -> Self {
        Self {
            state,
            effect: Err(err),
        }
    }
}

pub fn apply(state: SessionState, event: SessionEvent) -> Transition {
    match event {
        SessionEvent::Start { quiz, now } => start(state, quiz, now),
        SessionEvent::Restart => restart(state),
        SessionEvent::Tick { now } => tick(state, now),
        SessionEvent::SelectAnswer(option) => navigate(state, |mut s| {
            let count = s.current_question().option_count();
            if option >= count {
                return Err((s, EngineError::OptionOutOfRange { index: option, count }));
            }
            s.answers.set(s.current_index, option);
            Ok((SessionState::InProgress(s), Effect::Answered))
        }),
        SessionEvent::Next => navigate(state, |mut s| {
            if !s.answers.is_answered(s.current_index) {
                return Err((s, EngineError::AnswerRequired));
            }
            if s.is_last_question() {
                let done = s.complete(false);
                let result = done.result;
                return Ok((SessionState::Completed(done), Effect::Completed(result)));
            }
            s.current_index += 1;
            Ok((SessionState::InProgress(s), Effect::Moved))
        }),
        SessionEvent::Previous => navigate(state, |mut s| {
            if s.current_index == 0 {
                return Err((s, EngineError::InvalidNavigation));
            }
            s.current_index -= 1;
            Ok((SessionState::InProgress(s), Effect::Moved))
        }),
    }
}

type NavOutcome = Result<(SessionState, Effect), (ActiveSession, EngineError)>;

fn navigate(state: SessionState, op: impl FnOnce(ActiveSession) -> NavOutcome) -> Transition {
    match state {
        SessionState::InProgress(active) => match op(active) {
            Ok((next, effect)) => Transition::ok(next, effect),
            Err((active, err)) => Transition::rejected(SessionState::InProgress(active), err),
        },
        SessionState::Completed(_) => Transition::rejected(state, EngineError::InvalidNavigation),
        SessionState::Selecting => Transition::rejected(state, EngineError::NoActiveSession),
    }
}

fn start(state: SessionState, quiz: Arc<Quiz>, now: Duration) -> Transition {
    if quiz.is_empty() {
        let id = quiz.id.clone();
        return Transition::rejected(state, EngineError::EmptyQuiz(id));
    }
    if let SessionState::InProgress(mut previous) = state {
        previous.countdown.cancel();
    }
    Transition::ok(
        SessionState::InProgress(ActiveSession::begin(quiz, now)),
        Effect::Started,
    )
}

fn restart(state: SessionState) -> Transition {
    match state {
        SessionState::InProgress(mut active) => {
            active.countdown.cancel();
            Transition::ok(SessionState::Selecting, Effect::Abandoned)
        }
        _ => Transition::ok(SessionState::Selecting, Effect::None),
    }
}

fn tick(state: SessionState, now: Duration) -> Transition {
    let mut active = match state {
        SessionState::InProgress(active) => active,
        other => return Transition::ok(other, Effect::None),
    };
    let report = active.countdown.advance_to(now);
    if report.expired {
        let done = active.complete(true);
        let result = done.result;
        return Transition::ok(SessionState::Completed(done), Effect::Completed(result));
    }
    let effect = if report.ticks > 0 {
        Effect::Ticked {
            ticks: report.ticks,
        }
    } else {
        Effect::None
    };
    Transition::ok(SessionState::InProgress(active), effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::model::{DifficultyTier, QuestionKind};

    fn quiz(n: usize, tier: DifficultyTier) -> Arc<Quiz> {
        Arc::new(Quiz {
            id: format!("quiz-{n}"),
            title: "Test".to_string(),
            description: String::new(),
            tier,
            category: "scripting".to_string(),
            questions: (0..n)
                .map(|i| Question {
                    id: format!("q{i}"),
                    prompt: format!("Question {i}"),
                    explanation: String::new(),
                    options: vec!["a".into(), "b".into(), "c".into()],
                    correct_index: 1,
                    kind: QuestionKind::MultipleChoice,
                })
                .collect(),
        })
    }

    fn started(n: usize) -> SessionState {
        let t = apply(
            SessionState::Selecting,
            SessionEvent::Start {
                quiz: quiz(n, DifficultyTier::Beginner),
                now: Duration::ZERO,
            },
        );
        assert!(matches!(t.effect, Ok(Effect::Started)));
        t.state
    }

    fn active(state: &SessionState) -> &ActiveSession {
        match state {
            SessionState::InProgress(s) => s,
            other => panic!("expected InProgress, got {:?}", other.phase()),
        }
    }

    #[test]
    fn start_arms_countdown_for_tier() {
        let t = apply(
            SessionState::Selecting,
            SessionEvent::Start {
                quiz: quiz(2, DifficultyTier::Advanced),
                now: Duration::ZERO,
            },
        );
        let s = active(&t.state);
        assert_eq!(s.current_index, 0);
        assert_eq!(s.answers.answered_count(), 0);
        assert_eq!(s.countdown.remaining_secs(), 600);
    }

    #[test]
    fn start_with_empty_quiz_is_rejected() {
        let t = apply(
            SessionState::Selecting,
            SessionEvent::Start {
                quiz: quiz(0, DifficultyTier::Beginner),
                now: Duration::ZERO,
            },
        );
        assert!(matches!(t.effect, Err(EngineError::EmptyQuiz(_))));
        assert_eq!(t.state.phase(), SessionPhase::Selecting);
    }

    #[test]
    fn next_requires_answer() {
        let t = apply(started(3), SessionEvent::Next);
        assert!(matches!(t.effect, Err(EngineError::AnswerRequired)));
        assert_eq!(active(&t.state).current_index, 0);
    }

    #[test]
    fn previous_at_first_question_is_invalid() {
        let t = apply(started(3), SessionEvent::Previous);
        assert!(matches!(t.effect, Err(EngineError::InvalidNavigation)));
        assert_eq!(active(&t.state).current_index, 0);
    }

    #[test]
    fn select_answer_out_of_range_is_rejected() {
        let t = apply(started(1), SessionEvent::SelectAnswer(3));
        assert!(matches!(
            t.effect,
            Err(EngineError::OptionOutOfRange { index: 3, count: 3 })
        ));
        assert!(!active(&t.state).answers.is_answered(0));
    }

    #[test]
    fn next_on_last_question_completes() {
        let s = apply(started(1), SessionEvent::SelectAnswer(1)).state;
        let t = apply(s, SessionEvent::Next);
        match t.effect {
            Ok(Effect::Completed(r)) => {
                assert_eq!(r.score_percent, 100);
                assert!(!r.timed_out);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(t.state.phase(), SessionPhase::Completed);
    }

    #[test]
    fn navigation_after_completion_is_invalid() {
        let s = apply(started(1), SessionEvent::SelectAnswer(1)).state;
        let done = apply(s, SessionEvent::Next).state;
        for event in [
            SessionEvent::Next,
            SessionEvent::Previous,
            SessionEvent::SelectAnswer(0),
        ] {
            let t = apply(done.clone(), event);
            assert!(matches!(t.effect, Err(EngineError::InvalidNavigation)));
            assert_eq!(t.state.phase(), SessionPhase::Completed);
        }
    }

    #[test]
    fn navigation_while_selecting_reports_no_session() {
        let t = apply(SessionState::Selecting, SessionEvent::Next);
        assert!(matches!(t.effect, Err(EngineError::NoActiveSession)));
    }

    #[test]
    fn tick_expiry_forces_timed_out_completion() {
        let s = apply(started(3), SessionEvent::SelectAnswer(1)).state;
        let t = apply(
            s,
            SessionEvent::Tick {
                now: Duration::from_secs(120),
            },
        );
        match t.effect {
            Ok(Effect::Completed(r)) => {
                assert!(r.timed_out);
                assert_eq!(r.correct_count, 1);
                assert_eq!(r.total_questions, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
        let SessionState::Completed(done) = &t.state else {
            panic!("expected Completed");
        };
        assert_eq!(done.remaining_secs, 0);
    }

    #[test]
    fn ticks_after_completion_are_ignored() {
        let s = apply(started(1), SessionEvent::SelectAnswer(1)).state;
        let done = apply(s, SessionEvent::Next).state;
        let t = apply(
            done,
            SessionEvent::Tick {
                now: Duration::from_secs(500),
            },
        );
        assert!(matches!(t.effect, Ok(Effect::None)));
        assert_eq!(t.state.result().map(|r| r.timed_out), Some(false));
    }

    #[test]
    fn restart_from_any_state_returns_to_selecting() {
        let from_progress = apply(started(2), SessionEvent::Restart);
        assert!(matches!(from_progress.effect, Ok(Effect::Abandoned)));
        assert_eq!(from_progress.state.phase(), SessionPhase::Selecting);

        let from_selecting = apply(SessionState::Selecting, SessionEvent::Restart);
        assert!(matches!(from_selecting.effect, Ok(Effect::None)));
        assert_eq!(from_selecting.state.phase(), SessionPhase::Selecting);
        let mut state = started(1);
        state = apply(state, SessionEvent::SelectAnswer(1)).state;
        let done = apply(state, SessionEvent::Next);
        assert!(matches!(done.effect, Ok(Effect::Completed(_))));
        let from_completed = apply(done.state, SessionEvent::Restart);
        assert!(matches!(from_completed.effect, Ok(Effect::None)));
        assert_eq!(from_completed.state.phase(), SessionPhase::Selecting);
        assert!(from_completed.state.result().is_none());
    }
}
