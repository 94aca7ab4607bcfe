use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;

use crate::bank::QuestionBank;
use crate::config::Config;
use crate::engine::stats::{self, QuizSummary};
use crate::engine::{EngineNotice, QuizEngine};
use crate::session::clock::SystemClock;
use crate::session::error::EngineError;
use crate::session::machine::SessionPhase;
use crate::session::result::QuizResult;
use crate::session::snapshot::SessionSnapshot;
use crate::store::background::BackgroundRecorder;
use crate::store::json_store::JsonStore;
use crate::store::schema::ResultRecord;
use crate::ui::components::menu::QuizMenu;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    QuizSelect,
    Quiz,
    QuizResult,
    History,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    expires_at: Instant,
}

pub type Engine = QuizEngine<SystemClock, BackgroundRecorder>;

pub struct App {
    pub screen: AppScreen,
    pub engine: Engine,
    pub menu: QuizMenu,
    pub theme: &'static Theme,
    pub config: Config,
    pub history: Vec<ResultRecord>,
    pub summaries: HashMap<String, QuizSummary>,
    pub highlighted: usize,
    pub history_selected: usize,
    pub notice: Option<Notice>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, bank: QuestionBank) -> Result<Self> {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let reader = JsonStore::new(&config)?;
        let history = reader.load_history().results;
        let summaries = stats::summarize(&history);

        let recorder = BackgroundRecorder::spawn(JsonStore::new(&config)?);
        let menu = QuizMenu::new(&bank);
        let engine = QuizEngine::new(bank, SystemClock::new(), recorder);

        Ok(Self {
            screen: AppScreen::QuizSelect,
            engine,
            menu,
            theme,
            config,
            history,
            summaries,
            highlighted: 0,
            history_selected: 0,
            notice: None,
            should_quit: false,
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.engine.snapshot()
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            level,
            expires_at: Instant::now() + Duration::from_secs(self.config.notice_secs),
        });
    }

    pub fn start_quiz(&mut self, quiz_id: &str) {
        let started = self.engine.start_quiz(quiz_id);
        self.after_engine_call();
        match started {
            Ok(snapshot) => {
                self.highlighted = snapshot.selected_answer.unwrap_or(0);
                self.screen = AppScreen::Quiz;
            }
            Err(e) => self.report(e),
        }
    }

    pub fn start_selected_quiz(&mut self) {
        if let Some(id) = self.menu.selected_quiz_id().map(str::to_string) {
            self.start_quiz(&id);
        }
    }

    pub fn move_highlight(&mut self, delta: isize) {
        let count = self
            .snapshot()
            .current_question()
            .map(|q| q.option_count())
            .unwrap_or(0);
        if count == 0 {
            return;
        }
        self.highlighted = (self.highlighted as isize + delta).rem_euclid(count as isize) as usize;
    }

    pub fn select_option(&mut self, option: usize) {
        match self.engine.select_answer(option) {
            Ok(snapshot) => self.highlighted = snapshot.selected_answer.unwrap_or(option),
            Err(e) => self.report(e),
        }
        self.after_engine_call();
    }

    pub fn select_highlighted(&mut self) {
        self.select_option(self.highlighted);
    }

    pub fn next_question(&mut self) {
        match self.engine.next() {
            Ok(snapshot) => self.highlighted = snapshot.selected_answer.unwrap_or(0),
            Err(e) => self.report(e),
        }
        self.after_engine_call();
    }

    pub fn previous_question(&mut self) {
        match self.engine.previous() {
            Ok(snapshot) => self.highlighted = snapshot.selected_answer.unwrap_or(0),
            Err(e) => self.report(e),
        }
        self.after_engine_call();
    }

    /// Leave the running quiz without recording anything. If the time ran
    /// out first, the timed-out result is shown instead.
    pub fn abandon_quiz(&mut self) {
        self.engine.poll();
        self.after_engine_call();
        if self.engine.phase() == SessionPhase::Completed {
            return;
        }
        self.engine.restart();
        self.go_to_select();
    }

    pub fn go_to_select(&mut self) {
        if self.engine.phase() != SessionPhase::Selecting {
            self.engine.restart();
        }
        self.screen = AppScreen::QuizSelect;
    }

    pub fn go_to_history(&mut self) {
        self.history_selected = 0;
        self.screen = AppScreen::History;
    }

    pub fn history_down(&mut self) {
        if !self.history.is_empty() {
            self.history_selected = (self.history_selected + 1).min(self.history.len() - 1);
        }
    }

    pub fn history_up(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    pub fn on_tick(&mut self) {
        if self.engine.poll().is_some() {
            tracing::info!("quiz timed out");
        }
        self.after_engine_call();

        if self
            .notice
            .as_ref()
            .is_some_and(|n| Instant::now() >= n.expires_at)
        {
            self.notice = None;
        }
    }

    fn after_engine_call(&mut self) {
        for notice in self.engine.drain_notices() {
            match notice {
                EngineNotice::Completed { quiz_id, result } => self.on_completed(quiz_id, result),
                EngineNotice::PersistenceFailed(e) => {
                    self.notify(NoticeLevel::Error, format!("Result not saved: {e}"))
                }
            }
        }
        for e in self.engine.recorder().drain_failures() {
            self.notify(NoticeLevel::Error, format!("Result not saved: {e}"));
        }
    }

    fn on_completed(&mut self, quiz_id: String, result: QuizResult) {
        if let Some(quiz) = self.engine.bank().get(&quiz_id) {
            self.history.push(ResultRecord {
                quiz_id,
                category: quiz.category.clone(),
                tier: quiz.tier,
                result,
                recorded_at: Utc::now(),
            });
            let excess = self.history.len().saturating_sub(self.config.history_limit);
            self.history.drain(..excess);
            self.summaries = stats::summarize(&self.history);
        }

        if result.timed_out {
            self.notify(NoticeLevel::Warning, "Time's up! Unanswered questions count as wrong.");
        } else {
            self.notify(NoticeLevel::Info, "Quiz complete.");
        }
        if self.engine.phase() == SessionPhase::Completed {
            self.screen = AppScreen::QuizResult;
        }
    }

    fn report(&mut self, err: EngineError) {
        let level = match err {
            EngineError::AnswerRequired
            | EngineError::InvalidNavigation
            | EngineError::OptionOutOfRange { .. } => NoticeLevel::Warning,
            _ => NoticeLevel::Error,
        };
        self.notify(level, capitalize(&err.to_string()));
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
