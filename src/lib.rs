//! Timed quiz engine for web-development question banks, with a terminal
//! front end.
//!
//! The engine lives in [`session`] (pure state machine, countdown, clock)
//! and [`engine`] (the façade a host drives). [`bank`] loads quizzes,
//! [`store`] persists results. [`app`], [`event`] and [`ui`] make up the TUI.

pub mod app;
pub mod bank;
pub mod config;
pub mod engine;
pub mod event;
pub mod session;
pub mod store;
pub mod ui;
