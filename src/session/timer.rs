//! Per-session countdown.
//!
//! The countdown owns no thread. The host reads its clock and calls
//! [`Countdown::advance_to`]; every whole second elapsed since arming that has
//! not been delivered yet becomes one tick.

use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Seconds actually taken off `remaining_secs` by this call.
    pub ticks: u32,
    /// True only on the call whose tick reached zero.
    pub expired: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CountdownState {
    Running,
    Expired,
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct Countdown {
    limit_secs: u32,
    remaining_secs: u32,
    armed_at: Duration,
    delivered: u64,
    state: CountdownState,
}

impl Countdown {
    pub fn arm(limit_secs: u32, now: Duration) -> Self {
        Self {
            limit_secs,
            remaining_secs: limit_secs,
            armed_at: now,
            delivered: 0,
            state: CountdownState::Running,
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn limit_secs(&self) -> u32 {
        self.limit_secs
    }

    pub fn is_expired(&self) -> bool {
        self.state == CountdownState::Expired
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == CountdownState::Cancelled
    }

    /// 0.0 .. 1.0 share of the limit still left.
    pub fn fraction_left(&self) -> f64 {
        if self.limit_secs == 0 {
            return 0.0;
        }
        self.remaining_secs as f64 / self.limit_secs as f64
    }

    /// Stop for good. Later calls to `advance_to` report nothing.
    pub fn cancel(&mut self) {
        if self.state == CountdownState::Running {
            self.state = CountdownState::Cancelled;
        }
    }

    pub fn advance_to(&mut self, now: Duration) -> TickReport {
        if self.state != CountdownState::Running {
            return TickReport::default();
        }

        let elapsed = now.saturating_sub(self.armed_at).as_secs();
        let mut report = TickReport::default();
        while self.delivered < elapsed && self.remaining_secs > 0 {
            self.delivered += 1;
            self.remaining_secs -= 1;
            report.ticks += 1;
        }

        if self.remaining_secs == 0 {
            self.state = CountdownState::Expired;
            report.expired = true;
        }
        report
    }
}
