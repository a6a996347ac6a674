//! Quiz countdown.
//!
//! The countdown holds no clock of its own: the front end calls
//! [`Countdown::tick`] once per second. Expiry is reported exactly once.

use std::fmt;

/// What a tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting; carries the seconds left.
    Running(u64),
    /// This tick reached zero.
    Expired,
    /// Already expired or cancelled; nothing happened.
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u64,
    stopped: bool,
}

impl Countdown {
    pub fn new(total_secs: u64) -> Self {
        Self {
            remaining: total_secs,
            stopped: total_secs == 0,
        }
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.stopped {
            return TickOutcome::Stopped;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.stopped = true;
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining)
        }
    }

    /// Stop without expiring, e.g. on manual submit.
    pub fn cancel(&mut self) {
        self.stopped = true;
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        !self.stopped
    }

    /// `Time Remaining: mm:ss`
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time Remaining: {:02}:{:02}",
            self.remaining / 60,
            self.remaining % 60
        )
    }
}
