//! Remaining-time arithmetic for countdown rendering

use chrono::{DateTime, Utc};
use std::fmt;

const MILLIS_PER_SECOND: u64 = 1000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Time left until a target, split into calendar-free units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainingDuration {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl RemainingDuration {
    pub fn from_millis(millis: u64) -> Self {
        Self {
            days: millis / MILLIS_PER_DAY,
            hours: ((millis / MILLIS_PER_HOUR) % 24) as u8,
            minutes: ((millis / MILLIS_PER_MINUTE) % 60) as u8,
            seconds: ((millis / MILLIS_PER_SECOND) % 60) as u8,
        }
    }
}

impl fmt::Display for RemainingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Pending(RemainingDuration),
    Live,
}

impl CountdownState {
    pub fn at(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        match remaining_millis(target, now) {
            0 => CountdownState::Live,
            millis => CountdownState::Pending(RemainingDuration::from_millis(millis)),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, CountdownState::Live)
    }

    pub fn render(&self, live_text: &str) -> String {
        match self {
            CountdownState::Pending(remaining) => remaining.to_string(),
            CountdownState::Live => live_text.to_string(),
        }
    }
}

/// `max(0, target - now)` in whole milliseconds.
pub fn remaining_millis(target: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (target - now).num_milliseconds().max(0) as u64
}
