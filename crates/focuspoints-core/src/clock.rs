//! Wall-clock abstraction.
//!
//! Every time-sensitive rule (multipliers, rollover, penalties, trial
//! expiry) reads the time through a [`Clock`], so tests can pin the hour and
//! the calendar day.

use std::cell::Cell;

use chrono::{DateTime, Duration, FixedOffset, Local, Timelike};

/// Source of the current local time.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Hour of day (0-23) in the instant's own offset.
pub fn hour_of(instant: &DateTime<FixedOffset>) -> u32 {
    instant.hour()
}

/// Calendar-day identity, `YYYY-MM-DD`.
pub fn day_key(instant: &DateTime<FixedOffset>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// The machine's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<FixedOffset>>,
}

impl ManualClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// Parse an RFC 3339 timestamp, e.g. `2024-03-01T10:00:00+00:00`.
    ///
    /// # Panics
    /// Panics on malformed input; intended for fixtures.
    pub fn at(rfc3339: &str) -> Self {
        match DateTime::parse_from_rfc3339(rfc3339) {
            Ok(now) => Self::new(now),
            Err(e) => panic!("bad fixture timestamp {rfc3339:?}: {e}"),
        }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}
