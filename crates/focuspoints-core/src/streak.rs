//! Day rollover and streak accounting.
//!
//! A streak counts consecutive days whose clean minutes reached the
//! target. Judgment happens lazily: the first time a new calendar day is
//! observed, the previous day's tally is compared against the target and
//! then reset. Days on which nothing observed the clock are not judged
//! separately.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::clock::day_key;
use crate::error::{Result, StoreError};
use crate::storage::{keys, Store};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    /// `YYYY-MM-DD`, or `None` before the first observation.
    pub last_rollover_day: Option<String>,
    pub today_clean_minutes: u32,
    pub streak_count: u32,
}

/// What a rollover decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rollover {
    pub previous_day: String,
    pub today: String,
    /// Clean minutes credited to `previous_day`.
    pub clean_minutes: u32,
    pub target: u32,
    pub streak_before: u32,
    pub streak_after: u32,
}

impl Rollover {
    pub fn target_met(&self) -> bool {
        self.clean_minutes >= self.target
    }
}

pub struct StreakTracker<'s, S: Store + ?Sized> {
    store: &'s S,
}

impl<'s, S: Store + ?Sized> StreakTracker<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    pub fn state(&self) -> Result<StreakState> {
        let last = self
            .store
            .get(keys::LAST_DAY)?
            .filter(|day| !day.is_empty());
        Ok(StreakState {
            last_rollover_day: last,
            today_clean_minutes: self.get_u32(keys::TODAY_CLEAN_MINS)?,
            streak_count: self.get_u32(keys::STREAK)?,
        })
    }

    /// Judge the previous day if `now` falls on a new calendar day.
    ///
    /// Returns `None` on the very first observation and when the day has
    /// not changed.
    pub fn rollover_if_needed(
        &self,
        now: &DateTime<FixedOffset>,
        target: u32,
    ) -> Result<Option<Rollover>> {
        let today = day_key(now);
        let state = self.state()?;

        let Some(previous_day) = state.last_rollover_day else {
            self.store.set(keys::LAST_DAY, &today)?;
            return Ok(None);
        };
        if previous_day == today {
            return Ok(None);
        }

        let streak_after = if state.today_clean_minutes >= target {
            state.streak_count.saturating_add(1)
        } else {
            0
        };

        self.store.set_i64(keys::STREAK, i64::from(streak_after))?;
        self.store.set_i64(keys::TODAY_CLEAN_MINS, 0)?;
        self.store.set(keys::LAST_DAY, &today)?;

        tracing::info!(
            "Day rolled over {} -> {}: {}/{} clean minutes, streak {} -> {}",
            previous_day,
            today,
            state.today_clean_minutes,
            target,
            state.streak_count,
            streak_after
        );

        Ok(Some(Rollover {
            previous_day,
            today,
            clean_minutes: state.today_clean_minutes,
            target,
            streak_before: state.streak_count,
            streak_after,
        }))
    }

    /// Credit clean minutes to today's tally.
    pub fn credit_clean_minutes(&self, minutes: u32) -> Result<u32> {
        let next = self
            .get_u32(keys::TODAY_CLEAN_MINS)?
            .saturating_add(minutes);
        self.store.set_i64(keys::TODAY_CLEAN_MINS, i64::from(next))?;
        Ok(next)
    }

    fn get_u32(&self, key: &str) -> Result<u32> {
        let raw = self.store.get_i64(key, 0)?;
        Ok(u32::try_from(raw).map_err(|_| StoreError::Corrupt {
            key: key.to_string(),
            value: raw.to_string(),
        })?)
    }
}
