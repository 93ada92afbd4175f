//! Trial and paywall gate.
//!
//! The trial clock starts at the first recorded open and is measured in
//! whole days of absolute distance from `now`, so a clock moved backwards
//! burns trial days exactly like one moved forwards.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::storage::{keys, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialStatus {
    pub started: bool,
    pub subscribed: bool,
    pub days_left: u32,
    pub paywalled: bool,
}

/// Whole days between two instants, ignoring direction.
pub fn days_elapsed(now: &DateTime<FixedOffset>, start: &DateTime<FixedOffset>) -> u32 {
    let days = (*now - *start).num_days().unsigned_abs();
    u32::try_from(days).unwrap_or(u32::MAX)
}

pub struct TrialGate<'s, S: Store + ?Sized> {
    store: &'s S,
    trial_days: u32,
}

impl<'s, S: Store + ?Sized> TrialGate<'s, S> {
    pub fn new(store: &'s S, trial_days: u32) -> Self {
        Self { store, trial_days }
    }

    pub fn trial_start(&self) -> Result<Option<DateTime<FixedOffset>>> {
        let Some(raw) = self.store.get(keys::TRIAL_START)? else {
            return Ok(None);
        };
        let start = DateTime::parse_from_rfc3339(&raw).map_err(|_| StoreError::Corrupt {
            key: keys::TRIAL_START.to_string(),
            value: raw.clone(),
        })?;
        Ok(Some(start))
    }

    /// Record the trial start unless one is already recorded.
    /// Returns `true` when this call started the trial.
    pub fn start_trial(&self, now: &DateTime<FixedOffset>) -> Result<bool> {
        if self.trial_start()?.is_some() {
            return Ok(false);
        }
        self.store.set(keys::TRIAL_START, &now.to_rfc3339())?;
        tracing::info!("Trial started ({} days)", self.trial_days);
        Ok(true)
    }

    pub fn is_subscribed(&self) -> Result<bool> {
        Ok(self.store.get_bool(keys::SUBSCRIBED, false)?)
    }

    /// Subscriptions never expire.
    pub fn subscribe(&self) -> Result<()> {
        self.store.set_bool(keys::SUBSCRIBED, true)?;
        tracing::info!("Subscription activated");
        Ok(())
    }

    /// `trial_days` when the trial has not started.
    pub fn days_left(&self, now: &DateTime<FixedOffset>) -> Result<u32> {
        Ok(match self.trial_start()? {
            None => self.trial_days,
            Some(start) => self.trial_days.saturating_sub(days_elapsed(now, &start)),
        })
    }

    pub fn is_paywalled(&self, now: &DateTime<FixedOffset>) -> Result<bool> {
        Ok(self.status(now)?.paywalled)
    }

    pub fn status(&self, now: &DateTime<FixedOffset>) -> Result<TrialStatus> {
        let started = self.trial_start()?.is_some();
        let subscribed = self.is_subscribed()?;
        let days_left = self.days_left(now)?;
        Ok(TrialStatus {
            started,
            subscribed,
            days_left,
            paywalled: !subscribed && started && days_left == 0,
        })
    }
}
