use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::storage::{keys, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
}

/// The single focus session, as persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub active: bool,
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    /// 0..=59 between ticks.
    pub seconds_into_minute: u32,
    pub current_minute_dirty: bool,
    pub clean_minutes: u32,
    pub dirty_minutes: u32,
}

impl Session {
    /// A fresh running session of `total_seconds`.
    pub fn running(total_seconds: u32) -> Self {
        Self {
            active: true,
            total_seconds,
            remaining_seconds: total_seconds,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SessionState {
        if self.active {
            SessionState::Running
        } else {
            SessionState::Idle
        }
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.total_seconds.saturating_sub(self.remaining_seconds)
    }

    pub fn closed_minutes(&self) -> u32 {
        self.clean_minutes + self.dirty_minutes
    }

    pub fn load<S: Store + ?Sized>(store: &S) -> Result<Self> {
        let remaining_seconds = get_u32(store, keys::SESS_REMAIN_SECS, 0)?;
        Ok(Self {
            active: store.get_bool(keys::SESS_ACTIVE, false)?,
            total_seconds: get_u32(store, keys::SESS_TOTAL_SECS, i64::from(remaining_seconds))?,
            remaining_seconds,
            seconds_into_minute: get_u32(store, keys::SESS_SEC_IN_MIN, 0)?,
            current_minute_dirty: store.get_bool(keys::SESS_THIS_MIN_DIRTY, false)?,
            clean_minutes: get_u32(store, keys::SESS_CLEAN_MINS, 0)?,
            dirty_minutes: get_u32(store, keys::SESS_DIRTY_MINS, 0)?,
        })
    }

    pub fn save<S: Store + ?Sized>(&self, store: &S) -> Result<()> {
        store.set_bool(keys::SESS_ACTIVE, self.active)?;
        store.set_i64(keys::SESS_TOTAL_SECS, i64::from(self.total_seconds))?;
        store.set_i64(keys::SESS_REMAIN_SECS, i64::from(self.remaining_seconds))?;
        store.set_i64(keys::SESS_SEC_IN_MIN, i64::from(self.seconds_into_minute))?;
        store.set_bool(keys::SESS_THIS_MIN_DIRTY, self.current_minute_dirty)?;
        store.set_i64(keys::SESS_CLEAN_MINS, i64::from(self.clean_minutes))?;
        store.set_i64(keys::SESS_DIRTY_MINS, i64::from(self.dirty_minutes))?;
        Ok(())
    }
}

fn get_u32<S: Store + ?Sized>(store: &S, key: &str, fallback: i64) -> Result<u32> {
    let raw = store.get_i64(key, fallback)?;
    Ok(u32::try_from(raw).map_err(|_| StoreError::Corrupt {
        key: key.to_string(),
        value: raw.to_string(),
    })?)
}
