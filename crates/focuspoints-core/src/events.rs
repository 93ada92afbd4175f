use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    Completed,
    Cancelled,
}

/// Every state change in the engine produces an Event.
/// The presentation layer renders them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        minutes: f64,
        total_seconds: u32,
        at: DateTime<Utc>,
    },
    /// A new start replaced an in-flight session; its progress is dropped.
    SessionReplaced {
        discarded_clean_minutes: u32,
        discarded_dirty_minutes: u32,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    /// The current minute was touched and will not earn points.
    MinuteMarkedDirty {
        seconds_into_minute: u32,
        at: DateTime<Utc>,
    },
    MinuteCompleted {
        clean: bool,
        clean_minutes: u32,
        dirty_minutes: u32,
        at: DateTime<Utc>,
    },
    PointsAwarded {
        points: i64,
        /// Time-of-day multiplier; `None` for lump-sum payouts.
        multiplier: Option<i64>,
        balance: i64,
        at: DateTime<Utc>,
    },
    LatePenaltyApplied {
        penalty: i64,
        late_hour: u32,
        reason: EndReason,
        balance: i64,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        clean_minutes: u32,
        dirty_minutes: u32,
        at: DateTime<Utc>,
    },
    SessionCancelled {
        clean_minutes: u32,
        dirty_minutes: u32,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    DayRolledOver {
        previous_day: String,
        today: String,
        clean_minutes: u32,
        target: u32,
        streak: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// `(clean, dirty)` when this event ends a session naturally.
    pub fn completion(&self) -> Option<(u32, u32)> {
        match self {
            Event::SessionCompleted {
                clean_minutes,
                dirty_minutes,
                ..
            } => Some((*clean_minutes, *dirty_minutes)),
            _ => None,
        }
    }
}
