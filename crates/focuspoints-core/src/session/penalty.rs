//! Late-night penalty for ending a session inside `[late_hour, 6)`.

use chrono::{DateTime, FixedOffset, Utc};

use crate::clock::hour_of;
use crate::error::Result;
use crate::events::{EndReason, Event};
use crate::ledger::PointsLedger;
use crate::multiplier::is_late_night;
use crate::settings::Settings;
use crate::storage::Store;

/// Deduct `late_penalty` if `now` is in the late-night window.
///
/// Only session endings call this; a tick never does.
pub fn apply_late_penalty_if_needed<S: Store + ?Sized>(
    ledger: &PointsLedger<'_, S>,
    settings: &Settings,
    now: &DateTime<FixedOffset>,
    reason: EndReason,
) -> Result<Option<Event>> {
    if !is_late_night(settings, hour_of(now)) {
        return Ok(None);
    }
    let penalty = i64::from(settings.late_penalty);
    let balance = ledger.add(-penalty)?;
    tracing::warn!(
        "Late-night penalty: -{} points for ending after {}:00 ({:?})",
        penalty,
        settings.late_hour,
        reason
    );
    Ok(Some(Event::LatePenaltyApplied {
        penalty,
        late_hour: settings.late_hour,
        reason,
        balance,
        at: now.with_timezone(&Utc),
    }))
}
