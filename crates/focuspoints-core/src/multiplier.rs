//! Time-of-day point multiplier.
//!
//! First match wins:
//!
//! ```text
//! [late_hour, 6)          -> late_mult
//! [bed_start, bed_end)    -> bed_mult
//! [work_start, work_end)  -> work_mult
//! otherwise               -> 1
//! ```
//!
//! Overlaps are resolved by this order alone.

use chrono::{DateTime, FixedOffset};

use crate::clock::hour_of;
use crate::settings::Settings;

/// Start-inclusive, end-exclusive.
pub fn in_window(hour: u32, start: u32, end: u32) -> bool {
    hour >= start && hour < end
}

pub fn is_late_night(settings: &Settings, hour: u32) -> bool {
    in_window(hour, settings.late_hour, 6)
}

pub fn multiplier_for_hour(settings: &Settings, hour: u32) -> i64 {
    if is_late_night(settings, hour) {
        return i64::from(settings.late_mult);
    }
    if in_window(hour, settings.bed_start, settings.bed_end) {
        return i64::from(settings.bed_mult);
    }
    if in_window(hour, settings.work_start, settings.work_end) {
        return i64::from(settings.work_mult);
    }
    1
}

pub fn multiplier_for(settings: &Settings, instant: &DateTime<FixedOffset>) -> i64 {
    multiplier_for_hour(settings, hour_of(instant))
}
