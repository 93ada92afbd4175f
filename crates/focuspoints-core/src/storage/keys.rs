//! Key names for every persisted scalar.

pub const POINTS: &str = "fp_points";

pub const STREAK: &str = "fp_streak";
/// `YYYY-MM-DD` of the last observed day.
pub const LAST_DAY: &str = "fp_last_day";
pub const TODAY_CLEAN_MINS: &str = "fp_today_clean_mins";

pub const SESS_ACTIVE: &str = "fp_sess_active";
pub const SESS_TOTAL_SECS: &str = "fp_sess_total_secs";
pub const SESS_REMAIN_SECS: &str = "fp_sess_remain_secs";
pub const SESS_SEC_IN_MIN: &str = "fp_sess_sec_in_min";
pub const SESS_THIS_MIN_DIRTY: &str = "fp_sess_this_min_dirty";
pub const SESS_CLEAN_MINS: &str = "fp_sess_clean_mins";
pub const SESS_DIRTY_MINS: &str = "fp_sess_dirty_mins";

pub const SET_STREAK_TARGET: &str = "fp_set_streak_target";
pub const SET_BED_START: &str = "fp_set_bed_start";
pub const SET_BED_END: &str = "fp_set_bed_end";
pub const SET_BED_MULT: &str = "fp_set_bed_mult";
pub const SET_WORK_START: &str = "fp_set_work_start";
pub const SET_WORK_END: &str = "fp_set_work_end";
pub const SET_WORK_MULT: &str = "fp_set_work_mult";
pub const SET_LATE_HOUR: &str = "fp_set_late_hour";
pub const SET_LATE_PENALTY: &str = "fp_set_late_penalty";
pub const SET_LATE_MULT: &str = "fp_set_late_mult";

pub const TRIAL_START: &str = "fp_trial_start";
pub const SUBSCRIBED: &str = "fp_subscribed";

/// Reward codes live under `fp_code_<brand>`.
pub fn reward_code(brand: &str) -> String {
    format!("fp_code_{brand}")
}
