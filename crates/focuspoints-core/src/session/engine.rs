//! Focus session engine.
//!
//! The engine is a one-second-tick state machine. It does not use internal
//! threads - the caller is responsible for calling `tick()` once per second
//! while a session runs. All state lives in the injected [`Store`] and is
//! re-read at the start of every command. Each command runs inside
//! [`Store::atomic`], so separate processes driving the same store never
//! interleave two ticks.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Completed) -> Idle
//!            |                      ^
//!            +------- cancel -------+
//! ```
//!
//! `Completed` is never stored: the last tick folds straight back to
//! `Idle` and reports [`Event::SessionCompleted`].
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::new(store, SystemClock, EnginePolicy::default());
//! engine.bootstrap()?;
//! engine.start(25.0)?;
//! // Once per second:
//! for event in engine.tick()? { /* render */ }
//! ```

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::penalty::apply_late_penalty_if_needed;
use super::state::{Session, SessionState};
use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::events::{EndReason, Event};
use crate::ledger::{LedgerPolicy, PointsLedger};
use crate::multiplier::multiplier_for;
use crate::rewards::RewardVault;
use crate::settings::Settings;
use crate::storage::Store;
use crate::streak::{StreakState, StreakTracker};
use crate::trial::{TrialGate, TrialStatus};

/// When clean minutes turn into points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardPolicy {
    /// Each clean minute pays its time-of-day multiplier as it closes.
    #[default]
    PerMinute,
    /// One point per clean minute, paid when the countdown completes.
    LumpSum,
}

/// Fixed-for-life engine behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnginePolicy {
    pub award: AwardPolicy,
    pub ledger: LedgerPolicy,
    /// `Some(days)` turns on the trial/paywall gate.
    pub trial_days: Option<u32>,
}

/// Everything a presentation layer needs to draw one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: SessionState,
    pub session: Session,
    pub points: i64,
    pub streak: StreakState,
    pub settings: Settings,
    /// Multiplier a clean minute closing right now would earn.
    pub multiplier_now: i64,
    pub trial: Option<TrialStatus>,
    pub at: DateTime<Utc>,
}

/// Parse user-entered minutes. Accepts any finite number `>= 1`.
///
/// # Errors
/// `InvalidInput` for non-numeric, non-finite or sub-1 values.
pub fn parse_minutes(input: &str) -> Result<f64> {
    let minutes: f64 = input
        .trim()
        .parse()
        .map_err(|_| CoreError::invalid("minutes", "Enter a valid number of minutes"))?;
    validate_minutes(minutes)?;
    Ok(minutes)
}

fn validate_minutes(minutes: f64) -> Result<u32> {
    if !minutes.is_finite() || minutes < 1.0 {
        return Err(CoreError::invalid(
            "minutes",
            "Enter a valid number of minutes",
        ));
    }
    let seconds = (minutes * 60.0).round();
    if seconds > f64::from(u32::MAX) {
        return Err(CoreError::invalid("minutes", "session is too long"));
    }
    Ok(seconds as u32)
}

/// Core session engine.
///
/// Owns the store and clock it was built with; every mutation of points,
/// streaks and the session goes through its methods.
pub struct SessionEngine<S: Store, C: Clock> {
    store: S,
    clock: C,
    policy: EnginePolicy,
}

impl<S: Store, C: Clock> SessionEngine<S, C> {
    pub fn new(store: S, clock: C, policy: EnginePolicy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn policy(&self) -> EnginePolicy {
        self.policy
    }

    pub fn settings(&self) -> Result<Settings> {
        Settings::load(&self.store)
    }

    pub fn ledger(&self) -> PointsLedger<'_, S> {
        PointsLedger::new(&self.store, self.policy.ledger)
    }

    pub fn streaks(&self) -> StreakTracker<'_, S> {
        StreakTracker::new(&self.store)
    }

    pub fn rewards(&self) -> RewardVault<'_, S> {
        RewardVault::new(&self.store, self.policy.ledger)
    }

    /// `None` when the trial gate is disabled.
    pub fn trial(&self) -> Option<TrialGate<'_, S>> {
        self.policy
            .trial_days
            .map(|days| TrialGate::new(&self.store, days))
    }

    pub fn session(&self) -> Result<Session> {
        Session::load(&self.store)
    }

    pub fn state(&self) -> Result<SessionState> {
        Ok(self.session()?.state())
    }

    pub fn balance(&self) -> Result<i64> {
        self.ledger().balance()
    }

    pub fn multiplier_now(&self) -> Result<i64> {
        Ok(multiplier_for(&self.settings()?, &self.clock.now()))
    }

    /// Read-only view of everything; does not roll the day over.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let now = self.clock.now();
        let settings = self.settings()?;
        let session = self.session()?;
        let trial = match self.trial() {
            Some(gate) => Some(gate.status(&now)?),
            None => None,
        };
        Ok(Snapshot {
            state: session.state(),
            session,
            points: self.balance()?,
            streak: self.streaks().state()?,
            multiplier_now: multiplier_for(&settings, &now),
            settings,
            trial,
            at: now.with_timezone(&Utc),
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// App-open hook: fill in missing settings, judge yesterday, and start
    /// the trial clock on first open.
    pub fn bootstrap(&mut self) -> Result<Vec<Event>> {
        self.store.atomic(|| -> Result<Vec<Event>> {
            Settings::ensure_defaults(&self.store)?;
            let now = self.clock.now();
            let settings = self.settings()?;
            let mut events = Vec::new();
            self.roll_day(&now, &settings, &mut events)?;
            if let Some(gate) = self.trial() {
                gate.start_trial(&now)?;
            }
            Ok(events)
        })
    }

    pub fn rollover_if_needed(&mut self) -> Result<Vec<Event>> {
        self.store.atomic(|| -> Result<Vec<Event>> {
            let now = self.clock.now();
            let settings = self.settings()?;
            let mut events = Vec::new();
            self.roll_day(&now, &settings, &mut events)?;
            Ok(events)
        })
    }

    /// Begin a countdown of `minutes`, replacing any running session.
    ///
    /// # Errors
    /// `InvalidInput` for minute counts that are not finite or below 1,
    /// `Paywalled` when the trial gate is closed. State is untouched on
    /// either.
    pub fn start(&mut self, minutes: f64) -> Result<Vec<Event>> {
        self.store.atomic(|| -> Result<Vec<Event>> {
            let total_seconds = validate_minutes(minutes)?;
            let now = self.clock.now();
            let settings = self.settings()?;
            if let Some(gate) = self.trial() {
                if gate.is_paywalled(&now)? {
                    return Err(CoreError::Paywalled);
                }
            }

            let mut events = Vec::new();
            self.roll_day(&now, &settings, &mut events)?;

            let previous = self.session()?;
            if previous.active {
                tracing::warn!(
                    "Restart discarded running session ({} clean, {} dirty, {}s left)",
                    previous.clean_minutes,
                    previous.dirty_minutes,
                    previous.remaining_seconds
                );
                events.push(Event::SessionReplaced {
                    discarded_clean_minutes: previous.clean_minutes,
                    discarded_dirty_minutes: previous.dirty_minutes,
                    remaining_seconds: previous.remaining_seconds,
                    at: now.with_timezone(&Utc),
                });
            }

            Session::running(total_seconds).save(&self.store)?;
            tracing::info!("Session started: {} min ({}s)", minutes, total_seconds);
            events.push(Event::SessionStarted {
                minutes,
                total_seconds,
                at: now.with_timezone(&Utc),
            });
            Ok(events)
        })
    }

    /// Mark the current minute dirty. No-op while idle or already dirty.
    pub fn mark_dirty(&mut self) -> Result<Vec<Event>> {
        self.store.atomic(|| -> Result<Vec<Event>> {
            let mut session = self.session()?;
            if !session.active || session.current_minute_dirty {
                return Ok(Vec::new());
            }
            session.current_minute_dirty = true;
            session.save(&self.store)?;
            tracing::debug!("Minute marked dirty at second {}", session.seconds_into_minute);
            Ok(vec![Event::MinuteMarkedDirty {
                seconds_into_minute: session.seconds_into_minute,
                at: self.clock.now().with_timezone(&Utc),
            }])
        })
    }

    /// Advance the countdown by one second. No-op while idle.
    pub fn tick(&mut self) -> Result<Vec<Event>> {
        self.store.atomic(|| self.tick_once())
    }

    /// Tick through the rest of the current minute (up to 60 seconds),
    /// stopping early if the session completes.
    ///
    /// # Errors
    /// `NoActiveSession` while idle.
    pub fn fast_forward_minute(&mut self) -> Result<Vec<Event>> {
        self.store.atomic(|| -> Result<Vec<Event>> {
            if !self.session()?.active {
                return Err(CoreError::NoActiveSession);
            }
            let mut events = Vec::new();
            for _ in 0..60 {
                events.extend(self.tick_once()?);
                if !self.session()?.active {
                    break;
                }
            }
            Ok(events)
        })
    }

    /// Stop early. The minute in progress earns nothing.
    pub fn cancel(&mut self) -> Result<Vec<Event>> {
        self.store.atomic(|| -> Result<Vec<Event>> {
            let session = self.session()?;
            if !session.active {
                return Ok(Vec::new());
            }
            let now = self.clock.now();
            let settings = self.settings()?;
            let mut events = Vec::new();
            self.finish(session, &now, &settings, EndReason::Cancelled, &mut events)?;
            Ok(events)
        })
    }

    /// Wipe every key and restore default settings.
    pub fn reset_all(&mut self) -> Result<()> {
        self.store.atomic(|| -> Result<()> {
            self.store.clear()?;
            Settings::ensure_defaults(&self.store)?;
            tracing::info!("All state reset");
            Ok(())
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn tick_once(&self) -> Result<Vec<Event>> {
        let mut session = self.session()?;
        if !session.active {
            return Ok(Vec::new());
        }

        let now = self.clock.now();
        let settings = self.settings()?;
        let mut events = Vec::new();
        self.roll_day(&now, &settings, &mut events)?;

        if session.remaining_seconds == 0 {
            self.finish(session, &now, &settings, EndReason::Completed, &mut events)?;
            return Ok(events);
        }

        session.remaining_seconds -= 1;
        session.seconds_into_minute += 1;

        if session.seconds_into_minute >= 60 || session.remaining_seconds == 0 {
            self.close_minute(&mut session, &now, &settings, &mut events)?;
        }

        if session.remaining_seconds == 0 {
            self.finish(session, &now, &settings, EndReason::Completed, &mut events)?;
        } else {
            session.save(&self.store)?;
        }
        Ok(events)
    }

    fn roll_day(
        &self,
        now: &DateTime<FixedOffset>,
        settings: &Settings,
        events: &mut Vec<Event>,
    ) -> Result<()> {
        if let Some(rollover) = self
            .streaks()
            .rollover_if_needed(now, settings.streak_target)?
        {
            events.push(Event::DayRolledOver {
                previous_day: rollover.previous_day,
                today: rollover.today,
                clean_minutes: rollover.clean_minutes,
                target: rollover.target,
                streak: rollover.streak_after,
                at: now.with_timezone(&Utc),
            });
        }
        Ok(())
    }

    fn close_minute(
        &self,
        session: &mut Session,
        now: &DateTime<FixedOffset>,
        settings: &Settings,
        events: &mut Vec<Event>,
    ) -> Result<()> {
        let clean = !session.current_minute_dirty;
        if clean {
            session.clean_minutes += 1;
            if self.policy.award == AwardPolicy::PerMinute {
                self.streaks().credit_clean_minutes(1)?;
                let multiplier = multiplier_for(settings, now);
                let balance = self.ledger().add(multiplier)?;
                events.push(Event::PointsAwarded {
                    points: multiplier,
                    multiplier: Some(multiplier),
                    balance,
                    at: now.with_timezone(&Utc),
                });
            }
        } else {
            session.dirty_minutes += 1;
        }
        session.current_minute_dirty = false;
        session.seconds_into_minute = 0;

        tracing::debug!(
            "Minute closed {}: {} clean, {} dirty",
            if clean { "clean" } else { "dirty" },
            session.clean_minutes,
            session.dirty_minutes
        );
        events.push(Event::MinuteCompleted {
            clean,
            clean_minutes: session.clean_minutes,
            dirty_minutes: session.dirty_minutes,
            at: now.with_timezone(&Utc),
        });
        Ok(())
    }

    fn finish(
        &self,
        mut session: Session,
        now: &DateTime<FixedOffset>,
        settings: &Settings,
        reason: EndReason,
        events: &mut Vec<Event>,
    ) -> Result<()> {
        session.active = false;

        if reason == EndReason::Completed
            && self.policy.award == AwardPolicy::LumpSum
            && session.clean_minutes > 0
        {
            let points = i64::from(session.clean_minutes);
            self.streaks().credit_clean_minutes(session.clean_minutes)?;
            let balance = self.ledger().add(points)?;
            events.push(Event::PointsAwarded {
                points,
                multiplier: None,
                balance,
                at: now.with_timezone(&Utc),
            });
        }

        if let Some(penalty) =
            apply_late_penalty_if_needed(&self.ledger(), settings, now, reason)?
        {
            events.push(penalty);
        }

        session.save(&self.store)?;

        let at = now.with_timezone(&Utc);
        match reason {
            EndReason::Completed => {
                tracing::info!(
                    "Session complete: {} clean, {} dirty",
                    session.clean_minutes,
                    session.dirty_minutes
                );
                events.push(Event::SessionCompleted {
                    clean_minutes: session.clean_minutes,
                    dirty_minutes: session.dirty_minutes,
                    at,
                });
            }
            EndReason::Cancelled => {
                tracing::info!(
                    "Session cancelled with {}s left ({} clean, {} dirty)",
                    session.remaining_seconds,
                    session.clean_minutes,
                    session.dirty_minutes
                );
                events.push(Event::SessionCancelled {
                    clean_minutes: session.clean_minutes,
                    dirty_minutes: session.dirty_minutes,
                    remaining_seconds: session.remaining_seconds,
                    at,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::{keys, MemoryStore};
    use chrono::Duration;

    fn engine_at(rfc3339: &str, award: AwardPolicy) -> SessionEngine<MemoryStore, ManualClock> {
        let policy = EnginePolicy {
            award,
            ..EnginePolicy::default()
        };
        let mut engine = SessionEngine::new(MemoryStore::new(), ManualClock::at(rfc3339), policy);
        engine.bootstrap().unwrap();
        engine
    }

    fn tick_n<S: Store, C: Clock>(engine: &mut SessionEngine<S, C>, n: u32) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..n {
            events.extend(engine.tick().unwrap());
        }
        events
    }

    fn completion(events: &[Event]) -> Option<(u32, u32)> {
        events.iter().find_map(Event::completion)
    }

    #[test]
    fn one_clean_minute_per_minute_policy() {
        // 10:00 is inside the default work window (2x).
        let mut engine = engine_at("2024-03-01T10:00:00+00:00", AwardPolicy::PerMinute);
        engine.start(1.0).unwrap();
        let events = tick_n(&mut engine, 60);

        assert_eq!(completion(&events), Some((1, 0)));
        assert_eq!(engine.state().unwrap(), SessionState::Idle);
        assert_eq!(engine.balance().unwrap(), 2);
        assert_eq!(engine.streaks().state().unwrap().today_clean_minutes, 1);
    }

    #[test]
    fn one_clean_minute_lump_sum_policy() {
        let mut engine = engine_at("2024-03-01T10:00:00+00:00", AwardPolicy::LumpSum);
        engine.start(1.0).unwrap();
        let events = tick_n(&mut engine, 60);

        assert_eq!(completion(&events), Some((1, 0)));
        assert_eq!(engine.balance().unwrap(), 1);
        assert!(events.iter().any(|e| matches!(
            e,
            Event::PointsAwarded { points: 1, multiplier: None, .. }
        )));
        assert_eq!(engine.streaks().state().unwrap().today_clean_minutes, 1);
    }

    #[test]
    fn lump_sum_pays_nothing_mid_session() {
        let mut engine = engine_at("2024-03-01T10:00:00+00:00", AwardPolicy::LumpSum);
        engine.start(3.0).unwrap();
        tick_n(&mut engine, 120);
        assert_eq!(engine.balance().unwrap(), 0);
        assert_eq!(engine.session().unwrap().clean_minutes, 2);
    }

    #[test]
    fn lump_sum_cancel_forfeits_clean_minutes() {
        // 10:00 is outside the late-night window, so no penalty either.
        let mut engine = engine_at("2024-03-01T10:00:00+00:00", AwardPolicy::LumpSum);
        engine.start(3.0).unwrap();
        tick_n(&mut engine, 150);
        assert_eq!(engine.session().unwrap().clean_minutes, 2);

        let events = engine.cancel().unwrap();
        assert!(!events.iter().any(|e| matches!(e, Event::PointsAwarded { .. })));
        assert!(matches!(events.last(), Some(Event::SessionCancelled { .. })));
        assert_eq!(engine.balance().unwrap(), 0);
        assert_eq!(engine.streaks().state().unwrap().today_clean_minutes, 0);
        assert_eq!(engine.state().unwrap(), SessionState::Idle);
    }

    #[test]
    fn dirty_touch_spoils_only_its_minute() {
        let mut engine = engine_at("2024-03-01T16:00:00+00:00", AwardPolicy::PerMinute);
        engine.start(2.0).unwrap();
        tick_n(&mut engine, 30);
        assert_eq!(engine.mark_dirty().unwrap().len(), 1);
        let events = tick_n(&mut engine, 90);

        assert_eq!(completion(&events), Some((1, 1)));
        assert_eq!(engine.balance().unwrap(), 1);
    }

    #[test]
    fn mark_dirty_is_idempotent_and_idle_noop() {
        let mut engine = engine_at("2024-03-01T16:00:00+00:00", AwardPolicy::PerMinute);
        assert!(engine.mark_dirty().unwrap().is_empty());

        engine.start(1.0).unwrap();
        assert_eq!(engine.mark_dirty().unwrap().len(), 1);
        assert!(engine.mark_dirty().unwrap().is_empty());
        assert!(engine.session().unwrap().current_minute_dirty);
    }

    #[test]
    fn tick_while_idle_changes_nothing() {
        let mut engine = engine_at("2024-03-01T16:00:00+00:00", AwardPolicy::PerMinute);
        let before = engine.snapshot().unwrap();
        assert!(engine.tick().unwrap().is_empty());
        let after = engine.snapshot().unwrap();
        assert_eq!(before.session, after.session);
        assert_eq!(before.points, after.points);
    }

    #[test]
    fn start_rejects_bad_minutes_without_side_effects() {
        let mut engine = engine_at("2024-03-01T16:00:00+00:00", AwardPolicy::PerMinute);
        engine.start(2.0).unwrap();
        tick_n(&mut engine, 10);
        let before = engine.session().unwrap();

        for bad in [0.0, -3.0, 0.5, f64::NAN, f64::INFINITY] {
            let err = engine.start(bad).unwrap_err();
            assert!(matches!(err, CoreError::InvalidInput { .. }), "{bad}");
        }
        assert_eq!(engine.session().unwrap(), before);
    }

    #[test]
    fn parse_minutes_rejects_text() {
        assert!(matches!(
            parse_minutes("ten"),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(parse_minutes("").is_err());
        assert_eq!(parse_minutes(" 25 ").unwrap(), 25.0);
    }

    #[test]
    fn fractional_minutes_round_to_seconds() {
        let mut engine = engine_at("2024-03-01T16:00:00+00:00", AwardPolicy::PerMinute);
        engine.start(1.5).unwrap();
        assert_eq!(engine.session().unwrap().total_seconds, 90);
        let events = tick_n(&mut engine, 90);
        // The trailing half minute closes when the countdown hits zero.
        assert_eq!(completion(&events), Some((2, 0)));
    }

    #[test]
    fn restart_discards_progress() {
        let mut engine = engine_at("2024-03-01T16:00:00+00:00", AwardPolicy::LumpSum);
        engine.start(5.0).unwrap();
        tick_n(&mut engine, 150);

        let events = engine.start(1.0).unwrap();
        assert!(matches!(
            events[0],
            Event::SessionReplaced { discarded_clean_minutes: 2, .. }
        ));
        let session = engine.session().unwrap();
        assert_eq!(session.clean_minutes, 0);
        assert_eq!(session.remaining_seconds, 60);
        assert_eq!(engine.balance().unwrap(), 0);
    }

    #[test]
    fn cancel_in_late_night_applies_clamped_penalty() {
        let mut engine = engine_at("2024-03-01T01:00:00+00:00", AwardPolicy::PerMinute);
        engine.store().set_i64(keys::POINTS, 4).unwrap();
        engine.start(10.0).unwrap();
        tick_n(&mut engine, 5);

        let events = engine.cancel().unwrap();
        assert!(matches!(events[0], Event::LatePenaltyApplied { penalty: 10, .. }));
        assert!(matches!(events[1], Event::SessionCancelled { .. }));
        assert_eq!(engine.balance().unwrap(), 0);
        assert_eq!(engine.state().unwrap(), SessionState::Idle);
    }

    #[test]
    fn cancel_outside_late_night_keeps_points() {
        let mut engine = engine_at("2024-03-01T12:00:00+00:00", AwardPolicy::PerMinute);
        engine.start(3.0).unwrap();
        tick_n(&mut engine, 90);
        engine.cancel().unwrap();
        // One closed clean minute at 2x; the half minute in progress earns nothing.
        assert_eq!(engine.balance().unwrap(), 2);
        assert_eq!(engine.session().unwrap().clean_minutes, 1);
    }

    #[test]
    fn cancel_while_idle_is_noop() {
        let mut engine = engine_at("2024-03-01T01:00:00+00:00", AwardPolicy::PerMinute);
        engine.store().set_i64(keys::POINTS, 30).unwrap();
        assert!(engine.cancel().unwrap().is_empty());
        assert_eq!(engine.balance().unwrap(), 30);
    }

    #[test]
    fn late_night_completion_earns_zero_then_penalty() {
        let mut engine = engine_at("2024-03-01T02:00:00+00:00", AwardPolicy::PerMinute);
        engine.store().set_i64(keys::POINTS, 25).unwrap();
        engine.start(1.0).unwrap();
        let events = tick_n(&mut engine, 60);

        assert!(events
            .iter()
            .any(|e| matches!(e, Event::PointsAwarded { points: 0, .. })));
        assert_eq!(engine.balance().unwrap(), 15);
    }

    #[test]
    fn stale_zero_remaining_completes_on_next_tick() {
        let mut engine = engine_at("2024-03-01T12:00:00+00:00", AwardPolicy::PerMinute);
        let mut stale = Session::running(60);
        stale.remaining_seconds = 0;
        stale.save(engine.store()).unwrap();

        let events = engine.tick().unwrap();
        assert_eq!(completion(&events), Some((0, 0)));
        assert_eq!(engine.state().unwrap(), SessionState::Idle);
    }

    #[test]
    fn fast_forward_requires_running_session() {
        let mut engine = engine_at("2024-03-01T12:00:00+00:00", AwardPolicy::PerMinute);
        assert!(matches!(
            engine.fast_forward_minute(),
            Err(CoreError::NoActiveSession)
        ));

        engine.start(2.0).unwrap();
        engine.fast_forward_minute().unwrap();
        assert_eq!(engine.session().unwrap().clean_minutes, 1);
        let events = engine.fast_forward_minute().unwrap();
        assert_eq!(completion(&events), Some((2, 0)));
    }

    #[test]
    fn midnight_during_session_rolls_the_day() {
        let mut engine = engine_at("2024-03-01T23:59:30+00:00", AwardPolicy::PerMinute);
        engine.store().set_i64(keys::TODAY_CLEAN_MINS, 60).unwrap();
        engine.start(2.0).unwrap();

        let mut rolled = Vec::new();
        for _ in 0..60 {
            engine.clock().advance(Duration::seconds(1));
            rolled.extend(
                engine
                    .tick()
                    .unwrap()
                    .into_iter()
                    .filter(|e| matches!(e, Event::DayRolledOver { .. })),
            );
        }
        assert_eq!(rolled.len(), 1);
        let streak = engine.streaks().state().unwrap();
        assert_eq!(streak.streak_count, 1);
        // The minute closing at 00:00:30 lands on the new day at 0x.
        assert_eq!(streak.today_clean_minutes, 1);
    }

    #[test]
    fn paywall_blocks_start_once_trial_expires() {
        let policy = EnginePolicy {
            trial_days: Some(7),
            ..EnginePolicy::default()
        };
        let mut engine = SessionEngine::new(
            MemoryStore::new(),
            ManualClock::at("2024-06-01T12:00:00+00:00"),
            policy,
        );
        engine.bootstrap().unwrap();
        engine.start(1.0).unwrap();
        engine.cancel().unwrap();

        engine.clock().advance(Duration::days(8));
        assert!(matches!(engine.start(1.0), Err(CoreError::Paywalled)));

        engine.trial().unwrap().subscribe().unwrap();
        assert!(engine.start(1.0).is_ok());
    }

    #[test]
    fn reset_all_restores_defaults() {
        let mut engine = engine_at("2024-03-01T12:00:00+00:00", AwardPolicy::PerMinute);
        engine.store().set_i64(keys::POINTS, 99).unwrap();
        Settings::set(engine.store(), "streak_target", "30").unwrap();
        engine.start(5.0).unwrap();

        engine.reset_all().unwrap();
        assert_eq!(engine.balance().unwrap(), 0);
        assert_eq!(engine.settings().unwrap(), Settings::default());
        assert_eq!(engine.state().unwrap(), SessionState::Idle);
    }

    #[test]
    fn snapshot_reports_current_multiplier() {
        let engine = engine_at("2024-03-01T21:30:00+00:00", AwardPolicy::PerMinute);
        let snap = engine.snapshot().unwrap();
        assert_eq!(snap.multiplier_now, 2);
        assert_eq!(snap.state, SessionState::Idle);
        assert!(snap.trial.is_none());
    }
}
