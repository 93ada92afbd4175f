//! # focuspoints Core Library
//!
//! Business logic for the focuspoints focus timer: a countdown session whose
//! minutes are judged clean or dirty, a points ledger fed by clean minutes,
//! daily streaks, reward codes, and an optional trial gate. The CLI binary
//! is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Session Engine**: one-second-tick state machine; the caller drives
//!   `tick()` and renders the returned events
//! - **Storage**: string-keyed scalar store (SQLite or in-memory) holding all
//!   state, plus TOML configuration for engine policy
//! - **Clock**: injected time source so hour- and day-based rules are testable
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: countdown, clean/dirty minutes, payouts, penalties
//! - [`StreakTracker`]: day rollover and streak counting
//! - [`PointsLedger`]: balance with clamped or unclamped policy
//! - [`RewardVault`]: threshold checks and first-reveal-wins codes
//! - [`TrialGate`]: trial days left and paywall state
//! - [`Store`]: persistence seam; [`Database`] and [`MemoryStore`] implement it

pub mod clock;
pub mod error;
pub mod events;
pub mod ledger;
pub mod multiplier;
pub mod rewards;
pub mod session;
pub mod settings;
pub mod storage;
pub mod streak;
pub mod trial;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError};
pub use events::{EndReason, Event};
pub use ledger::{LedgerPolicy, PointsLedger};
pub use multiplier::multiplier_for;
pub use rewards::{Brand, RewardStatus, RewardVault};
pub use session::{
    parse_minutes, AwardPolicy, EnginePolicy, Session, SessionEngine, SessionState, Snapshot,
};
pub use settings::Settings;
pub use storage::{Config, Database, MemoryStore, Store};
pub use streak::{Rollover, StreakState, StreakTracker};
pub use trial::{TrialGate, TrialStatus};
