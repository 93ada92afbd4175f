mod engine;
mod penalty;
mod state;

pub use engine::{parse_minutes, AwardPolicy, EnginePolicy, SessionEngine, Snapshot};
pub use penalty::apply_late_penalty_if_needed;
pub use state::{Session, SessionState};
