pub mod config;
pub mod rewards;
pub mod session;
pub mod settings;
pub mod status;
pub mod trial;

use focuspoints_core::{Config, Database, SessionEngine, SystemClock};
use serde::Serialize;

pub type Engine = SessionEngine<Database, SystemClock>;

/// Open the store, apply config policy, and run the app-open hook.
pub fn open_engine() -> Result<(Engine, Config), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let policy = config.engine_policy();
    tracing::debug!("Opening engine with {:?}", policy);
    let mut engine = SessionEngine::new(db, SystemClock, policy);
    for event in engine.bootstrap()? {
        tracing::info!("On open: {}", serde_json::to_string(&event)?);
    }
    Ok((engine, config))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `MM:SS`; minutes are not wrapped into hours.
pub fn format_mmss(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}
