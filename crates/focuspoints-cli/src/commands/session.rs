use std::time::Duration;

use clap::Subcommand;
use focuspoints_core::{parse_minutes, Event, SessionState};

use super::{format_mmss, open_engine, print_json};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a countdown, replacing any running session
    Start {
        /// Session length in minutes (at least 1)
        minutes: String,
    },
    /// Advance the countdown by one or more seconds
    Tick {
        #[arg(long, default_value = "1")]
        count: u32,
    },
    /// Mark the current minute dirty
    Touch,
    /// Stop the running session early
    Cancel,
    /// Skip ahead one minute
    Ff,
    /// Print the session snapshot as JSON
    Status,
    /// Tick once per second until the session ends, printing events
    Run {
        /// Start a new session of this many minutes first
        minutes: Option<String>,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut engine, _config) = open_engine()?;

    match action {
        SessionAction::Start { minutes } => {
            let minutes = parse_minutes(&minutes)?;
            print_json(&engine.start(minutes)?)?;
        }
        SessionAction::Tick { count } => {
            let mut events = Vec::new();
            for _ in 0..count {
                events.extend(engine.tick()?);
                if engine.state()? == SessionState::Idle {
                    break;
                }
            }
            print_json(&events)?;
        }
        SessionAction::Touch => {
            print_json(&engine.mark_dirty()?)?;
        }
        SessionAction::Cancel => {
            print_json(&engine.cancel()?)?;
        }
        SessionAction::Ff => {
            print_json(&engine.fast_forward_minute()?)?;
        }
        SessionAction::Status => {
            let snapshot = engine.snapshot()?;
            let mut json = serde_json::to_value(&snapshot)?;
            json["time_left"] = match snapshot.state {
                SessionState::Running => format_mmss(snapshot.session.remaining_seconds).into(),
                SessionState::Idle => serde_json::Value::Null,
            };
            print_json(&json)?;
        }
        SessionAction::Run { minutes } => {
            if let Some(minutes) = minutes {
                let minutes = parse_minutes(&minutes)?;
                print_events(&engine.start(minutes)?)?;
            }
            // One tick per iteration; ticks never overlap.
            tracing::debug!("Driving session until idle");
            while engine.state()? == SessionState::Running {
                std::thread::sleep(Duration::from_secs(1));
                print_events(&engine.tick()?)?;
            }
        }
    }
    Ok(())
}

/// One compact JSON object per line.
fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}
