use clap::Subcommand;
use focuspoints_core::Settings;

use super::{open_engine, print_json};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a setting (e.g. "streak_target", "late_penalty")
    Get { key: String },
    /// Set a setting
    Set { key: String, value: String },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, _config) = open_engine()?;
    let store = engine.store();

    match action {
        SettingsAction::Get { key } => match engine.settings()?.get(&key) {
            Some(value) => println!("{value}"),
            None => {
                eprintln!("unknown setting: {key}");
                std::process::exit(1);
            }
        },
        SettingsAction::Set { key, value } => {
            Settings::set(store, &key, &value)?;
            println!("ok");
        }
        SettingsAction::List => {
            print_json(&engine.settings()?)?;
        }
        SettingsAction::Reset => {
            Settings::reset(store)?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
