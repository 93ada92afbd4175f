use clap::Subcommand;
use focuspoints_core::{Clock, TrialGate};

use super::{open_engine, print_json};

#[derive(Subcommand)]
pub enum TrialAction {
    /// Days left and paywall state
    Status,
    /// Activate the (prototype) subscription
    Subscribe,
}

pub fn run(action: TrialAction) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, config) = open_engine()?;
    let gate = TrialGate::new(engine.store(), config.trial.trial_days);

    match action {
        TrialAction::Status => {
            let status = gate.status(&engine.clock().now())?;
            print_json(&serde_json::json!({
                "enabled": config.trial.enabled,
                "trialDays": config.trial.trial_days,
                "status": status,
            }))?;
        }
        TrialAction::Subscribe => {
            gate.subscribe()?;
            println!("Subscription activated (prototype).");
        }
    }
    Ok(())
}
