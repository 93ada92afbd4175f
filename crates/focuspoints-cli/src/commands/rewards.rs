use clap::Subcommand;
use focuspoints_core::Brand;

use super::{open_engine, print_json};

#[derive(Subcommand)]
pub enum RewardsAction {
    /// Show thresholds, lock state and revealed codes
    List,
    /// Reveal a brand's code (starbucks, dunkin, amazon)
    Reveal { brand: String },
    /// Print every code, one per line, for copying
    Export,
}

pub fn run(action: RewardsAction) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, config) = open_engine()?;
    let vault = engine.rewards();

    match action {
        RewardsAction::List => {
            let mut statuses = Vec::new();
            for brand in Brand::ALL {
                statuses.push(vault.status(brand, config.rewards.required_points(brand))?);
            }
            print_json(&serde_json::json!({
                "points": engine.balance()?,
                "rewards": statuses,
            }))?;
        }
        RewardsAction::Reveal { brand } => {
            let brand: Brand = brand.parse()?;
            let code = vault.reveal_seeded(
                brand,
                config.rewards.required_points(brand),
                config.rewards.seed,
            )?;
            print_json(&serde_json::json!({ "brand": brand, "code": code }))?;
        }
        RewardsAction::Export => {
            println!("{}", vault.summary()?);
        }
    }
    Ok(())
}
