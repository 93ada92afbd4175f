use super::{open_engine, print_json};

/// Header numbers: points, streak, today's clean minutes.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (engine, _config) = open_engine()?;
    let streak = engine.streaks().state()?;
    print_json(&serde_json::json!({
        "points": engine.balance()?,
        "streak": streak.streak_count,
        "today_clean_minutes": streak.today_clean_minutes,
        "multiplier_now": engine.multiplier_now()?,
    }))
}

pub fn reset() -> Result<(), Box<dyn std::error::Error>> {
    let (mut engine, _config) = open_engine()?;
    engine.reset_all()?;
    println!("Reset done.");
    Ok(())
}
