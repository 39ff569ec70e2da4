use roulette_core::Config;

use super::{open_model, print_event};
use crate::render;

/// Show the profile card and today's screen.
pub fn run(config: &Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let model = open_model(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&model.state_snapshot())?);
    } else {
        println!("{}", render::today(model.snapshot(), &model.level()));
    }
    Ok(())
}

/// Discard today's completed decision.
pub fn redo(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut model = open_model(config)?;
    print_event(model.redo_decision()?)
}
