pub mod config;
pub mod items;
pub mod level;
pub mod play;
pub mod reset;
pub mod status;

use roulette_core::{Config, DecisionModel, Event, SqliteStore, SystemClock};

pub type Model = DecisionModel<SqliteStore, SystemClock>;

/// Open the on-disk store and load the model for one session.
pub fn open_model(config: &Config) -> Result<Model, Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    let model = DecisionModel::load_with(store, config.clock(), config.default_items.clone())?;
    Ok(model)
}

/// Print an operation's event as JSON, or a no-op marker.
pub fn print_event(event: Option<Event>) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
        None => println!("{{\"type\": \"NoChange\"}}"),
    }
    Ok(())
}
