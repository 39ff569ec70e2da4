use clap::Subcommand;
use roulette_core::Config;

use super::{open_model, print_event};
use crate::render;

#[derive(Subcommand)]
pub enum ItemsAction {
    /// List items with their indices
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an item
    Add {
        /// Item text (blank text is ignored)
        text: String,
    },
    /// Remove items by index
    Remove {
        /// Indices as shown by `items list`
        #[arg(required = true)]
        indices: Vec<usize>,
    },
}

pub fn run(config: &Config, action: ItemsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut model = open_model(config)?;

    match action {
        ItemsAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(model.items())?);
            } else {
                println!("{}", render::item_list(model.items()));
            }
        }
        ItemsAction::Add { text } => print_event(model.add_item(&text)?)?,
        ItemsAction::Remove { indices } => print_event(model.remove_items(&indices)?)?,
    }
    Ok(())
}
