use roulette_core::Config;

use super::{open_model, print_event};

/// Zero points, streak and today's decision. Items are kept.
pub fn run(config: &Config, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes {
        return Err("this erases all points and the streak; pass --yes to confirm".into());
    }
    let mut model = open_model(config)?;
    print_event(model.reset_all_data()?)
}
