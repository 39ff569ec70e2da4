use roulette_core::level_of;

/// Print the level view for a point total.
pub fn run(points: u32) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&level_of(points))?);
    Ok(())
}
