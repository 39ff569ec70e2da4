mod decision;
mod level;
mod snapshot;
mod state;
mod streak;

pub use decision::DecisionModel;
pub use level::{level_of, Level, LevelTier};
pub use snapshot::{keys, DecisionSnapshot};
pub use state::DailyState;
pub use streak::{is_streak_broken, streak_after_confirm};

/// Points granted for each confirmed decision.
pub const POINTS_PER_CONFIRM: u32 = 10;

/// Items a fresh store starts with.
pub fn default_items() -> Vec<String> {
    vec![
        "Pizza 🍕".to_string(),
        "Fried chicken 🍗".to_string(),
        "Tteokbokki 🌶️".to_string(),
    ]
}
