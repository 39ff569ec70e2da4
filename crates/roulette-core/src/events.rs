use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::DailyState;

/// Every effective state change in the model produces an Event.
/// The presentation layer re-renders from them; no-ops produce none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    DecisionMade {
        item: String,
        at: DateTime<Utc>,
    },
    DecisionConfirmed {
        item: Option<String>,
        points_awarded: u32,
        points: u32,
        streak_count: u32,
        /// New level number when this confirmation crossed a tier boundary.
        level_up: Option<u8>,
        at: DateTime<Utc>,
    },
    DecisionRedone {
        discarded_item: Option<String>,
        at: DateTime<Utc>,
    },
    /// The daily rules changed something on load or resume.
    DailyStateReset {
        previous_state: DailyState,
        state: DailyState,
        cleared_item: Option<String>,
        streak_reset: bool,
        at: DateTime<Utc>,
    },
    DataReset {
        at: DateTime<Utc>,
    },
    ItemAdded {
        item: String,
        index: usize,
        at: DateTime<Utc>,
    },
    ItemsRemoved {
        removed: Vec<String>,
        at: DateTime<Utc>,
    },
    /// Full view of the model for rendering.
    StateSnapshot {
        state: DailyState,
        decided_item: Option<String>,
        items: Vec<String>,
        points: u32,
        streak_count: u32,
        level: u8,
        level_title: String,
        level_progress: f64,
        next_level_points: Option<u32>,
        at: DateTime<Utc>,
    },
}
