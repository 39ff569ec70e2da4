use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Today's progress.
///
/// ```text
/// ReadyToSpin -> DecisionMade -> Completed -> (redo) ReadyToSpin
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyState {
    #[default]
    ReadyToSpin,
    DecisionMade,
    Completed,
}

impl DailyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DailyState::ReadyToSpin => "ready_to_spin",
            DailyState::DecisionMade => "decision_made",
            DailyState::Completed => "completed",
        }
    }

    /// Whether a decided item must be present in this state.
    pub fn holds_decision(&self) -> bool {
        !matches!(self, DailyState::ReadyToSpin)
    }
}

impl fmt::Display for DailyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DailyState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ready_to_spin" => Ok(DailyState::ReadyToSpin),
            "decision_made" => Ok(DailyState::DecisionMade),
            "completed" => Ok(DailyState::Completed),
            other => Err(format!("unknown daily state: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_its_own_names() {
        for state in [
            DailyState::ReadyToSpin,
            DailyState::DecisionMade,
            DailyState::Completed,
        ] {
            assert_eq!(state.as_str().parse::<DailyState>().unwrap(), state);
        }
        assert!("spinning".parse::<DailyState>().is_err());
    }

    #[test]
    fn serde_name_matches_store_name() {
        let json = serde_json::to_string(&DailyState::DecisionMade).unwrap();
        assert_eq!(json, "\"decision_made\"");
    }
}
