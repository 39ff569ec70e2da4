//! The persisted fields of the decision model and their store layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::state::DailyState;
use crate::error::StoreError;
use crate::storage::{PreferenceBatch, PreferenceStore};

/// Store keys, namespaced and versioned.
pub mod keys {
    pub const ITEMS: &str = "daily_roulette.v1.items";
    pub const POINTS: &str = "daily_roulette.v1.points";
    pub const STREAK: &str = "daily_roulette.v1.streak";
    pub const DAILY_STATE: &str = "daily_roulette.v1.daily_state";
    pub const DECIDED_ITEM: &str = "daily_roulette.v1.decided_item";
    pub const LAST_DECISION_AT: &str = "daily_roulette.v1.last_decision_at";
    pub const LAST_SUCCESS_AT: &str = "daily_roulette.v1.last_success_at";

    pub const ALL: [&str; 7] = [
        ITEMS,
        POINTS,
        STREAK,
        DAILY_STATE,
        DECIDED_ITEM,
        LAST_DECISION_AT,
        LAST_SUCCESS_AT,
    ];
}

/// Every field the model owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSnapshot {
    pub items: Vec<String>,
    pub points: u32,
    pub streak_count: u32,
    pub daily_state: DailyState,
    pub decided_item: Option<String>,
    pub last_decision_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
}

impl DecisionSnapshot {
    /// Fresh state seeded with `items`.
    pub fn with_items(items: Vec<String>) -> Self {
        Self {
            items,
            points: 0,
            streak_count: 0,
            daily_state: DailyState::ReadyToSpin,
            decided_item: None,
            last_decision_at: None,
            last_success_at: None,
        }
    }

    /// Read every field from `store`.
    ///
    /// Missing keys take their defaults (`default_items` for the list).
    /// Values that fail to decode are logged and replaced by defaults; only
    /// store failures are returned. The result is normalized.
    pub fn load<S: PreferenceStore + ?Sized>(
        store: &S,
        default_items: Vec<String>,
    ) -> Result<Self, StoreError> {
        let items = or_default(store.get_string_list(keys::ITEMS))?.unwrap_or(default_items);
        let points = counter(keys::POINTS, or_default(store.get_int(keys::POINTS))?);
        let streak_count = counter(keys::STREAK, or_default(store.get_int(keys::STREAK))?);
        let daily_state = match store.get_string(keys::DAILY_STATE)? {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!(key = keys::DAILY_STATE, "{e}, using ready_to_spin");
                DailyState::ReadyToSpin
            }),
            None => DailyState::ReadyToSpin,
        };
        let decided_item = store.get_string(keys::DECIDED_ITEM)?;
        let last_decision_at = or_default(store.get_date(keys::LAST_DECISION_AT))?;
        let last_success_at = or_default(store.get_date(keys::LAST_SUCCESS_AT))?;

        let mut snapshot = Self {
            items,
            points,
            streak_count,
            daily_state,
            decided_item,
            last_decision_at,
            last_success_at,
        };
        snapshot.normalize();
        Ok(snapshot)
    }

    /// A batch writing every field.
    pub fn to_batch(&self) -> PreferenceBatch {
        let mut batch = PreferenceBatch::new();
        batch
            .set_string_list(keys::ITEMS, &self.items)
            .set_int(keys::POINTS, i64::from(self.points))
            .set_int(keys::STREAK, i64::from(self.streak_count))
            .set_string(keys::DAILY_STATE, Some(self.daily_state.as_str()))
            .set_string(keys::DECIDED_ITEM, self.decided_item.as_deref())
            .set_date(keys::LAST_DECISION_AT, self.last_decision_at)
            .set_date(keys::LAST_SUCCESS_AT, self.last_success_at);
        batch
    }

    /// Repair a state/item pair that breaks "item present iff a decision is held".
    ///
    /// Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        match (self.daily_state.holds_decision(), self.decided_item.is_some()) {
            (true, false) => {
                warn!(state = %self.daily_state, "stored state has no decided item, resetting to ready_to_spin");
                self.daily_state = DailyState::ReadyToSpin;
                true
            }
            (false, true) => {
                warn!("stored decided item without a held decision, clearing it");
                self.decided_item = None;
                true
            }
            _ => false,
        }
    }
}

fn or_default<T>(result: Result<Option<T>, StoreError>) -> Result<Option<T>, StoreError> {
    match result {
        Err(StoreError::Decode { key, message }) => {
            warn!(%key, %message, "discarding undecodable stored value");
            Ok(None)
        }
        other => other,
    }
}

fn counter(key: &str, value: Option<i64>) -> u32 {
    match value {
        None => 0,
        Some(n) => u32::try_from(n).unwrap_or_else(|_| {
            warn!(key, value = n, "stored counter out of range, using 0");
            0
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn seeded_store(entries: &[(&str, &str)]) -> MemoryStore {
        let mut store = MemoryStore::new();
        let mut batch = PreferenceBatch::new();
        for (key, value) in entries {
            batch.set_string(key, Some(value));
        }
        store.write_batch(&batch).unwrap();
        store
    }

    #[test]
    fn empty_store_loads_defaults() {
        let store = MemoryStore::new();
        let snapshot = DecisionSnapshot::load(&store, vec!["A".into()]).unwrap();
        assert_eq!(snapshot, DecisionSnapshot::with_items(vec!["A".into()]));
    }

    #[test]
    fn saved_empty_list_is_not_replaced_by_defaults() {
        let store = seeded_store(&[(keys::ITEMS, "[]")]);
        let snapshot = DecisionSnapshot::load(&store, vec!["A".into()]).unwrap();
        assert!(snapshot.items.is_empty());
    }

    #[test]
    fn batch_round_trip() {
        let snapshot = DecisionSnapshot {
            items: vec!["Soup".into(), "Soup".into(), "Bibimbap".into()],
            points: 130,
            streak_count: 6,
            daily_state: DailyState::Completed,
            decided_item: Some("Bibimbap".into()),
            last_decision_at: Some(Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()),
            last_success_at: Some(Utc.with_ymd_and_hms(2026, 2, 1, 12, 30, 0).unwrap()),
        };
        let mut store = MemoryStore::new();
        store.write_batch(&snapshot.to_batch()).unwrap();

        let loaded = DecisionSnapshot::load(&store, Vec::new()).unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(store.len(), keys::ALL.len());
    }

    #[test]
    fn undecodable_values_fall_back() {
        let store = seeded_store(&[
            (keys::POINTS, "ten"),
            (keys::STREAK, "-3"),
            (keys::DAILY_STATE, "spinning"),
            (keys::LAST_SUCCESS_AT, "yesterday"),
        ]);
        let snapshot = DecisionSnapshot::load(&store, Vec::new()).unwrap();
        assert_eq!(snapshot.points, 0);
        assert_eq!(snapshot.streak_count, 0);
        assert_eq!(snapshot.daily_state, DailyState::ReadyToSpin);
        assert!(snapshot.last_success_at.is_none());
    }

    #[test]
    fn normalize_repairs_state_without_item() {
        let store = seeded_store(&[(keys::DAILY_STATE, "decision_made")]);
        let snapshot = DecisionSnapshot::load(&store, Vec::new()).unwrap();
        assert_eq!(snapshot.daily_state, DailyState::ReadyToSpin);
        assert!(snapshot.decided_item.is_none());
    }

    #[test]
    fn normalize_drops_item_without_decision() {
        let store = seeded_store(&[
            (keys::DAILY_STATE, "ready_to_spin"),
            (keys::DECIDED_ITEM, "Soup"),
        ]);
        let snapshot = DecisionSnapshot::load(&store, Vec::new()).unwrap();
        assert!(snapshot.decided_item.is_none());
    }
}
