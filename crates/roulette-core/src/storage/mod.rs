mod config;
pub mod memory;
pub mod sqlite;

pub use config::Config;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// Returns the data directory, creating it if needed.
///
/// `ROULETTE_DATA_DIR` wins when set. Otherwise `~/.config/daily-roulette[-dev]/`
/// based on `ROULETTE_ENV` (set `ROULETTE_ENV=dev` for a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("ROULETTE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("ROULETTE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("daily-roulette-dev")
            } else {
                base_dir.join("daily-roulette")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Key-value persistence for the decision model.
///
/// Implementors provide raw string access and an atomic batch write; the
/// typed accessors decode on top of that. Every write the model issues is a
/// single batch, so a reader never observes half of an operation.
pub trait PreferenceStore {
    /// Raw stored value for `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Apply every entry of `batch` as one unit.
    fn write_batch(&mut self, batch: &PreferenceBatch) -> Result<(), StoreError>;

    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.get(key)
    }

    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>, StoreError> {
        self.get(key)?
            .map(|raw| serde_json::from_str::<Vec<String>>(&raw).map_err(|e| decode_error(key, e)))
            .transpose()
    }

    fn get_int(&self, key: &str) -> Result<Option<i64>, StoreError> {
        self.get(key)?
            .map(|raw| raw.trim().parse::<i64>().map_err(|e| decode_error(key, e)))
            .transpose()
    }

    fn get_date(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        self.get(key)?
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|d| d.with_timezone(&Utc))
                    .map_err(|e| decode_error(key, e))
            })
            .transpose()
    }
}

fn decode_error(key: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::Decode {
        key: key.to_string(),
        message: err.to_string(),
    }
}

/// An ordered set of writes applied together by [`PreferenceStore::write_batch`].
///
/// A `None` value removes the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceBatch {
    entries: Vec<(String, Option<String>)>,
}

impl PreferenceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_string(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        self.push(key, value.map(str::to_string))
    }

    pub fn set_string_list(&mut self, key: &str, values: &[String]) -> &mut Self {
        let encoded = serde_json::Value::from(values.to_vec()).to_string();
        self.push(key, Some(encoded))
    }

    pub fn set_int(&mut self, key: &str, value: i64) -> &mut Self {
        self.push(key, Some(value.to_string()))
    }

    pub fn set_date(&mut self, key: &str, value: Option<DateTime<Utc>>) -> &mut Self {
        self.push(key, value.map(|d| d.to_rfc3339()))
    }

    pub fn entries(&self) -> &[(String, Option<String>)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, key: &str, value: Option<String>) -> &mut Self {
        self.entries.push((key.to_string(), value));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn typed_accessors_decode_batch_encoding() {
        let mut store = MemoryStore::new();
        let when = Utc.with_ymd_and_hms(2026, 5, 1, 7, 30, 0).unwrap();
        let items = vec!["Tea".to_string(), "Coffee \"double\"".to_string()];

        let mut batch = PreferenceBatch::new();
        batch
            .set_string_list("items", &items)
            .set_int("points", 40)
            .set_date("when", Some(when))
            .set_string("pick", Some("Tea"));
        store.write_batch(&batch).unwrap();

        assert_eq!(store.get_string_list("items").unwrap(), Some(items));
        assert_eq!(store.get_int("points").unwrap(), Some(40));
        assert_eq!(store.get_date("when").unwrap(), Some(when));
        assert_eq!(store.get_string("pick").unwrap().as_deref(), Some("Tea"));
    }

    #[test]
    fn none_values_remove_keys() {
        let mut store = MemoryStore::new();
        let mut batch = PreferenceBatch::new();
        batch.set_string("pick", Some("Tea"));
        store.write_batch(&batch).unwrap();

        let mut batch = PreferenceBatch::new();
        batch.set_string("pick", None).set_date("when", None);
        store.write_batch(&batch).unwrap();

        assert!(store.get("pick").unwrap().is_none());
        assert!(store.get_date("when").unwrap().is_none());
    }

    #[test]
    fn malformed_values_report_the_key() {
        let mut store = MemoryStore::new();
        let mut batch = PreferenceBatch::new();
        batch.set_string("points", Some("lots"));
        store.write_batch(&batch).unwrap();

        match store.get_int("points") {
            Err(StoreError::Decode { key, .. }) => assert_eq!(key, "points"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
