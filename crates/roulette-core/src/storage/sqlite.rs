//! SQLite-backed preference store.
//!
//! Values live in a single `kv` table. A batch is applied inside one
//! transaction, so the seven model fields are always written together.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, PreferenceBatch, PreferenceStore};
use crate::error::{CoreError, StoreError};

/// SQLite database holding the preference key-value pairs.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at `<data_dir>/roulette.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("roulette.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    /// Every stored key, sorted.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

impl PreferenceStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_batch(&mut self, batch: &PreferenceBatch) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        for (key, value) in batch.entries() {
            match value {
                Some(v) => {
                    tx.execute(
                        "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                        params![key, v],
                    )?;
                }
                None => {
                    tx.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let mut store = SqliteStore::open_memory().unwrap();
        assert!(store.get("test").unwrap().is_none());

        let mut batch = PreferenceBatch::new();
        batch.set_string("test", Some("hello"));
        store.write_batch(&batch).unwrap();
        assert_eq!(store.get("test").unwrap().unwrap(), "hello");
    }

    #[test]
    fn batch_overwrites_and_deletes() {
        let mut store = SqliteStore::open_memory().unwrap();
        let mut batch = PreferenceBatch::new();
        batch.set_int("a", 1).set_int("b", 2);
        store.write_batch(&batch).unwrap();

        let mut batch = PreferenceBatch::new();
        batch.set_int("a", 5).set_string("b", None);
        store.write_batch(&batch).unwrap();

        assert_eq!(store.get_int("a").unwrap(), Some(5));
        assert!(store.get("b").unwrap().is_none());
        assert_eq!(store.keys().unwrap(), vec!["a".to_string()]);
    }

    #[test]
    fn reopening_file_keeps_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("prefs.db");
        {
            let mut store = SqliteStore::open_at(&path).unwrap();
            let mut batch = PreferenceBatch::new();
            batch.set_string_list("items", &["x".to_string()]);
            store.write_batch(&batch).unwrap();
        }
        let store = SqliteStore::open_at(&path).unwrap();
        assert_eq!(
            store.get_string_list("items").unwrap(),
            Some(vec!["x".to_string()])
        );
    }
}
