//! In-memory preference store.

use std::collections::HashMap;

use super::{PreferenceBatch, PreferenceStore};
use crate::error::StoreError;

/// `HashMap`-backed store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn write_batch(&mut self, batch: &PreferenceBatch) -> Result<(), StoreError> {
        for (key, value) in batch.entries() {
            match value {
                Some(v) => {
                    self.values.insert(key.clone(), v.clone());
                }
                None => {
                    self.values.remove(key);
                }
            }
        }
        Ok(())
    }
}
