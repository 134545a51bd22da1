use std::collections::HashMap;
use std::sync::RwLock;

use super::{Storage, StorageError};

/// In-memory storage for tests and ephemeral embedding. Behaves like the
/// redb backend minus durability.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, String>> {
        self.entries.read().unwrap_or_else(|poisoned| {
            log::error!("MemoryStorage lock was poisoned; continuing with recovered data.");
            poisoned.into_inner()
        })
    }

    fn write_entries(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, String>> {
        self.entries.write().unwrap_or_else(|poisoned| {
            log::error!("MemoryStorage lock was poisoned; continuing with recovered data.");
            poisoned.into_inner()
        })
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.write_entries().remove(key);
        Ok(())
    }
}
