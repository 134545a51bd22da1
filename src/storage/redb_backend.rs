use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use super::{Storage, StorageError};

const KV: TableDefinition<&str, &str> = TableDefinition::new("cms_kv");

/// File-backed storage: a single redb table mapping collection keys to JSON
/// documents. The durable stand-in for the original's browser local storage.
pub struct RedbStorage {
    db: Database,
}

impl RedbStorage {
    /// Creates the database file if it does not exist and makes sure the
    /// key/value table is present.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = Database::create(path)?;
        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(KV)?;
        }
        write_txn.commit()?;
        Ok(Self { db })
    }
}

impl Storage for RedbStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV)?;
        let value = table.get(key)?.map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = RedbStorage::open(&dir.path().join("cms.redb")).unwrap();

        assert!(storage.load("missing").unwrap().is_none());

        storage.save("k", "[1,2,3]").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("[1,2,3]"));

        storage.save("k", "[]").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("[]"));

        storage.remove("k").unwrap();
        assert!(storage.load("k").unwrap().is_none());
        // Removing an absent key is fine.
        storage.remove("k").unwrap();
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cms.redb");
        {
            let storage = RedbStorage::open(&path).unwrap();
            storage.save("k", "\"v\"").unwrap();
        }
        let storage = RedbStorage::open(&path).unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("\"v\""));
    }
}
