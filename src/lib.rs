use std::sync::Arc;

use thiserror::Error;

pub mod config;
pub mod helper;
pub mod models;
pub mod permissions;
pub mod storage;
pub mod stores;

pub use config::CmsConfig;
pub use storage::{MemoryStorage, RedbStorage, Storage, StorageError};
pub use stores::{ContentError, ContentStore, SessionStore, UsersError, UsersStore};

#[derive(Error, Debug)]
pub enum CmsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Users store error: {0}")]
    Users(#[from] UsersError),
}

/// The wired-up CMS: one shared storage handle behind the session, content,
/// and user stores. Views read the session for identity, ask `permissions`
/// whether to show management controls, and push mutations through the
/// stores.
pub struct Cms {
    pub session: SessionStore,
    pub content: ContentStore,
    pub users: UsersStore,
}

impl Cms {
    /// Opens the file-backed storage at the configured path, seeds the CMS
    /// user directory, and hydrates the session.
    pub fn open(config: &CmsConfig) -> Result<Self, CmsError> {
        std::fs::create_dir_all(&config.database_path)?;
        let storage: Arc<dyn Storage> = Arc::new(RedbStorage::open(&config.storage_db_path())?);
        Self::with_storage(storage)
    }

    /// Same wiring over any storage implementation; used for in-memory
    /// embedding and tests.
    pub fn with_storage(storage: Arc<dyn Storage>) -> Result<Self, CmsError> {
        let users = UsersStore::new(storage.clone());
        users.seed_defaults()?;
        Ok(Self {
            session: SessionStore::new(storage.clone()),
            content: ContentStore::new(storage),
            users,
        })
    }
}
