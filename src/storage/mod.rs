use redb::{CommitError, DatabaseError, TableError, TransactionError};
use thiserror::Error;

pub mod memory;
pub mod redb_backend;

pub use memory::MemoryStorage;
pub use redb_backend::RedbStorage;

/// Keys under which the CMS persists its JSON-serialized collections. These
/// mirror the original site's browser local-storage keys.
pub mod keys {
    /// Current session identity record.
    pub const SESSION: &str = "portfolio_session";
    /// Registered demo accounts, plaintext passwords included.
    pub const ACCOUNTS: &str = "portfolio_users";
    /// CMS blog posts.
    pub const POSTS: &str = "cms_posts";
    /// CMS projects.
    pub const PROJECTS: &str = "cms_projects";
    /// CMS user directory (role/permission records).
    pub const CMS_USERS: &str = "cms_users";
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Redb database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Redb storage error: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("Redb transaction error: {0}")]
    Transaction(#[from] TransactionError),
    #[error("Redb table error: {0}")]
    Table(#[from] TableError),
    #[error("Redb commit error: {0}")]
    Commit(#[from] CommitError),
}

/// The persistence port. Values are whole JSON documents; every write
/// replaces the full value under its key, so callers always perform a
/// read-modify-write of an entire collection. Two writers racing on the
/// same key will clobber each other; that matches the storage model this
/// crate reproduces and is not mitigated here.
pub trait Storage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
