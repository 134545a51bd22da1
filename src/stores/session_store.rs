use std::sync::{Arc, RwLock};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Account, CmsUser, Role};
use crate::storage::{keys, Storage, StorageError};

/// The hard-coded demo admin credential; bypasses the persisted account
/// list entirely.
pub const DEMO_ADMIN_EMAIL: &str = "admin@portfolio.com";
const DEMO_ADMIN_PASSWORD: &str = "admin123";

#[derive(Error, Debug)]
enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

/// Tracks who is logged in, backed by durable storage so a restart keeps
/// the session. Login and signup report plain booleans; wrong credentials
/// are an expected failure, and internal storage errors are logged and
/// collapse to `false` rather than propagate.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    current: RwLock<Option<CmsUser>>,
}

impl SessionStore {
    /// Hydrates the session from storage. A corrupt entry is discarded and
    /// the session starts unauthenticated.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let current = match storage.load(keys::SESSION) {
            Ok(Some(raw)) => match serde_json::from_str::<CmsUser>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::warn!("Discarding corrupt session entry: {}", e);
                    if let Err(e) = storage.remove(keys::SESSION) {
                        log::error!("Failed to clear corrupt session entry: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::error!("Failed to read stored session: {}", e);
                None
            }
        };
        Self {
            storage,
            current: RwLock::new(current),
        }
    }

    pub fn current_user(&self) -> Option<CmsUser> {
        self.read_current().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_current().is_some()
    }

    /// Matches the demo admin credential or a persisted account. On success
    /// the identity is persisted with the password stripped.
    pub fn login(&self, email: &str, password: &str) -> bool {
        match self.try_login(email, password) {
            Ok(logged_in) => logged_in,
            Err(e) => {
                log::error!("Login aborted by storage failure: {}", e);
                false
            }
        }
    }

    fn try_login(&self, email: &str, password: &str) -> Result<bool, SessionError> {
        if email == DEMO_ADMIN_EMAIL && password == DEMO_ADMIN_PASSWORD {
            self.establish(demo_admin_user())?;
            return Ok(true);
        }

        let accounts = self.load_accounts()?;
        match accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
        {
            Some(account) => {
                self.establish(strip_password(account))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Registers a new account and signs it in. Fails without touching the
    /// stored list when the email is already registered.
    pub fn signup(&self, name: &str, email: &str, password: &str) -> bool {
        match self.try_signup(name, email, password) {
            Ok(created) => created,
            Err(e) => {
                log::error!("Signup aborted by storage failure: {}", e);
                false
            }
        }
    }

    fn try_signup(&self, name: &str, email: &str, password: &str) -> Result<bool, SessionError> {
        let mut accounts = self.load_accounts()?;
        if accounts.iter().any(|a| a.email == email) {
            return Ok(false);
        }

        // Stored in plaintext, faithful to the demo this reproduces. Real
        // deployments must hash credentials.
        let account = Account {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Role::User,
            created_at: Utc::now(),
        };

        accounts.push(account.clone());
        let json = serde_json::to_string(&accounts)?;
        self.storage.save(keys::ACCOUNTS, &json)?;

        self.establish(strip_password(&account))?;
        Ok(true)
    }

    /// Clears the identity from memory and from durable storage.
    pub fn logout(&self) {
        *self.write_current() = None;
        if let Err(e) = self.storage.remove(keys::SESSION) {
            log::error!("Failed to clear stored session: {}", e);
        }
    }

    fn establish(&self, user: CmsUser) -> Result<(), SessionError> {
        let json = serde_json::to_string(&user)?;
        self.storage.save(keys::SESSION, &json)?;
        *self.write_current() = Some(user);
        Ok(())
    }

    fn load_accounts(&self) -> Result<Vec<Account>, SessionError> {
        match self.storage.load(keys::ACCOUNTS)? {
            None => Ok(Vec::new()),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(accounts) => Ok(accounts),
                Err(e) => {
                    log::warn!("Discarding corrupt account list: {}", e);
                    Ok(Vec::new())
                }
            },
        }
    }

    fn read_current(&self) -> std::sync::RwLockReadGuard<'_, Option<CmsUser>> {
        self.current.read().unwrap_or_else(|poisoned| {
            log::error!("Session lock was poisoned; continuing with recovered data.");
            poisoned.into_inner()
        })
    }

    fn write_current(&self) -> std::sync::RwLockWriteGuard<'_, Option<CmsUser>> {
        self.current.write().unwrap_or_else(|poisoned| {
            log::error!("Session lock was poisoned; continuing with recovered data.");
            poisoned.into_inner()
        })
    }
}

fn demo_admin_user() -> CmsUser {
    CmsUser {
        id: "1".to_string(),
        name: "Admin".to_string(),
        email: DEMO_ADMIN_EMAIL.to_string(),
        role: Role::Admin,
        permissions: None,
    }
}

fn strip_password(account: &Account) -> CmsUser {
    CmsUser {
        id: account.id.clone(),
        name: account.name.clone(),
        email: account.email.clone(),
        role: account.role,
        permissions: None,
    }
}
