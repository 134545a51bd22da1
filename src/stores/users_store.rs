use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{CmsUser, Permission, Role};
use crate::stores::session_store::DEMO_ADMIN_EMAIL;
use crate::storage::{keys, Storage, StorageError};

#[derive(Error, Debug)]
pub enum UsersError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("User not found: {0}")]
    NotFound(String),
}

/// The CMS user directory: role/permission records managed through the
/// admin's user-management view. Separate from the auth account list.
pub struct UsersStore {
    storage: Arc<dyn Storage>,
}

impl UsersStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Seeds the demo admin record on first initialization. A no-op once
    /// the directory exists.
    pub fn seed_defaults(&self) -> Result<(), UsersError> {
        if self.storage.load(keys::CMS_USERS)?.is_some() {
            return Ok(());
        }
        let admin = CmsUser {
            id: "1".to_string(),
            name: "Admin".to_string(),
            email: DEMO_ADMIN_EMAIL.to_string(),
            role: Role::Admin,
            permissions: None,
        };
        self.save_users(&[admin])
    }

    pub fn list_users(&self) -> Result<Vec<CmsUser>, UsersError> {
        match self.storage.load(keys::CMS_USERS)? {
            None => Ok(Vec::new()),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(users) => Ok(users),
                Err(e) => {
                    log::warn!("Discarding corrupt CMS user directory: {}", e);
                    Ok(Vec::new())
                }
            },
        }
    }

    pub fn get_user(&self, id: &str) -> Result<Option<CmsUser>, UsersError> {
        Ok(self.list_users()?.into_iter().find(|u| u.id == id))
    }

    pub fn create_user(&self, name: &str, email: &str, role: Role) -> Result<CmsUser, UsersError> {
        let user = CmsUser {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            permissions: None,
        };
        let mut users = self.list_users()?;
        users.push(user.clone());
        self.save_users(&users)?;
        Ok(user)
    }

    pub fn update_user(
        &self,
        id: &str,
        name: &str,
        email: &str,
        role: Role,
    ) -> Result<CmsUser, UsersError> {
        let mut users = self.list_users()?;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| UsersError::NotFound(id.to_string()))?;
        user.name = name.to_string();
        user.email = email.to_string();
        user.role = role;
        let updated = user.clone();
        self.save_users(&users)?;
        Ok(updated)
    }

    /// Replaces a user's explicit permission overrides; `None` restores
    /// plain role defaults.
    pub fn set_permissions(
        &self,
        id: &str,
        permissions: Option<Vec<Permission>>,
    ) -> Result<CmsUser, UsersError> {
        let mut users = self.list_users()?;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| UsersError::NotFound(id.to_string()))?;
        user.permissions = permissions;
        let updated = user.clone();
        self.save_users(&users)?;
        Ok(updated)
    }

    /// Returns whether a record was removed; removing an absent id is fine.
    pub fn delete_user(&self, id: &str) -> Result<bool, UsersError> {
        let mut users = self.list_users()?;
        let before = users.len();
        users.retain(|u| u.id != id);
        let removed = users.len() != before;
        self.save_users(&users)?;
        Ok(removed)
    }

    fn save_users(&self, users: &[CmsUser]) -> Result<(), UsersError> {
        let json = serde_json::to_string(users)?;
        self.storage.save(keys::CMS_USERS, &json)?;
        Ok(())
    }
}
