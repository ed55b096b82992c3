//! User provisioning: creating and removing accounts.

use std::sync::Arc;

use crate::database::BookmarkStore;
use crate::types::errors::UserError;
use crate::types::user::{User, UserId};

/// Bookmark every new account starts with.
pub const WELCOME_BOOKMARK: (&str, &str) = ("Google", "https://www.google.com");

#[derive(Clone)]
pub struct UserManager {
    store: Arc<dyn BookmarkStore>,
}

impl UserManager {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self { store }
    }

    /// Creates an account and seeds it with [`WELCOME_BOOKMARK`] at position 1.
    pub async fn add_user(&self, username: &str) -> Result<UserId, UserError> {
        let username = User::normalize_username(username);
        if username.is_empty() {
            return Err(UserError::InvalidName(username));
        }
        if self.store.find_user(&username).await?.is_some() {
            return Err(UserError::AlreadyExists(username));
        }

        let id = self.store.insert_user(&username).await?;
        let (name, url) = WELCOME_BOOKMARK;
        self.store.insert_bookmark(id, name, url, None).await?;

        tracing::info!(user = %username, id, "user created");
        Ok(id)
    }

    /// Removes an account with all of its bookmarks and categories.
    pub async fn delete_user(&self, username: &str) -> Result<(), UserError> {
        let username = User::normalize_username(username);
        let user = self
            .store
            .find_user(&username)
            .await?
            .ok_or_else(|| UserError::NotFound(username.clone()))?;

        if !self.store.delete_user(user.id).await? {
            return Err(UserError::NotFound(username));
        }
        tracing::info!(user = %username, id = user.id, "user deleted");
        Ok(())
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<User>, UserError> {
        let username = User::normalize_username(username);
        Ok(self.store.find_user(&username).await?)
    }
}
