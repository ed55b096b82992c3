//! Category Manager for MyBookmarks.
//!
//! Resolves submitted category names to ids (creating them lazily), and owns
//! the category-level operations: rename, delete and the per-category counts.

use std::sync::Arc;

use crate::database::BookmarkStore;
use crate::types::category::{self, CategoryCount, ResolvedCategory};
use crate::types::errors::StoreError;
use crate::types::outcome::{Outcome, RejectionCode};
use crate::types::user::UserId;

/// Category operations over a shared store handle. Cheap to clone.
#[derive(Clone)]
pub struct CategoryManager {
    store: Arc<dyn BookmarkStore>,
}

impl CategoryManager {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self { store }
    }

    /// Resolves `name` for `owner`, creating the category if it does not exist yet.
    ///
    /// Blank, over-long and reserved names are answered without touching the
    /// store. Two concurrent resolutions of the same new name race on the
    /// store's uniqueness constraint; the loser gets the store error.
    pub async fn resolve(&self, name: &str, owner: UserId) -> Result<ResolvedCategory, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(ResolvedCategory::None);
        }
        if category::exceeds_length_limit(name) {
            return Ok(ResolvedCategory::TooLong);
        }
        if category::is_reserved(name) {
            return Ok(ResolvedCategory::Reserved);
        }

        if let Some(id) = self.store.find_category(owner, name).await? {
            return Ok(ResolvedCategory::Existing(id));
        }

        let id = self.store.insert_category(owner, name).await?;
        tracing::debug!(owner, category = name, id, "created category");
        Ok(ResolvedCategory::Existing(id))
    }

    /// Renames `old` to `new` for `owner`.
    ///
    /// Rules are checked in order and the first match wins: blank name,
    /// reserved name, no change, too long, name already taken. A name only
    /// counts as taken while at least one bookmark carries it.
    pub async fn rename(&self, owner: UserId, old: &str, new: &str) -> Result<Outcome, StoreError> {
        let new = new.trim();

        if new.is_empty() {
            return Ok(Outcome::rejected(RejectionCode::Name, "New category name is empty."));
        }
        if category::is_reserved(new) {
            return Ok(Outcome::rejected(
                RejectionCode::Name,
                "New category name is not allowed.",
            ));
        }
        if old == new {
            return Ok(Outcome::Unchanged("New category is same as old category.".to_string()));
        }
        if category::exceeds_length_limit(new) {
            return Ok(Outcome::rejected(
                RejectionCode::Name,
                "Category name exceeded length limit.",
            ));
        }
        let in_use = self.store.category_counts(owner).await?;
        if in_use.iter().any(|c| c.category == new) {
            return Ok(Outcome::rejected(
                RejectionCode::Name,
                format!("Category {} is already existed.", new),
            ));
        }

        // A row with no bookmarks is a leftover of lazy resolution; it gives way.
        if self.store.find_category(owner, new).await?.is_some() {
            let dropped = self.store.delete_category(owner, new).await?;
            tracing::debug!(owner, category = new, dropped, "dropped empty category before rename");
        }

        let renamed = self.store.rename_category(owner, old, new).await?;
        tracing::info!(owner, old, new, renamed, "renamed category");
        Ok(Outcome::Accepted)
    }

    /// Deletes the category; its bookmarks become uncategorized. Deleting a
    /// category that does not exist is not an error.
    pub async fn delete(&self, owner: UserId, name: &str) -> Result<(), StoreError> {
        let removed = self.store.delete_category(owner, name).await?;
        tracing::info!(owner, category = name, removed, "deleted category");
        Ok(())
    }

    /// Categories in use, with their bookmark counts, ordered by name.
    pub async fn list(&self, owner: UserId) -> Result<Vec<CategoryCount>, StoreError> {
        self.store.category_counts(owner).await
    }
}
