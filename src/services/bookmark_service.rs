//! Bookmark Service for MyBookmarks.
//!
//! The entry point for every bookmark and category operation of one owner.
//! Adds and edits go through the validation fan-out before the mutation is
//! applied; rejections come back as [`Outcome`] values, system failures as
//! [`BookmarkError`].

use std::sync::Arc;

use crate::database::BookmarkStore;
use crate::managers::bookmark_manager::BookmarkManager;
use crate::managers::category_manager::CategoryManager;
use crate::services::reorder_engine::ReorderEngine;
use crate::services::validation_coordinator::ValidationCoordinator;
use crate::types::bookmark::{Bookmark, BookmarkDraft, BookmarkId, CategoryFilter, DEFAULT_PAGE_SIZE};
use crate::types::category::CategoryCount;
use crate::types::errors::BookmarkError;
use crate::types::outcome::{Outcome, Verdict};
use crate::types::user::UserId;

#[derive(Clone)]
pub struct BookmarkService {
    store: Arc<dyn BookmarkStore>,
    validator: ValidationCoordinator,
    mutations: BookmarkManager,
    categories: CategoryManager,
    reorderer: ReorderEngine,
    page_size: i64,
}

impl BookmarkService {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self::with_page_size(store, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(store: Arc<dyn BookmarkStore>, page_size: i64) -> Self {
        Self {
            validator: ValidationCoordinator::new(Arc::clone(&store)),
            mutations: BookmarkManager::new(Arc::clone(&store)),
            categories: CategoryManager::new(Arc::clone(&store)),
            reorderer: ReorderEngine::new(Arc::clone(&store)),
            store,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Validates and appends a bookmark at the end of the owner's list.
    #[tracing::instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add_bookmark(
        &self,
        owner: UserId,
        draft: &BookmarkDraft,
    ) -> Result<Outcome, BookmarkError> {
        let verdict = self
            .validator
            .validate(owner, draft, None)
            .await
            .inspect_err(|e| log_failure("add", e))?;

        match verdict {
            Verdict::Conclude(outcome) => {
                log_concluded(&outcome);
                Ok(outcome)
            }
            Verdict::Proceed { category } => {
                let id = self
                    .mutations
                    .insert(owner, draft, category)
                    .await
                    .inspect_err(|e| log_failure("add", e))?;
                tracing::info!(id, "bookmark added");
                Ok(Outcome::Accepted)
            }
        }
    }

    /// Validates and overwrites name, url and category of bookmark `id`.
    #[tracing::instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn edit_bookmark(
        &self,
        owner: UserId,
        id: BookmarkId,
        draft: &BookmarkDraft,
    ) -> Result<Outcome, BookmarkError> {
        let verdict = self
            .validator
            .validate(owner, draft, Some(id))
            .await
            .inspect_err(|e| log_failure("edit", e))?;

        match verdict {
            Verdict::Conclude(outcome) => {
                log_concluded(&outcome);
                Ok(outcome)
            }
            Verdict::Proceed { category } => {
                self.mutations
                    .update(owner, id, draft, category)
                    .await
                    .inspect_err(|e| log_failure("edit", e))?;
                tracing::info!("bookmark edited");
                Ok(Outcome::Accepted)
            }
        }
    }

    /// Removes bookmark `id` and closes the gap it leaves in the sequence.
    #[tracing::instrument(skip(self))]
    pub async fn delete_bookmark(&self, owner: UserId, id: BookmarkId) -> Result<(), BookmarkError> {
        self.mutations
            .remove(owner, id)
            .await
            .inspect_err(|e| log_failure("delete", e))?;
        tracing::info!("bookmark deleted");
        Ok(())
    }

    /// Moves `moving` to the position currently held by `target`.
    #[tracing::instrument(skip(self))]
    pub async fn reorder(
        &self,
        owner: UserId,
        moving: BookmarkId,
        target: BookmarkId,
    ) -> Result<(), BookmarkError> {
        self.reorderer
            .reorder(owner, moving, target)
            .await
            .inspect_err(|e| log_failure("reorder", e))
    }

    /// One page of bookmarks starting at offset `start`, in display order.
    #[tracing::instrument(skip(self))]
    pub async fn list_bookmarks(
        &self,
        owner: UserId,
        filter: CategoryFilter,
        start: i64,
    ) -> Result<Vec<Bookmark>, BookmarkError> {
        self.mutations
            .list(owner, filter, start, self.page_size)
            .await
            .inspect_err(|e| log_failure("list", e))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_categories(&self, owner: UserId) -> Result<Vec<CategoryCount>, BookmarkError> {
        self.categories
            .list(owner)
            .await
            .map_err(BookmarkError::from)
            .inspect_err(|e| log_failure("list categories", e))
    }

    #[tracing::instrument(skip(self))]
    pub async fn rename_category(
        &self,
        owner: UserId,
        old: &str,
        new: &str,
    ) -> Result<Outcome, BookmarkError> {
        let outcome = self
            .categories
            .rename(owner, old, new)
            .await
            .map_err(BookmarkError::from)
            .inspect_err(|e| log_failure("rename category", e))?;
        log_concluded(&outcome);
        Ok(outcome)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_category(&self, owner: UserId, name: &str) -> Result<(), BookmarkError> {
        self.categories
            .delete(owner, name)
            .await
            .map_err(BookmarkError::from)
            .inspect_err(|e| log_failure("delete category", e))
    }

    /// Rewrites the owner's positions to `1..=N` in current order. This is the
    /// repair step for a sequence left inconsistent by a consistency hazard.
    /// Returns how many bookmarks changed position.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile_sequence(&self, owner: UserId) -> Result<u64, BookmarkError> {
        let moved = self
            .store
            .renumber_positions(owner)
            .await
            .map_err(BookmarkError::from)
            .inspect_err(|e| log_failure("reconcile", e))?;
        if moved > 0 {
            tracing::warn!(moved, "sequence reconciled");
        }
        Ok(moved)
    }
}

fn log_concluded(outcome: &Outcome) {
    if let Outcome::Rejected(rejection) = outcome {
        tracing::debug!(code = rejection.code.as_i32(), message = %rejection.message, "rejected");
    } else if let Outcome::Unchanged(message) = outcome {
        tracing::debug!(%message, "unchanged");
    }
}

// Hazards are already logged with their reconcile marker where they happen.
fn log_failure(operation: &str, error: &BookmarkError) {
    match error {
        BookmarkError::ConsistencyHazard { .. } => {}
        BookmarkError::NotFound(_) => tracing::warn!(operation, error = %error, "bookmark operation failed"),
        _ => tracing::error!(operation, error = %error, "bookmark operation failed"),
    }
}
