//! Bookmark Manager for MyBookmarks.
//!
//! Applies already-decided mutations to the store: insert, update, delete with
//! sequence compaction, and paged listing. No validation happens here; callers
//! go through the validation coordinator first.

use std::sync::Arc;

use crate::database::BookmarkStore;
use crate::types::bookmark::{Bookmark, BookmarkDraft, BookmarkId, CategoryFilter, SeqRange};
use crate::types::category::CategoryId;
use crate::types::errors::BookmarkError;
use crate::types::user::UserId;

/// Bookmark writes over a shared store handle. Cheap to clone.
#[derive(Clone)]
pub struct BookmarkManager {
    store: Arc<dyn BookmarkStore>,
}

impl BookmarkManager {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self { store }
    }

    /// Appends a new bookmark at the end of the owner's list. Returns its id.
    pub async fn insert(
        &self,
        owner: UserId,
        draft: &BookmarkDraft,
        category: Option<CategoryId>,
    ) -> Result<BookmarkId, BookmarkError> {
        let id = self
            .store
            .insert_bookmark(owner, &draft.name, &draft.url, category)
            .await?;
        Ok(id)
    }

    /// Overwrites name, url and category of an existing bookmark. Position is untouched.
    pub async fn update(
        &self,
        owner: UserId,
        id: BookmarkId,
        draft: &BookmarkDraft,
        category: Option<CategoryId>,
    ) -> Result<(), BookmarkError> {
        let affected = self
            .store
            .update_bookmark(owner, id, &draft.name, &draft.url, category)
            .await?;
        if affected == 0 {
            return Err(BookmarkError::NotFound(id));
        }
        Ok(())
    }

    /// Deletes a bookmark and pulls every later bookmark up by one position.
    ///
    /// Deleting a bookmark that does not exist is a no-op. If the delete lands
    /// but the compaction fails, the owner's sequence has a gap and the error
    /// is a [`BookmarkError::ConsistencyHazard`].
    pub async fn remove(&self, owner: UserId, id: BookmarkId) -> Result<(), BookmarkError> {
        let Some(seq) = self.store.delete_bookmark(owner, id).await? else {
            tracing::debug!(owner, id, "delete of missing bookmark ignored");
            return Ok(());
        };

        self.store
            .shift_positions(owner, SeqRange::after(seq), -1)
            .await
            .map_err(|source| {
                tracing::error!(
                    owner,
                    id,
                    seq,
                    reconcile = true,
                    error = %source,
                    "delete left a gap in the sequence"
                );
                BookmarkError::ConsistencyHazard {
                    owner,
                    detail: format!(
                        "bookmark {} deleted from position {} but later positions not compacted",
                        id, seq
                    ),
                    source: Some(source),
                }
            })?;
        Ok(())
    }

    /// One page of the owner's bookmarks in display order.
    pub async fn list(
        &self,
        owner: UserId,
        filter: CategoryFilter,
        start: i64,
        page_size: i64,
    ) -> Result<Vec<Bookmark>, BookmarkError> {
        let start = start.max(0);
        Ok(self.store.list_bookmarks(owner, filter, start, page_size).await?)
    }
}
