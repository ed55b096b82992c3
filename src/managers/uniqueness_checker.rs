//! Per-owner uniqueness checks for bookmark names and URLs.

use std::sync::Arc;

use crate::database::BookmarkStore;
use crate::types::bookmark::{BookmarkId, UniqueField};
use crate::types::errors::StoreError;
use crate::types::user::UserId;

#[derive(Clone)]
pub struct UniquenessChecker {
    store: Arc<dyn BookmarkStore>,
}

impl UniquenessChecker {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self { store }
    }

    /// Whether another bookmark of `owner` already uses `value` for `field`.
    ///
    /// `exclude` is the bookmark being edited, so keeping its own name or URL
    /// never collides with itself.
    pub async fn exists(
        &self,
        field: UniqueField,
        value: &str,
        owner: UserId,
        exclude: Option<BookmarkId>,
    ) -> Result<bool, StoreError> {
        self.store.bookmark_exists(owner, field, value, exclude).await
    }
}
