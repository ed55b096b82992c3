//! BookmarkStore - persistence abstraction for bookmarks, categories and users.
//!
//! The managers and services never see SQL. They issue the logical operations
//! below against an `Arc<dyn BookmarkStore>` handed to them at construction, so
//! tests can wrap or replace the backend.
//!
//! Every method is owner-scoped: a call never reads or writes rows belonging to
//! another user. Implementations bound each call with their own timeout and
//! report it as [`StoreError::Timeout`].

use async_trait::async_trait;

use crate::types::bookmark::{Bookmark, BookmarkId, CategoryFilter, SeqRange, UniqueField};
use crate::types::category::{CategoryCount, CategoryId};
use crate::types::errors::StoreError;
use crate::types::user::{User, UserId};

#[async_trait]
pub trait BookmarkStore: Send + Sync {
    //
    // USERS
    //

    /// Inserts a user and returns its id. Fails on a duplicate username.
    async fn insert_user(&self, username: &str) -> Result<UserId, StoreError>;

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Removes the user together with all of their bookmarks and categories.
    /// Returns whether a row was removed.
    async fn delete_user(&self, user: UserId) -> Result<bool, StoreError>;

    //
    // CATEGORIES
    //

    async fn find_category(&self, owner: UserId, name: &str) -> Result<Option<CategoryId>, StoreError>;

    /// Inserts a category. A concurrent insert of the same name loses on the
    /// `(owner, name)` uniqueness constraint and returns an error.
    async fn insert_category(&self, owner: UserId, name: &str) -> Result<CategoryId, StoreError>;

    /// Renames `old` to `new`. Referencing bookmarks see the new name. Returns
    /// the number of categories renamed (0 or 1).
    async fn rename_category(&self, owner: UserId, old: &str, new: &str) -> Result<u64, StoreError>;

    /// Deletes the category and leaves its bookmarks uncategorized. Returns the
    /// number of categories removed (0 or 1).
    async fn delete_category(&self, owner: UserId, name: &str) -> Result<u64, StoreError>;

    /// Categories that hold at least one bookmark, ordered by name.
    async fn category_counts(&self, owner: UserId) -> Result<Vec<CategoryCount>, StoreError>;

    //
    // BOOKMARKS
    //

    /// Whether another bookmark of `owner` already uses `value` in `field`,
    /// ignoring `exclude`.
    async fn bookmark_exists(
        &self,
        owner: UserId,
        field: UniqueField,
        value: &str,
        exclude: Option<BookmarkId>,
    ) -> Result<bool, StoreError>;

    async fn get_bookmark(&self, owner: UserId, id: BookmarkId) -> Result<Option<Bookmark>, StoreError>;

    /// One page of bookmarks ordered by position.
    async fn list_bookmarks(
        &self,
        owner: UserId,
        filter: CategoryFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Bookmark>, StoreError>;

    /// Appends a bookmark at position `N + 1` and returns its id.
    async fn insert_bookmark(
        &self,
        owner: UserId,
        name: &str,
        url: &str,
        category: Option<CategoryId>,
    ) -> Result<BookmarkId, StoreError>;

    /// Overwrites name, url and category. Returns the number of rows updated.
    async fn update_bookmark(
        &self,
        owner: UserId,
        id: BookmarkId,
        name: &str,
        url: &str,
        category: Option<CategoryId>,
    ) -> Result<u64, StoreError>;

    /// Removes a bookmark and returns the position it held, `None` if it did not exist.
    async fn delete_bookmark(&self, owner: UserId, id: BookmarkId) -> Result<Option<i64>, StoreError>;

    /// Current position of a bookmark.
    async fn position(&self, owner: UserId, id: BookmarkId) -> Result<Option<i64>, StoreError>;

    /// Adds `delta` to every position inside `range`. Returns the number of rows moved.
    async fn shift_positions(&self, owner: UserId, range: SeqRange, delta: i64) -> Result<u64, StoreError>;

    /// Sets one bookmark's position. Returns the number of rows updated.
    async fn set_position(&self, owner: UserId, id: BookmarkId, seq: i64) -> Result<u64, StoreError>;

    /// All positions of `owner`, ascending. Used to audit the sequence.
    async fn positions(&self, owner: UserId) -> Result<Vec<i64>, StoreError>;

    /// Rewrites the owner's positions to `1..=N`, keeping the current order
    /// (ties broken by id). Returns the number of rows whose position changed.
    async fn renumber_positions(&self, owner: UserId) -> Result<u64, StoreError>;
}
