use std::time::Duration;

use thiserror::Error;

use super::bookmark::BookmarkId;
use super::user::UserId;

// === StoreError ===

/// Failures of the persistence backend. Always infrastructure faults, never
/// user-correctable.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The operation did not finish within the configured store timeout.
    #[error("Store operation timed out: {operation} after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
    /// SQLite rejected or failed the statement.
    #[error("Store database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// A previous holder of the connection panicked.
    #[error("Store connection poisoned")]
    Poisoned,
    /// The blocking worker running the statement died.
    #[error("Store worker failed: {0}")]
    Worker(String),
}

// === BookmarkError ===

/// System-level failures of bookmark operations.
///
/// Validation rejections are not errors; see [`crate::types::outcome::Outcome`].
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// The bookmark does not exist for this owner.
    #[error("Bookmark not found: {0}")]
    NotFound(BookmarkId),
    /// The store failed before anything was written, or the write itself failed.
    #[error("Bookmark store error: {0}")]
    Store(#[from] StoreError),
    /// A fanned-out check panicked or was cancelled.
    #[error("Bookmark task failed: {0}")]
    TaskFailed(String),
    /// Positions were shifted but the follow-up write failed or hit no row, so
    /// the owner's sequence may have a gap or a duplicate until reconciled.
    /// `source` is empty when the write succeeded but matched nothing.
    #[error("Bookmark sequence inconsistent for user {owner}: {detail}")]
    ConsistencyHazard {
        owner: UserId,
        detail: String,
        #[source]
        source: Option<StoreError>,
    },
}

impl BookmarkError {
    pub fn is_consistency_hazard(&self) -> bool {
        matches!(self, BookmarkError::ConsistencyHazard { .. })
    }
}

// === UserError ===

/// Errors related to account provisioning.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("User already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid username: {0:?}")]
    InvalidName(String),
    #[error("User store error: {0}")]
    Store(#[from] StoreError),
}

// === SettingsError ===

/// Errors related to loading and saving the configuration file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings IO error: {0}")]
    IoError(String),
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
