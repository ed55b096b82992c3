//! App Core for MyBookmarks.
//!
//! Central struct holding the store handle and the services built on it.

use std::sync::Arc;

use crate::database::{BookmarkStore, Database, SqliteStore};
use crate::managers::user_manager::UserManager;
use crate::services::bookmark_service::BookmarkService;
use crate::types::settings::Settings;

/// Central application struct. Every component shares the one store handle.
pub struct App {
    pub settings: Settings,
    pub store: Arc<dyn BookmarkStore>,
    pub bookmarks: BookmarkService,
    pub users: UserManager,
}

impl App {
    /// Opens the database named in `settings` and wires the services on top.
    pub fn new(settings: Settings) -> Result<Self, rusqlite::Error> {
        let db = Database::open(&settings.database.path)?;
        let store: Arc<dyn BookmarkStore> = Arc::new(SqliteStore::new(db, settings.store.timeout()));
        tracing::info!(path = %settings.database.path, "database opened");
        Ok(Self::with_store(store, settings))
    }

    /// An app over a fresh in-memory database with default settings.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let settings = Settings::default();
        let db = Database::open_in_memory()?;
        let store: Arc<dyn BookmarkStore> = Arc::new(SqliteStore::new(db, settings.store.timeout()));
        Ok(Self::with_store(store, settings))
    }

    /// An app over an existing store handle.
    pub fn with_store(store: Arc<dyn BookmarkStore>, settings: Settings) -> Self {
        let bookmarks = BookmarkService::with_page_size(Arc::clone(&store), settings.listing.page_size);
        let users = UserManager::new(Arc::clone(&store));
        Self {
            settings,
            store,
            bookmarks,
            users,
        }
    }
}
