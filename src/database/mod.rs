//! MyBookmarks database layer.
//!
//! Provides SQLite connection management, schema migrations, the
//! [`BookmarkStore`] abstraction the managers and services talk to, and its
//! SQLite implementation.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use mybookmarks::database::{BookmarkStore, Database, SqliteStore};
//!
//! let db = Database::open("mybookmarks.db").expect("failed to open database");
//! let store: Arc<dyn BookmarkStore> = Arc::new(SqliteStore::new(db, Duration::from_secs(10)));
//! ```

pub mod connection;
pub mod migrations;
pub mod sqlite_store;
pub mod store;

pub use connection::Database;
pub use sqlite_store::SqliteStore;
pub use store::BookmarkStore;
