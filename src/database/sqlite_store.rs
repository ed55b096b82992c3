//! SqliteStore - BookmarkStore implementation backed by `rusqlite`.
//!
//! `rusqlite::Connection` is blocking, so every operation runs on tokio's
//! blocking pool while holding the connection mutex, and the caller awaits it
//! under the configured timeout. The guard is released when the closure
//! returns, on success and on error alike. A timed-out statement keeps running
//! to completion in the background; its result is discarded.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::connection::Database;
use super::store::BookmarkStore;
use crate::types::bookmark::{Bookmark, BookmarkId, CategoryFilter, SeqRange, UniqueField};
use crate::types::category::{CategoryCount, CategoryId};
use crate::types::errors::StoreError;
use crate::types::user::{User, UserId};

const BOOKMARK_COLUMNS: &str =
    "b.id, b.name, b.url, COALESCE(c.name, ''), b.seq FROM bookmarks b \
     LEFT JOIN categories c ON c.id = b.category_id";

/// SQLite-backed store shared by all components of one process.
#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Mutex<Database>>,
    timeout: Duration,
}

impl SqliteStore {
    /// Wraps an opened database. `timeout` bounds every store call.
    pub fn new(db: Database, timeout: Duration) -> Self {
        Self::from_shared(Arc::new(Mutex::new(db)), timeout)
    }

    /// Builds a store over a database handle the caller keeps a clone of.
    pub fn from_shared(db: Arc<Mutex<Database>>, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `f` against the connection on the blocking pool, bounded by the store timeout.
    async fn run<T, F>(&self, operation: &'static str, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let task = tokio::task::spawn_blocking(move || {
            let guard = db.lock().map_err(|_| StoreError::Poisoned)?;
            f(guard.connection()).map_err(StoreError::from)
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(StoreError::Worker(join_error.to_string())),
            Err(_) => {
                tracing::warn!(operation, timeout = ?self.timeout, "store operation timed out");
                Err(StoreError::Timeout {
                    operation,
                    timeout: self.timeout,
                })
            }
        }
    }

    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            name: row.get(1)?,
            url: row.get(2)?,
            category: row.get(3)?,
            seq: row.get(4)?,
        })
    }
}

#[async_trait]
impl BookmarkStore for SqliteStore {
    async fn insert_user(&self, username: &str) -> Result<UserId, StoreError> {
        let username = username.to_string();
        self.run("insert_user", move |conn| {
            conn.execute("INSERT INTO users (username) VALUES (?1)", params![username])?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let username = username.to_string();
        self.run("find_user", move |conn| {
            conn.query_row(
                "SELECT id, username FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()
        })
        .await
    }

    async fn delete_user(&self, user: UserId) -> Result<bool, StoreError> {
        self.run("delete_user", move |conn| {
            let affected = conn.execute("DELETE FROM users WHERE id = ?1", params![user])?;
            Ok(affected > 0)
        })
        .await
    }

    async fn find_category(&self, owner: UserId, name: &str) -> Result<Option<CategoryId>, StoreError> {
        let name = name.to_string();
        self.run("find_category", move |conn| {
            conn.query_row(
                "SELECT id FROM categories WHERE user_id = ?1 AND name = ?2",
                params![owner, name],
                |row| row.get(0),
            )
            .optional()
        })
        .await
    }

    async fn insert_category(&self, owner: UserId, name: &str) -> Result<CategoryId, StoreError> {
        let name = name.to_string();
        self.run("insert_category", move |conn| {
            conn.execute(
                "INSERT INTO categories (user_id, name) VALUES (?1, ?2)",
                params![owner, name],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    async fn rename_category(&self, owner: UserId, old: &str, new: &str) -> Result<u64, StoreError> {
        let (old, new) = (old.to_string(), new.to_string());
        self.run("rename_category", move |conn| {
            let affected = conn.execute(
                "UPDATE categories SET name = ?3 WHERE user_id = ?1 AND name = ?2",
                params![owner, old, new],
            )?;
            Ok(affected as u64)
        })
        .await
    }

    async fn delete_category(&self, owner: UserId, name: &str) -> Result<u64, StoreError> {
        let name = name.to_string();
        // bookmarks.category_id is ON DELETE SET NULL
        self.run("delete_category", move |conn| {
            let affected = conn.execute(
                "DELETE FROM categories WHERE user_id = ?1 AND name = ?2",
                params![owner, name],
            )?;
            Ok(affected as u64)
        })
        .await
    }

    async fn category_counts(&self, owner: UserId) -> Result<Vec<CategoryCount>, StoreError> {
        self.run("category_counts", move |conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.name, COUNT(b.id) FROM categories c \
                 JOIN bookmarks b ON b.category_id = c.id \
                 WHERE c.user_id = ?1 GROUP BY c.id, c.name ORDER BY c.name",
            )?;
            let rows = stmt.query_map(params![owner], |row| {
                Ok(CategoryCount {
                    id: row.get(0)?,
                    category: row.get(1)?,
                    count: row.get(2)?,
                })
            })?;
            rows.collect()
        })
        .await
    }

    async fn bookmark_exists(
        &self,
        owner: UserId,
        field: UniqueField,
        value: &str,
        exclude: Option<BookmarkId>,
    ) -> Result<bool, StoreError> {
        let value = value.to_string();
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE user_id = ?1 AND {} = ?2 \
             AND (?3 IS NULL OR id != ?3))",
            field.column()
        );
        self.run("bookmark_exists", move |conn| {
            conn.query_row(&sql, params![owner, value, exclude], |row| row.get(0))
        })
        .await
    }

    async fn get_bookmark(&self, owner: UserId, id: BookmarkId) -> Result<Option<Bookmark>, StoreError> {
        self.run("get_bookmark", move |conn| {
            conn.query_row(
                &format!("SELECT {} WHERE b.user_id = ?1 AND b.id = ?2", BOOKMARK_COLUMNS),
                params![owner, id],
                Self::row_to_bookmark,
            )
            .optional()
        })
        .await
    }

    async fn list_bookmarks(
        &self,
        owner: UserId,
        filter: CategoryFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Bookmark>, StoreError> {
        self.run("list_bookmarks", move |conn| {
            let condition = match filter {
                CategoryFilter::All => "",
                CategoryFilter::Uncategorized => " AND b.category_id IS NULL",
                CategoryFilter::Category(_) => " AND b.category_id = ?4",
            };
            let sql = format!(
                "SELECT {} WHERE b.user_id = ?1{} ORDER BY b.seq, b.id LIMIT ?2 OFFSET ?3",
                BOOKMARK_COLUMNS, condition
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = match filter {
                CategoryFilter::Category(id) => {
                    stmt.query_map(params![owner, limit, offset, id], Self::row_to_bookmark)?
                }
                _ => stmt.query_map(params![owner, limit, offset], Self::row_to_bookmark)?,
            };
            rows.collect()
        })
        .await
    }

    async fn insert_bookmark(
        &self,
        owner: UserId,
        name: &str,
        url: &str,
        category: Option<CategoryId>,
    ) -> Result<BookmarkId, StoreError> {
        let (name, url) = (name.to_string(), url.to_string());
        self.run("insert_bookmark", move |conn| {
            conn.execute(
                "INSERT INTO bookmarks (user_id, name, url, category_id, seq) \
                 SELECT ?1, ?2, ?3, ?4, COALESCE(MAX(seq), 0) + 1 FROM bookmarks WHERE user_id = ?1",
                params![owner, name, url, category],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    async fn update_bookmark(
        &self,
        owner: UserId,
        id: BookmarkId,
        name: &str,
        url: &str,
        category: Option<CategoryId>,
    ) -> Result<u64, StoreError> {
        let (name, url) = (name.to_string(), url.to_string());
        self.run("update_bookmark", move |conn| {
            let affected = conn.execute(
                "UPDATE bookmarks SET name = ?3, url = ?4, category_id = ?5 \
                 WHERE user_id = ?1 AND id = ?2",
                params![owner, id, name, url, category],
            )?;
            Ok(affected as u64)
        })
        .await
    }

    async fn delete_bookmark(&self, owner: UserId, id: BookmarkId) -> Result<Option<i64>, StoreError> {
        self.run("delete_bookmark", move |conn| {
            conn.query_row(
                "DELETE FROM bookmarks WHERE user_id = ?1 AND id = ?2 RETURNING seq",
                params![owner, id],
                |row| row.get(0),
            )
            .optional()
        })
        .await
    }

    async fn position(&self, owner: UserId, id: BookmarkId) -> Result<Option<i64>, StoreError> {
        self.run("position", move |conn| {
            conn.query_row(
                "SELECT seq FROM bookmarks WHERE user_id = ?1 AND id = ?2",
                params![owner, id],
                |row| row.get(0),
            )
            .optional()
        })
        .await
    }

    async fn shift_positions(&self, owner: UserId, range: SeqRange, delta: i64) -> Result<u64, StoreError> {
        self.run("shift_positions", move |conn| {
            let affected = conn.execute(
                "UPDATE bookmarks SET seq = seq + ?4 WHERE user_id = ?1 AND seq >= ?2 AND seq <= ?3",
                params![owner, range.start, range.end, delta],
            )?;
            Ok(affected as u64)
        })
        .await
    }

    async fn set_position(&self, owner: UserId, id: BookmarkId, seq: i64) -> Result<u64, StoreError> {
        self.run("set_position", move |conn| {
            let affected = conn.execute(
                "UPDATE bookmarks SET seq = ?3 WHERE user_id = ?1 AND id = ?2",
                params![owner, id, seq],
            )?;
            Ok(affected as u64)
        })
        .await
    }

    async fn positions(&self, owner: UserId) -> Result<Vec<i64>, StoreError> {
        self.run("positions", move |conn| {
            let mut stmt = conn.prepare("SELECT seq FROM bookmarks WHERE user_id = ?1 ORDER BY seq")?;
            let rows = stmt.query_map(params![owner], |row| row.get(0))?;
            rows.collect()
        })
        .await
    }

    async fn renumber_positions(&self, owner: UserId) -> Result<u64, StoreError> {
        self.run("renumber_positions", move |conn| {
            let tx = conn.unchecked_transaction()?;
            let current: Vec<(BookmarkId, i64)> = {
                let mut stmt =
                    tx.prepare("SELECT id, seq FROM bookmarks WHERE user_id = ?1 ORDER BY seq, id")?;
                let rows = stmt.query_map(params![owner], |row| Ok((row.get(0)?, row.get(1)?)))?;
                rows.collect::<rusqlite::Result<_>>()?
            };

            let mut changed = 0;
            for (index, (id, seq)) in current.into_iter().enumerate() {
                let expected = index as i64 + 1;
                if seq != expected {
                    tx.execute(
                        "UPDATE bookmarks SET seq = ?2 WHERE id = ?1",
                        params![id, expected],
                    )?;
                    changed += 1;
                }
            }
            tx.commit()?;
            Ok(changed)
        })
        .await
    }
}
