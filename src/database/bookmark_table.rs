//! Embedded `bookmarks` table.
//!
//! Implements [`RemoteTable`] on top of SQLite so the client core can run
//! against a local store (and so tests have a real table to talk to).

use chrono::{DateTime, SubsecRound, Utc};
use parking_lot::Mutex;
use rusqlite::{params, types::Type, Row};
use uuid::Uuid;

use super::connection::Database;
use crate::remote::RemoteTable;
use crate::types::bookmark::{Bookmark, BookmarkPatch, NewBookmark};
use crate::types::errors::RemoteError;

const SELECT_COLUMNS: &str = "SELECT id, title, url, user_id, created_at FROM bookmarks";

/// [`RemoteTable`] backed by a [`Database`].
///
/// The connection is serialized behind a mutex so the table can be shared
/// between the caller's thread and the realtime worker.
pub struct SqliteTable {
    db: Mutex<Database>,
}

impl SqliteTable {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Fresh in-memory table.
    pub fn in_memory() -> Result<Self, RemoteError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Number of rows across all owners.
    pub fn row_count(&self) -> Result<i64, RemoteError> {
        let db = self.db.lock();
        let count = db
            .connection()
            .query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_bookmark(row: &Row) -> rusqlite::Result<Bookmark> {
        let micros: i64 = row.get(4)?;
        let created_at = DateTime::<Utc>::from_timestamp_micros(micros).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                Type::Integer,
                format!("created_at out of range: {}", micros).into(),
            )
        })?;
        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            user_id: row.get(3)?,
            created_at,
        })
    }
}

impl RemoteTable for SqliteTable {
    fn select_by_owner(&self, user_id: &str) -> Result<Vec<Bookmark>, RemoteError> {
        let db = self.db.lock();
        let mut stmt = db.connection().prepare(&format!(
            "{} WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![user_id], Self::row_to_bookmark)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn insert(&self, row: &NewBookmark) -> Result<Bookmark, RemoteError> {
        let created = Bookmark {
            id: Uuid::new_v4().to_string(),
            title: row.title.clone(),
            url: row.url.clone(),
            user_id: row.user_id.clone(),
            // Stored with microsecond precision.
            created_at: Utc::now().trunc_subsecs(6),
        };

        self.db.lock().connection().execute(
            "INSERT INTO bookmarks (id, title, url, user_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                created.id,
                created.title,
                created.url,
                created.user_id,
                created.created_at.timestamp_micros()
            ],
        )?;

        Ok(created)
    }

    fn update(&self, user_id: &str, id: &str, patch: &BookmarkPatch) -> Result<usize, RemoteError> {
        let affected = self.db.lock().connection().execute(
            "UPDATE bookmarks SET title = ?1, url = ?2 WHERE id = ?3 AND user_id = ?4",
            params![patch.title, patch.url, id, user_id],
        )?;
        Ok(affected)
    }

    fn delete(&self, user_id: &str, id: &str) -> Result<usize, RemoteError> {
        let affected = self.db.lock().connection().execute(
            "DELETE FROM bookmarks WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(affected)
    }
}
