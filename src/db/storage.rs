//! Key/value storage for state that outlives one run: bookmarks and the API token.

use crate::core::bookmarks::BookmarkPersistence;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

/// Serialized bookmark collection.
pub const BOOKMARKS_KEY: &str = "marking_bookmarks";
/// Credential attached to every API request when present.
pub const API_TOKEN_KEY: &str = "api_token";

pub fn get(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM storage WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}

pub fn set(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO storage (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, Local::now().to_rfc3339()],
    )?;
    Ok(())
}

/// Returns whether a value was stored under `key`.
pub fn remove(conn: &Connection, key: &str) -> AppResult<bool> {
    let n = conn.execute("DELETE FROM storage WHERE key = ?1", params![key])?;
    Ok(n > 0)
}

/// Bookmarks persisted under [`BOOKMARKS_KEY`].
pub struct SqliteBookmarkPersistence {
    pool: DbPool,
}

impl SqliteBookmarkPersistence {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }
}

impl BookmarkPersistence for SqliteBookmarkPersistence {
    fn load(&self) -> AppResult<Option<String>> {
        get(&self.pool.conn, BOOKMARKS_KEY)
    }

    fn save(&mut self, json: &str) -> AppResult<()> {
        set(&self.pool.conn, BOOKMARKS_KEY, json)
    }
}
