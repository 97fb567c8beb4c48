//! `SQLite`-backed world-state store.
//!
//! Backs local simulation runs where state must survive the process.
//! Handlers see exactly the same contract as [`MemoryStore`]; only the
//! durability differs.
//!
//! [`MemoryStore`]: super::MemoryStore

// SQLite returns i64 for integer columns; versions are always >= 1 and
// page limits are small.
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

use std::path::Path;

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use tracing::debug;

use super::keys::prefix_upper_bound;
use super::store::{StateError, StateStore};

/// Schema SQL embedded at compile time.
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// A file-backed [`StateStore`] over a single `SQLite` table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates a store at the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StateError> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch(SCHEMA_SQL)?;
        debug!(path = %path.display(), "opened world-state store");
        Ok(Self { conn })
    }

    /// Creates an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self, StateError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }
}

impl StateStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM world_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn version_of(&self, key: &str) -> Result<Option<u64>, StateError> {
        let version: Option<i64> = self
            .conn
            .query_row(
                "SELECT version FROM world_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(version.map(|v| v as u64))
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<u64, StateError> {
        self.conn.execute(
            "INSERT INTO world_state (key, value, version) VALUES (?1, ?2, 1)
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 version = world_state.version + 1",
            params![key, value],
        )?;

        let version: i64 = self.conn.query_row(
            "SELECT version FROM world_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )?;
        Ok(version as u64)
    }

    fn delete(&mut self, key: &str) -> Result<bool, StateError> {
        let removed = self
            .conn
            .execute("DELETE FROM world_state WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    fn scan_page(
        &self,
        prefix: &str,
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<(String, Vec<u8>)>, StateError> {
        let lower = after.unwrap_or(prefix);
        let upper = prefix_upper_bound(prefix);

        let mut stmt = self.conn.prepare(
            "SELECT key, value FROM world_state
             WHERE key > ?1 AND key < ?2
             ORDER BY key ASC
             LIMIT ?3",
        )?;

        let page = stmt
            .query_map(params![lower, upper, limit as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(page)
    }
}
