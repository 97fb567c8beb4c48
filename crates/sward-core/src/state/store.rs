//! The state-store trait and its error type.

use thiserror::Error;

/// Errors that can occur during world-state operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StateError {
    /// Database error from `SQLite`.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O error during store operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be decoded (or a value could not be
    /// encoded for storage). Indicates ledger corruption or a schema
    /// mismatch between writer and reader.
    #[error("corrupt value at key {key}: {details}")]
    Corrupt {
        /// The composite key holding the bad value.
        key: String,
        /// Details about the failure.
        details: String,
    },
}

/// A value together with its per-key write version.
///
/// The version starts at 1 on first write and increments on every
/// subsequent `put`. The platform's optimistic concurrency control
/// compares these versions at commit time; inside one invocation they
/// are observational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    /// The stored bytes.
    pub value: Vec<u8>,

    /// Monotonic write counter for this key.
    pub version: u64,
}

/// A versioned mapping from composite key to opaque bytes.
///
/// Object-safe so handlers can run against any backend. Scans are
/// cursor-paged rather than returning a live iterator: callers pull a
/// page, remember the last key, and ask for the next page — the same
/// shape as a ledger cursor read. This keeps enumeration lazy, finite,
/// and restartable without tying an iterator lifetime to the backend's
/// internals.
pub trait StateStore {
    /// Returns the value at `key`, or `None` if the key is unpopulated.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StateError>;

    /// Returns the current write version of `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    fn version_of(&self, key: &str) -> Result<Option<u64>, StateError>;

    /// Writes `value` at `key`, creating or overwriting, and returns the
    /// new version.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    fn put(&mut self, key: &str, value: &[u8]) -> Result<u64, StateError>;

    /// Deletes `key`. Returns `true` if a value was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    fn delete(&mut self, key: &str) -> Result<bool, StateError>;

    /// Reads one page of keys under `prefix` in ascending key order.
    ///
    /// Returns up to `limit` entries with keys strictly greater than
    /// `after` (or from the start of the prefix when `after` is `None`).
    /// An empty page means the scan is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    fn scan_page(
        &self,
        prefix: &str,
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<(String, Vec<u8>)>, StateError>;
}
