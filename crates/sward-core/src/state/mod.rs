//! Versioned key-value world state.
//!
//! Handlers execute against an isolated working view of the replicated
//! ledger. This module abstracts that view behind the [`StateStore`] trait:
//! a versioned mapping from composite key to opaque bytes with ordered
//! prefix scans. Two backends are provided:
//!
//! - [`MemoryStore`] — the `BTreeMap`-backed working view used by handler
//!   execution and unit tests; deterministic key order for free.
//! - [`SqliteStore`] — a file-backed store for local simulation runs where
//!   state must survive the process.
//!
//! # Architecture
//!
//! ```text
//! Handler --> StateStore (get/put/delete/scan_page) --> backend
//!                                |
//!                        per-key version counter
//! ```
//!
//! Writes are only durable after network-wide commit; that boundary is
//! owned by the platform. Within one invocation the store behaves as a
//! serializable snapshot, so handlers never observe a concurrent write.
//!
//! # Keys
//!
//! Every entity lives under a namespaced composite key built by
//! [`keys::composite`]. The namespace prefix makes ordered prefix scans
//! (`scan_page`) enumerate exactly one entity family.

pub mod keys;
mod memory;
mod sqlite;
mod store;


pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{StateError, StateStore, VersionedValue};
