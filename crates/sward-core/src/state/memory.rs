//! In-memory world-state backend.

use std::collections::BTreeMap;
use std::ops::Bound;

use super::keys::prefix_upper_bound;
use super::store::{StateError, StateStore, VersionedValue};

/// `BTreeMap`-backed state store.
///
/// This is the working view a handler executes against: deterministic
/// key order, no I/O, no interior mutability. A fresh store replayed
/// with the same invocations produces byte-identical state, which is
/// what the platform's repeated simulation relies on.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, VersionedValue>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.entries.get(key).map(|entry| entry.value.clone()))
    }

    fn version_of(&self, key: &str) -> Result<Option<u64>, StateError> {
        Ok(self.entries.get(key).map(|entry| entry.version))
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<u64, StateError> {
        let version = self.entries.get(key).map_or(1, |entry| entry.version + 1);
        self.entries.insert(
            key.to_owned(),
            VersionedValue {
                value: value.to_vec(),
                version,
            },
        );
        Ok(version)
    }

    fn delete(&mut self, key: &str) -> Result<bool, StateError> {
        Ok(self.entries.remove(key).is_some())
    }

    fn scan_page(
        &self,
        prefix: &str,
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<(String, Vec<u8>)>, StateError> {
        let lower = after.unwrap_or(prefix).to_owned();
        let upper = prefix_upper_bound(prefix);

        let page = self
            .entries
            .range::<String, _>((Bound::Excluded(lower), Bound::Excluded(upper)))
            .take(limit)
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect();

        Ok(page)
    }
}
