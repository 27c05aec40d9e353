//! In-memory cache of resolved artwork, keyed by normalized title/artist.
//!
//! Entries are never evicted. The working set is the distinct tracks seen
//! during one process lifetime; `clear` is the only way to drop them.

use super::models::ArtworkCandidate;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

#[derive(Default)]
pub struct ResultCache {
    entries: RwLock<HashMap<String, ArtworkCandidate>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<ArtworkCandidate> {
        self.entries.read().unwrap().get(key).cloned()
    }

    /// Stores a candidate, replacing any previous entry for the key.
    pub fn set(&self, key: impl Into<String>, candidate: ArtworkCandidate) {
        self.entries.write().unwrap().insert(key.into(), candidate);
    }

    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the cache contents, keys sorted.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read().unwrap();
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: keys.len(),
            keys,
        }
    }
}
