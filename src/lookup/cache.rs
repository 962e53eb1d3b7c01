/*!
 * Cache of definitions fetched from the tutor.
 *
 * Entries are keyed by the normalized word so a second click on the same
 * word, in any casing, is served without a network call.
 */

use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::vocabulary::{VocabularyItem, normalize_key};

/// Hit and miss counters of a `LookupCache`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 { self.hits as f64 / total as f64 } else { 0.0 }
    }
}

/// Shared cache of fetched vocabulary items; clones share storage
#[derive(Debug, Clone, Default)]
pub struct LookupCache {
    entries: Arc<RwLock<HashMap<String, VocabularyItem>>>,
    stats: Arc<RwLock<CacheStats>>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a cached item by word, in any casing
    pub fn get(&self, word: &str) -> Option<VocabularyItem> {
        let key = normalize_key(word);
        let found = self.entries.read().get(&key).cloned();

        let mut stats = self.stats.write();
        match found {
            Some(_) => {
                stats.hits += 1;
                debug!("Lookup cache hit for '{}'", key);
            }
            None => {
                stats.misses += 1;
                debug!("Lookup cache miss for '{}'", key);
            }
        }
        found
    }

    /// Store an item under its own key, replacing an older entry
    pub fn store(&self, item: VocabularyItem) {
        let key = item.key();
        if key.is_empty() {
            return;
        }
        self.entries.write().insert(key, item);
    }

    pub fn stats(&self) -> CacheStats {
        *self.stats.read()
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        self.entries.write().clear();
        *self.stats.write() = CacheStats::default();
        debug!("Lookup cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
