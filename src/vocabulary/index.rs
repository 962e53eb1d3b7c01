/*!
 * Vocabulary index keyed by normalized word or phrase.
 *
 * The first entry for a key wins; later duplicates are ignored.
 */

use std::collections::HashMap;

use super::model::{VocabularyItem, normalize_key};

/// Case-insensitive lookup table over known vocabulary entries
#[derive(Debug, Clone, Default)]
pub struct VocabularyIndex {
    entries: HashMap<String, VocabularyItem>,
    /// Largest number of words in any indexed phrase
    longest_phrase: usize,
}

impl VocabularyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index; on duplicate keys the first entry is kept
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a VocabularyItem>,
    {
        let mut index = Self::new();
        for item in items {
            index.insert(item.clone());
        }
        index
    }

    /// Insert an entry unless its key is already present. Returns whether it was added.
    pub fn insert(&mut self, item: VocabularyItem) -> bool {
        let key = item.key();
        if key.is_empty() || self.entries.contains_key(&key) {
            return false;
        }
        self.longest_phrase = self.longest_phrase.max(key.split(' ').count());
        self.entries.insert(key, item);
        true
    }

    pub fn get(&self, word: &str) -> Option<&VocabularyItem> {
        self.entries.get(&normalize_key(word))
    }

    /// Lookup by an already-normalized key, skipping normalization
    pub(crate) fn get_normalized(&self, key: &str) -> Option<&VocabularyItem> {
        self.entries.get(key)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn longest_phrase(&self) -> usize {
        self.longest_phrase
    }

    pub fn iter(&self) -> impl Iterator<Item = &VocabularyItem> {
        self.entries.values()
    }
}
