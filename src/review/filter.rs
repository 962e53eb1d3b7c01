/*!
 * Word filters for building a review deck.
 */

use crate::vocabulary::{CefrLevel, VocabularyItem};

/// Criteria selecting the words that go into a review
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordFilter {
    /// Keep only these levels; empty keeps all
    pub cefr: Vec<CefrLevel>,
    /// Part of speech, case-insensitive
    pub part_of_speech: Option<String>,
    /// Substring of word, definition or translation, case-insensitive
    pub query: Option<String>,
}

impl WordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cefr(mut self, level: CefrLevel) -> Self {
        self.cefr.push(level);
        self
    }

    pub fn with_part_of_speech(mut self, part_of_speech: impl Into<String>) -> Self {
        self.part_of_speech = Some(part_of_speech.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn matches(&self, item: &VocabularyItem) -> bool {
        if !self.cefr.is_empty() && !item.cefr.is_some_and(|level| self.cefr.contains(&level)) {
            return false;
        }

        if let Some(wanted) = self.part_of_speech.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            let matches_type = item
                .part_of_speech
                .as_deref()
                .is_some_and(|pos| pos.trim().eq_ignore_ascii_case(wanted));
            if !matches_type {
                return false;
            }
        }

        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            let hit = [&item.word, &item.definition, &item.translation]
                .iter()
                .any(|field| field.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }

        true
    }

    /// Clone the matching items, keeping their order
    pub fn apply<'a, I>(&self, items: I) -> Vec<VocabularyItem>
    where
        I: IntoIterator<Item = &'a VocabularyItem>,
    {
        items.into_iter().filter(|item| self.matches(item)).cloned().collect()
    }
}
