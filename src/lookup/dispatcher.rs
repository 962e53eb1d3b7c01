/*!
 * Resolution of a clicked token or a selected text into a vocabulary item.
 *
 * Resolution order:
 * 1. the vocabulary index of the text being read
 * 2. items fetched earlier by this dispatcher
 * 3. the tutor's `lookup_word`
 *
 * A failed remote lookup yields a placeholder item instead of an error, so
 * the caller always has something to show.
 */

use log::{debug, warn};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::cache::LookupCache;
use crate::reader::{context_snippet, lookup_key, sentence_context};
use crate::tutor::{TokenUsage, TutorService};
use crate::vocabulary::{VocabularyIndex, VocabularyItem};

/// Definition of the placeholder item returned when a lookup fails
pub const FALLBACK_DEFINITION: &str = "Definition not available: the lookup failed.";

/// Part of speech of the placeholder item
pub const FALLBACK_TYPE: &str = "Unknown";

/// Sequence number of a lookup, increasing in the order lookups were started
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LookupTicket(u64);

impl LookupTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Where a lookup result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    Index,
    Cache,
    Remote,
    Fallback,
}

/// Outcome of a lookup
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub ticket: LookupTicket,
    pub item: VocabularyItem,
    pub source: LookupSource,
    /// Tokens spent; zero unless the tutor was called
    pub usage: TokenUsage,
}

/// Build the placeholder item for a failed lookup
pub fn fallback_item(word: &str, context: String) -> VocabularyItem {
    VocabularyItem::new(word, FALLBACK_DEFINITION, "")
        .with_part_of_speech(FALLBACK_TYPE)
        .with_context(context)
}

/// Resolves tokens against a text's vocabulary, a cache and the tutor
pub struct LookupDispatcher {
    index: VocabularyIndex,
    cache: LookupCache,
    tutor: Arc<dyn TutorService>,
    snippet_chars: usize,
    sequence: AtomicU64,
}

impl LookupDispatcher {
    pub fn new(index: VocabularyIndex, tutor: Arc<dyn TutorService>, snippet_chars: usize) -> Self {
        Self {
            index,
            cache: LookupCache::new(),
            tutor,
            snippet_chars,
            sequence: AtomicU64::new(0),
        }
    }

    /// Share an existing cache instead of starting empty
    pub fn with_cache(mut self, cache: LookupCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn index(&self) -> &VocabularyIndex {
        &self.index
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    fn next_ticket(&self) -> LookupTicket {
        LookupTicket(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Look up `token` as it occurs in `full_text`.
    ///
    /// The ticket is taken when this is called, not when the future is first
    /// polled, so tickets follow click order.
    pub fn lookup<'a>(&'a self, token: &'a str, full_text: &'a str) -> impl Future<Output = LookupResult> + Send + 'a {
        let ticket = self.next_ticket();
        async move { self.resolve(ticket, token, full_text).await }
    }

    async fn resolve(&self, ticket: LookupTicket, token: &str, full_text: &str) -> LookupResult {
        let word = lookup_key(token);
        let context = sentence_context(token, full_text);

        if let Some(entry) = self.index.get(&word) {
            let mut item = entry.clone();
            if !item.has_context() {
                item.context = Some(context);
            }
            return LookupResult { ticket, item, source: LookupSource::Index, usage: TokenUsage::default() };
        }

        if let Some(mut item) = self.cache.get(&word) {
            item.context = Some(context);
            return LookupResult { ticket, item, source: LookupSource::Cache, usage: TokenUsage::default() };
        }

        if word.is_empty() {
            return LookupResult {
                ticket,
                item: fallback_item(token.trim(), context),
                source: LookupSource::Fallback,
                usage: TokenUsage::default(),
            };
        }

        let snippet = context_snippet(full_text, self.snippet_chars);
        match self.tutor.lookup_word(&word, &snippet).await {
            Ok(answer) => {
                let mut item = answer.value;
                item.word = word;
                item.context = Some(context);
                self.cache.store(item.clone());
                debug!("Looked up '{}' ({})", item.word, answer.usage);
                LookupResult { ticket, item, source: LookupSource::Remote, usage: answer.usage }
            }
            Err(e) => {
                warn!("Lookup of '{}' failed: {}", word, e);
                LookupResult {
                    ticket,
                    item: fallback_item(&word, context),
                    source: LookupSource::Fallback,
                    usage: TokenUsage::default(),
                }
            }
        }
    }
}

/// The lookup result currently on screen.
///
/// Results may arrive out of order; one older than what is shown is dropped.
#[derive(Debug, Default)]
pub struct LookupDisplay {
    current: Option<LookupResult>,
}

impl LookupDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `result` unless a newer lookup is already shown. Returns whether it was accepted.
    pub fn offer(&mut self, result: LookupResult) -> bool {
        let stale = self
            .current
            .as_ref()
            .is_some_and(|shown| result.ticket < shown.ticket);
        if stale {
            debug!("Dropping stale lookup result #{}", result.ticket.value());
            return false;
        }
        self.current = Some(result);
        true
    }

    pub fn current(&self) -> Option<&LookupResult> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
