/*!
 * Tests for the lookup dispatcher and the stale-result guard
 */

use std::sync::Arc;

use lingotutor::lookup::dispatcher::FALLBACK_DEFINITION;
use lingotutor::lookup::{LookupDispatcher, LookupDisplay, LookupSource};
use lingotutor::vocabulary::{VocabularyIndex, VocabularyItem};

use crate::common::{SAMPLE_TEXT, ScriptedTutor, init_test_logging, sample_study};

fn dispatcher(tutor: &ScriptedTutor) -> LookupDispatcher {
    let index = VocabularyIndex::from_items(&sample_study().vocabulary);
    LookupDispatcher::new(index, Arc::new(tutor.clone()), 500)
}

/// Simulated network failure still yields an item to show
#[tokio::test]
async fn test_lookup_withNetworkFailure_shouldReturnFallbackForWord() {
    init_test_logging();
    let tutor = ScriptedTutor::new().failing_lookups();
    let result = dispatcher(&tutor).lookup("foo", "Anything at all, foo included.").await;

    assert_eq!(result.item.word, "foo");
    assert_eq!(result.source, LookupSource::Fallback);
    assert!(!result.item.definition.is_empty());
    assert_eq!(result.item.definition, FALLBACK_DEFINITION);
    assert!(result.usage.is_empty());
}

#[tokio::test]
async fn test_lookup_knownPhrase_shouldNotReachTutor() {
    let tutor = ScriptedTutor::new();
    let result = dispatcher(&tutor).lookup("Sat on", SAMPLE_TEXT).await;

    assert_eq!(result.source, LookupSource::Index);
    assert_eq!(result.item.translation, "se sentó en");
    assert_eq!(tutor.lookup_count(), 0);
}

#[tokio::test]
async fn test_lookup_sameWordTwice_shouldUseCacheWithFreshContext() {
    let tutor = ScriptedTutor::new().with_definition(VocabularyItem::new("happy", "feliz", "contento"));
    let dispatcher = dispatcher(&tutor);

    let first = dispatcher.lookup("happy.", SAMPLE_TEXT).await;
    let second = dispatcher.lookup("Happy", "She is happy today. Very.").await;

    assert_eq!(first.source, LookupSource::Remote);
    assert_eq!(first.item.context.as_deref(), Some("It was happy."));
    assert_eq!(second.source, LookupSource::Cache);
    assert_eq!(second.item.context.as_deref(), Some("She is happy today."));
    assert_eq!(tutor.lookup_count(), 1);
    assert!(second.ticket > first.ticket);
}

#[tokio::test]
async fn test_lookup_shouldSendWordAndTextSnippet() {
    let tutor = ScriptedTutor::new();
    let index = VocabularyIndex::new();
    let dispatcher = LookupDispatcher::new(index, Arc::new(tutor.clone()), 10);

    dispatcher.lookup("\"Mat!\"", SAMPLE_TEXT).await;

    let tracker = tutor.tracker();
    let tracker = tracker.lock().unwrap();
    let calls = &tracker.lookups;
    assert_eq!(calls[0].0, "mat");
    assert_eq!(calls[0].1, "The cat sa...");
}

/// A slow earlier lookup must not replace a newer one on screen
#[tokio::test]
async fn test_display_withOutOfOrderResults_shouldKeepNewest() {
    let tutor = ScriptedTutor::new().with_delay("cat", 50).with_delay("mat", 1);
    let dispatcher = dispatcher(&tutor);
    let mut display = LookupDisplay::new();

    let slow = dispatcher.lookup("cat", SAMPLE_TEXT);
    let fast = dispatcher.lookup("mat", SAMPLE_TEXT);
    let (slow, fast) = futures::join!(slow, fast);

    assert!(display.offer(fast));
    assert!(!display.offer(slow));
    assert_eq!(display.current().unwrap().item.word, "mat");
}
