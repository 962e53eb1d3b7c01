/*!
 * Tests for vocabulary highlighting over running text
 */

use lingotutor::reader::{TokenKind, annotate, sentence_context};
use lingotutor::vocabulary::{VocabularyIndex, VocabularyItem};

use crate::common::SAMPLE_TEXT;

fn index_of(words: &[&str]) -> VocabularyIndex {
    let items: Vec<VocabularyItem> = words.iter().map(|w| VocabularyItem::new(*w, "d", "t")).collect();
    VocabularyIndex::from_items(&items)
}

fn highlighted(text: &str, index: &VocabularyIndex) -> Vec<(String, TokenKind)> {
    annotate(text, index)
        .tokens()
        .filter(|token| token.kind.is_highlighted())
        .map(|token| (token.text.to_string(), token.kind))
        .collect()
}

/// Every contiguous occurrence of a known phrase is one highlighted unit
#[test]
fn test_annotate_withRepeatedPhrases_shouldHighlightEachOccurrence() {
    let index = index_of(&["give up", "look forward to", "mat"]);
    let text = "Never GIVE UP. I look forward to it; they gave up, then give, up again on the mat!";

    let tokens = highlighted(text, &index);
    assert_eq!(
        tokens,
        vec![
            ("GIVE UP".to_string(), TokenKind::Phrase),
            ("look forward to".to_string(), TokenKind::Phrase),
            ("give, up".to_string(), TokenKind::Phrase),
            ("mat".to_string(), TokenKind::Vocabulary),
        ]
    );
}

#[test]
fn test_annotate_withOverlappingPhrases_shouldPreferLongestWindow() {
    let index = index_of(&["ice cream", "ice cream truck"]);
    let tokens = highlighted("The ice cream truck left. Ice cream!", &index);
    assert_eq!(tokens[0].0, "ice cream truck");
    assert_eq!(tokens[1].0, "Ice cream");
}

#[test]
fn test_annotate_shouldReassembleSourceExactly() {
    let index = index_of(&["sat on"]);
    let text = "  The cat — sat   on\tthe mat...  ";
    let rebuilt: String = annotate(text, &index).tokens().map(|t| t.text).collect();
    assert_eq!(rebuilt, text);
}

/// Sample scenario: a phrase in sentence one, context of sentence two
#[test]
fn test_annotate_sampleText_shouldMatchPhraseAndResolveSecondSentence() {
    let index = index_of(&["sat on"]);
    let annotation = annotate(SAMPLE_TEXT, &index);

    let phrases: Vec<_> = annotation.tokens().filter(|t| t.kind == TokenKind::Phrase).collect();
    assert_eq!(phrases.len(), 1);
    assert_eq!(phrases[0].text, "sat on");
    assert!(phrases[0].span.end <= SAMPLE_TEXT.find('.').unwrap());

    let second_sentence_start = SAMPLE_TEXT.find("It").unwrap();
    for token in annotation.tokens().filter(|t| t.kind.is_clickable() && t.span.start >= second_sentence_start) {
        assert_eq!(sentence_context(token.text, SAMPLE_TEXT), "It was happy.");
    }
}

#[test]
fn test_annotate_withEmptyIndex_shouldLeaveEveryWordPlain() {
    let index = VocabularyIndex::new();
    assert!(highlighted(SAMPLE_TEXT, &index).is_empty());
    let words = annotate(SAMPLE_TEXT, &index).tokens().filter(|t| t.kind == TokenKind::Plain).count();
    assert_eq!(words, 9);
}
