/*!
 * Token normalization and sentence context resolution.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::tokenizer::tokenize;
use crate::vocabulary::normalize_key;

/// A sentence: text up to and including its run of terminators.
/// A trailing fragment without a terminator also counts.
static SENTENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^.!?]+[.!?]*").expect("sentence pattern is valid")
});

/// Strip leading/trailing punctuation and lowercase
pub fn normalize_token(token: &str) -> String {
    normalize_key(token.trim_matches(|c: char| !c.is_alphanumeric()))
}

/// Vocabulary key of a token or selection: its words, each normalized,
/// joined with single spaces. Punctuation between words is dropped.
pub fn lookup_key(token: &str) -> String {
    tokenize(token)
        .iter()
        .filter(|run| run.is_word())
        .map(|run| normalize_token(run.slice(token)))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split text into trimmed sentences, terminators retained
pub fn sentences(text: &str) -> Vec<&str> {
    SENTENCE_REGEX
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// First sentence of `text` containing `token` (case-insensitive), or an empty string
pub fn sentence_context(token: &str, text: &str) -> String {
    let needle = normalize_token(token);
    if needle.is_empty() {
        return String::new();
    }

    sentences(text)
        .into_iter()
        .find(|sentence| normalize_key(sentence).contains(&needle))
        .map(str::to_string)
        .unwrap_or_default()
}

/// The first `max_chars` characters of `text`, with an ellipsis when cut
pub fn context_snippet(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
