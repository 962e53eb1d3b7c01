/*!
 * Splits raw text into alternating word and separator runs.
 *
 * A word is a maximal run of letters (accented included), combining marks,
 * digits, apostrophes and hyphens. Everything between two words is one
 * separator run, kept verbatim so the text can be reassembled exactly.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Word character class
static WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{M}\p{N}'’\-]+").expect("word pattern is valid")
});

/// Kind of a raw run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Word,
    Separator,
}

/// A contiguous run of the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub kind: RunKind,
    /// Byte range into the source text
    pub span: Range<usize>,
}

impl Run {
    pub fn is_word(&self) -> bool {
        self.kind == RunKind::Word
    }

    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        &text[self.span.clone()]
    }
}

/// Tokenize text into runs covering every byte exactly once
pub fn tokenize(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut last_end = 0;

    for m in WORD_REGEX.find_iter(text) {
        if m.start() > last_end {
            runs.push(Run { kind: RunKind::Separator, span: last_end..m.start() });
        }
        runs.push(Run { kind: RunKind::Word, span: m.start()..m.end() });
        last_end = m.end();
    }

    if last_end < text.len() {
        runs.push(Run { kind: RunKind::Separator, span: last_end..text.len() });
    }

    runs
}
