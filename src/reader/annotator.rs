/*!
 * Turns tokenized text into render tokens, highlighting known vocabulary.
 *
 * At each word the annotator first tries multi-word phrases, longest window
 * first (up to four words), joining the next normalized words with single
 * spaces and ignoring the punctuation around and between them. A matched phrase becomes one token
 * whose display text is the exact source slice it covers. Otherwise the word
 * is emitted alone, highlighted when the index knows it.
 */

use std::ops::Range;

use super::context::normalize_token;
use super::tokenizer::{Run, tokenize};
use crate::vocabulary::VocabularyIndex;

/// Longest phrase window tried, in words
pub const MAX_PHRASE_WORDS: usize = 4;

/// Shortest phrase window tried, in words
pub const MIN_PHRASE_WORDS: usize = 2;

/// How a token should be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A clickable word with no known entry
    Plain,
    /// A single word found in the vocabulary index
    Vocabulary,
    /// A multi-word vocabulary phrase
    Phrase,
    /// Punctuation or whitespace, not clickable
    Separator,
}

impl TokenKind {
    pub fn is_highlighted(&self) -> bool {
        matches!(self, Self::Vocabulary | Self::Phrase)
    }

    pub fn is_clickable(&self) -> bool {
        !matches!(self, Self::Separator)
    }
}

/// A token ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderToken<'t> {
    /// Exact source text covered by the token
    pub text: &'t str,
    pub kind: TokenKind,
    /// Byte range into the source text
    pub span: Range<usize>,
    /// Normalized lookup key; `None` for separators
    pub key: Option<String>,
}

/// An annotated text; hands out fresh token iterators on demand
#[derive(Debug, Clone)]
pub struct Annotation<'a> {
    text: &'a str,
    runs: Vec<Run>,
    index: &'a VocabularyIndex,
}

impl<'a> Annotation<'a> {
    pub fn new(text: &'a str, index: &'a VocabularyIndex) -> Self {
        Self {
            text,
            runs: tokenize(text),
            index,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Iterate render tokens from the start of the text
    pub fn tokens(&self) -> RenderTokens<'_, 'a> {
        RenderTokens {
            annotation: self,
            cursor: 0,
        }
    }

    /// Try to match a phrase starting at the word run `start`.
    /// Returns the index of the last consumed run and the phrase key.
    fn match_phrase(&self, start: usize) -> Option<(usize, String)> {
        let max_window = MAX_PHRASE_WORDS.min(self.index.longest_phrase());
        if max_window < MIN_PHRASE_WORDS {
            return None;
        }

        let mut positions = Vec::with_capacity(max_window);
        let mut words = Vec::with_capacity(max_window);
        for (offset, run) in self.runs[start..].iter().enumerate() {
            if !run.is_word() {
                continue;
            }
            let word = normalize_token(run.slice(self.text));
            if word.is_empty() {
                continue;
            }
            positions.push(start + offset);
            words.push(word);
            if words.len() == max_window {
                break;
            }
        }

        (MIN_PHRASE_WORDS..=words.len()).rev().find_map(|window| {
            let key = words[..window].join(" ");
            self.index
                .get_normalized(&key)
                .map(|_| (positions[window - 1], key))
        })
    }
}

/// Lazy iterator over the render tokens of an [`Annotation`]
#[derive(Debug, Clone)]
pub struct RenderTokens<'r, 'a> {
    annotation: &'r Annotation<'a>,
    cursor: usize,
}

impl<'r, 'a> Iterator for RenderTokens<'r, 'a> {
    type Item = RenderToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let annotation = self.annotation;
        let run = annotation.runs.get(self.cursor)?;
        let text = annotation.text;

        if !run.is_word() {
            self.cursor += 1;
            return Some(RenderToken {
                text: run.slice(text),
                kind: TokenKind::Separator,
                span: run.span.clone(),
                key: None,
            });
        }

        if let Some((last, key)) = annotation.match_phrase(self.cursor) {
            let span = run.span.start..annotation.runs[last].span.end;
            self.cursor = last + 1;
            return Some(RenderToken {
                text: &text[span.clone()],
                kind: TokenKind::Phrase,
                span,
                key: Some(key),
            });
        }

        self.cursor += 1;
        let key = normalize_token(run.slice(text));
        let kind = if annotation.index.get_normalized(&key).is_some() {
            TokenKind::Vocabulary
        } else {
            TokenKind::Plain
        };

        Some(RenderToken {
            text: run.slice(text),
            kind,
            span: run.span.clone(),
            key: Some(key),
        })
    }
}

/// Annotate `text` against `index`
pub fn annotate<'a>(text: &'a str, index: &'a VocabularyIndex) -> Annotation<'a> {
    Annotation::new(text, index)
}
