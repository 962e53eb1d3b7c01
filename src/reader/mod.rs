/*!
 * Reading view support: tokenization, vocabulary highlighting and the
 * sentence context attached to a clicked word.
 *
 * - `tokenizer`: word/separator runs
 * - `annotator`: phrase and word highlighting over a `VocabularyIndex`
 * - `context`: token normalization, sentence splitting, context snippets
 */

pub mod annotator;
pub mod context;
pub mod tokenizer;

pub use annotator::{Annotation, RenderToken, TokenKind, annotate};
pub use context::{context_snippet, lookup_key, normalize_token, sentence_context, sentences};
