/*!
 * Vocabulary entries and the case-insensitive index used for highlighting
 * and for resolving clicks without a network round-trip.
 */

pub mod index;
pub mod model;

pub use index::VocabularyIndex;
pub use model::{CefrLevel, VocabularyItem, normalize_key};
