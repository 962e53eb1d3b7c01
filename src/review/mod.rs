/*!
 * Flashcard review: word selection and the review queue.
 */

pub mod filter;
pub mod queue;

pub use filter::WordFilter;
pub use queue::{CardFace, Grade, ReviewSession, ReviewStats, hint};
