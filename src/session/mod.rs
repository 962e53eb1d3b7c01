/*!
 * Practice sessions and the persisted application state.
 *
 * - `models`: the `PracticeSession` record
 * - `store`: `TutorStore`, the action-driven owner of history and saved words
 */

pub mod models;
pub mod store;

pub use models::{PracticeSession, SessionOrigin};
pub use store::{Action, HISTORY_KEY, Listener, SAVED_WORDS_KEY, SubscriptionId, TutorState, TutorStore};
