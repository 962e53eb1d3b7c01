/*!
 * Word and selection lookups.
 *
 * - `dispatcher`: resolve a token via the index, the cache or the tutor
 * - `cache`: definitions fetched earlier
 * - `selection`: free-text selection state machine
 */

pub mod cache;
pub mod dispatcher;
pub mod selection;

pub use cache::{CacheStats, LookupCache};
pub use dispatcher::{LookupDispatcher, LookupDisplay, LookupResult, LookupSource, LookupTicket};
pub use selection::{Anchor, Rect, SelectionBridge, SelectionLookup, SelectionSnapshot};
