/*!
 * Application state: the practice history and the saved-words deck.
 *
 * State changes only through `TutorStore::dispatch`. Every accepted action is
 * written through to the blob store and then announced to subscribers.
 */

use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::models::PracticeSession;
use crate::errors::AppError;
use crate::storage::BlobStore;
use crate::tutor::{Evaluation, TokenUsage};
use crate::vocabulary::{VocabularyItem, normalize_key};

/// Blob key of the practice history (JSON array of sessions)
pub const HISTORY_KEY: &str = "lingotutor.history";

/// Blob key of the saved words (JSON array of vocabulary items)
pub const SAVED_WORDS_KEY: &str = "lingotutor.savedWords";

/// A state change
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Add a new session at the top of the history
    StartSession(PracticeSession),
    /// Attach the learner's translation and its evaluation
    FinishSession {
        id: String,
        translation: String,
        evaluation: Evaluation,
        usage: TokenUsage,
    },
    DeleteSession(String),
    /// Add tokens spent on behalf of a session (lookups)
    RecordUsage { id: String, usage: TokenUsage },
    SaveWord(VocabularyItem),
    /// Remove a saved word by its word, in any casing
    UnsaveWord(String),
}

/// Snapshot of the application state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TutorState {
    /// Newest first
    pub history: Vec<PracticeSession>,
    pub saved_words: Vec<VocabularyItem>,
}

impl TutorState {
    pub fn session(&self, id: &str) -> Option<&PracticeSession> {
        self.history.iter().find(|s| s.id == id)
    }

    pub fn is_saved(&self, word: &str) -> bool {
        let key = normalize_key(word);
        self.saved_words.iter().any(|w| w.key() == key)
    }
}

/// Which blobs an action touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Changes {
    history: bool,
    saved_words: bool,
}

fn session_mut<'s>(state: &'s mut TutorState, id: &str) -> Result<&'s mut PracticeSession, AppError> {
    state
        .history
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| AppError::SessionNotFound(id.to_string()))
}

/// Apply `action` to `state`
fn reduce(state: &mut TutorState, action: &Action) -> Result<Changes, AppError> {
    let mut changes = Changes::default();

    match action {
        Action::StartSession(session) => {
            if state.session(&session.id).is_some() {
                return Err(AppError::Unknown(format!("Session {} already exists", session.id)));
            }
            state.history.insert(0, session.clone());
            changes.history = true;
        }
        Action::FinishSession { id, translation, evaluation, usage } => {
            let session = session_mut(state, id)?;
            session.user_translation = Some(translation.clone());
            session.evaluation = Some(evaluation.clone());
            session.usage += *usage;
            changes.history = true;
        }
        Action::DeleteSession(id) => {
            let before = state.history.len();
            state.history.retain(|s| s.id != *id);
            if state.history.len() == before {
                return Err(AppError::SessionNotFound(id.clone()));
            }
            changes.history = true;
        }
        Action::RecordUsage { id, usage } => {
            if !usage.is_empty() {
                session_mut(state, id)?.usage += *usage;
                changes.history = true;
            }
        }
        Action::SaveWord(item) => {
            if !item.key().is_empty() && !state.is_saved(&item.word) {
                state.saved_words.push(item.clone());
                changes.saved_words = true;
            }
        }
        Action::UnsaveWord(word) => {
            let key = normalize_key(word);
            let before = state.saved_words.len();
            state.saved_words.retain(|w| w.key() != key);
            changes.saved_words = state.saved_words.len() != before;
        }
    }

    Ok(changes)
}

/// Subscriber callback, called after every applied action
pub type Listener = Box<dyn Fn(&Action, &TutorState) + Send + Sync>;

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

pub struct TutorStore {
    blobs: Arc<dyn BlobStore>,
    state: TutorState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: usize,
}

impl TutorStore {
    /// Load the state from `blobs`; an unreadable blob counts as empty
    pub fn open(blobs: Arc<dyn BlobStore>) -> Self {
        let history: Vec<PracticeSession> = load_blob(blobs.as_ref(), HISTORY_KEY);
        let saved_words: Vec<VocabularyItem> = load_blob(blobs.as_ref(), SAVED_WORDS_KEY);
        info!("Loaded {} sessions and {} saved words", history.len(), saved_words.len());

        Self {
            blobs,
            state: TutorState { history, saved_words },
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &TutorState {
        &self.state
    }

    pub fn history(&self) -> &[PracticeSession] {
        &self.state.history
    }

    pub fn saved_words(&self) -> &[VocabularyItem] {
        &self.state.saved_words
    }

    /// Resolve a session by full id or unique id prefix
    pub fn find_session(&self, id_or_prefix: &str) -> Result<&PracticeSession, AppError> {
        let wanted = id_or_prefix.trim();
        if wanted.is_empty() {
            return Err(AppError::SessionNotFound("(empty id)".to_string()));
        }
        if let Some(session) = self.state.session(wanted) {
            return Ok(session);
        }

        let mut matches = self.state.history.iter().filter(|s| s.id.starts_with(wanted));
        match (matches.next(), matches.next()) {
            (Some(session), None) => Ok(session),
            (Some(_), Some(_)) => Err(AppError::SessionNotFound(format!(
                "'{}' matches more than one session",
                wanted
            ))),
            _ => Err(AppError::SessionNotFound(wanted.to_string())),
        }
    }

    /// Apply an action, persist what it changed and notify subscribers
    pub fn dispatch(&mut self, action: Action) -> Result<(), AppError> {
        let changes = reduce(&mut self.state, &action)?;
        debug!("Dispatched {:?}", std::mem::discriminant(&action));

        if changes.history {
            save_blob(self.blobs.as_ref(), HISTORY_KEY, &self.state.history)?;
        }
        if changes.saved_words {
            save_blob(self.blobs.as_ref(), SAVED_WORDS_KEY, &self.state.saved_words)?;
        }

        for (_, listener) in &self.listeners {
            listener(&action, &self.state);
        }
        Ok(())
    }

    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }
}

fn load_blob<T: DeserializeOwned>(blobs: &dyn BlobStore, key: &str) -> Vec<T> {
    let raw = match blobs.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Could not read '{}': {}", key, e);
            return Vec::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("Ignoring unreadable '{}' blob: {}", key, e);
        Vec::new()
    })
}

fn save_blob<T: Serialize>(blobs: &dyn BlobStore, key: &str, value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string(value)
        .map_err(|e| AppError::Storage(format!("Failed to serialize '{}': {}", key, e)))?;
    blobs
        .write(key, &json)
        .map_err(|e| AppError::Storage(format!("Failed to write '{}': {}", key, e)))
}
