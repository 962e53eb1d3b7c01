use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::TutorError;
use crate::lookup::{
    LookupCache, LookupDispatcher, LookupDisplay, LookupResult, LookupSource, Rect, SelectionBridge,
    SelectionSnapshot,
};
use crate::reader::lookup_key;
use crate::reader::tokenizer::tokenize;
use crate::review::WordFilter;
use crate::session::{Action, PracticeSession, SessionOrigin, TutorStore};
use crate::storage::{BlobStore, DatabaseConnection, KvRepository};
use crate::tutor::{Evaluation, GenerateRequest, LlmTutor, Metered, StudyText, TutorService};
use crate::vocabulary::VocabularyItem;

// @module: Application controller tying the tutor, the lookup engine and the store together

/// Stand-in tutor used when the configured one cannot be built.
///
/// Lookups still resolve from the text's vocabulary and the cache; anything
/// that needs the provider fails with the original configuration error.
struct UnconfiguredTutor {
    reason: String,
}

#[async_trait]
impl TutorService for UnconfiguredTutor {
    async fn generate(&self, _request: &GenerateRequest) -> Result<Metered<StudyText>, TutorError> {
        Err(TutorError::Configuration(self.reason.clone()))
    }

    async fn analyze(&self, _text: &str) -> Result<Metered<StudyText>, TutorError> {
        Err(TutorError::Configuration(self.reason.clone()))
    }

    async fn lookup_word(&self, _word: &str, _context: &str) -> Result<Metered<VocabularyItem>, TutorError> {
        Err(TutorError::Configuration(self.reason.clone()))
    }

    async fn evaluate_translation(&self, _original: &str, _translation: &str) -> Result<Metered<Evaluation>, TutorError> {
        Err(TutorError::Configuration(self.reason.clone()))
    }

    async fn check_connection(&self) -> Result<(), TutorError> {
        Err(TutorError::Configuration(self.reason.clone()))
    }
}

/// Lookup state of the session currently being read
struct ReadingView {
    session_id: String,
    text: String,
    dispatcher: LookupDispatcher,
    display: LookupDisplay,
    selection: SelectionBridge,
}

/// Spinner shown while waiting on the tutor; hidden when `enabled` is false
fn spinner(enabled: bool, message: impl Into<String>) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    store: TutorStore,
    // @field: Built on first use so offline commands never need credentials
    tutor: Option<Arc<dyn TutorService>>,
    cache: LookupCache,
    reading: Option<ReadingView>,
    show_progress: bool,
}

impl Controller {
    // @method: Create a controller over the configured database
    pub fn with_config(config: Config) -> Result<Self> {
        let db = match &config.storage.database_path {
            Some(path) => DatabaseConnection::open(path),
            None => DatabaseConnection::open_default(),
        }
        .context("Failed to open the session database")?;
        info!("Using database {}", db.path().display());

        let mut controller = Self::with_parts(config, Arc::new(KvRepository::new(db)), None);
        controller.show_progress = true;
        Ok(controller)
    }

    /// Create a controller from explicit parts; `tutor` overrides the configured provider
    pub fn with_parts(config: Config, blobs: Arc<dyn BlobStore>, tutor: Option<Arc<dyn TutorService>>) -> Self {
        Self {
            config,
            store: TutorStore::open(blobs),
            tutor,
            cache: LookupCache::new(),
            reading: None,
            show_progress: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &TutorStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TutorStore {
        &mut self.store
    }

    pub fn history(&self) -> &[PracticeSession] {
        self.store.history()
    }

    pub fn saved_words(&self) -> &[VocabularyItem] {
        self.store.saved_words()
    }

    /// Resolve a session by id or unique id prefix
    pub fn session(&self, id: &str) -> Result<&PracticeSession> {
        Ok(self.store.find_session(id)?)
    }

    /// The tutor, built from the configuration on first use
    fn tutor(&mut self) -> Result<Arc<dyn TutorService>, TutorError> {
        if let Some(tutor) = &self.tutor {
            return Ok(tutor.clone());
        }
        let tutor: Arc<dyn TutorService> = Arc::new(LlmTutor::from_config(&self.config)?);
        self.tutor = Some(tutor.clone());
        Ok(tutor)
    }

    /// The tutor for lookups; a configuration problem downgrades to failed lookups
    fn lookup_tutor(&mut self) -> Arc<dyn TutorService> {
        match self.tutor() {
            Ok(tutor) => tutor,
            Err(e) => {
                warn!("Tutor unavailable, lookups limited to known vocabulary: {}", e);
                Arc::new(UnconfiguredTutor { reason: e.to_string() })
            }
        }
    }

    fn spinner(&self, message: impl Into<String>) -> ProgressBar {
        spinner(self.show_progress, message)
    }

    /// Verify the configured provider answers before a session relies on it
    pub async fn check_connection(&mut self) -> Result<()> {
        let tutor = self.tutor()?;
        let spinner = self.spinner(format!("Contacting {}", self.config.tutor.provider.display_name()));
        let result = tutor.check_connection().await;
        spinner.finish_and_clear();
        result.context("Provider connection check failed")?;

        info!("{} is reachable", self.config.tutor.provider.display_name());
        Ok(())
    }

    /// Ask the tutor for a new text and record it as a session
    pub async fn generate(&mut self, request: GenerateRequest) -> Result<PracticeSession> {
        let tutor = self.tutor()?;
        let spinner = self.spinner(format!("Writing a {} {} text about '{}'", request.length, request.difficulty, request.topic));
        let answer = tutor.generate(&request).await;
        spinner.finish_and_clear();
        let answer = answer.context("Failed to generate a text")?;

        let origin = SessionOrigin::Generated {
            topic: request.topic.trim().to_string(),
            difficulty: request.difficulty,
            length: request.length,
        };
        self.start_session(answer, origin)
    }

    /// Extract vocabulary from the learner's own text and record it as a session
    pub async fn analyze(&mut self, text: &str) -> Result<PracticeSession> {
        let tutor = self.tutor()?;
        let spinner = self.spinner("Analyzing text");
        let answer = tutor.analyze(text).await;
        spinner.finish_and_clear();
        let answer = answer.context("Failed to analyze the text")?;

        self.start_session(answer, SessionOrigin::Analyzed)
    }

    fn start_session(&mut self, answer: Metered<StudyText>, origin: SessionOrigin) -> Result<PracticeSession> {
        let session = PracticeSession::new(answer.value, answer.usage, origin);
        info!(
            "Session {} '{}' with {} vocabulary items ({})",
            session.short_id(),
            session.title,
            session.vocabulary.len(),
            session.usage
        );
        self.store.dispatch(Action::StartSession(session.clone()))?;
        Ok(session)
    }

    /// Switch the reading view to `session`, keeping it when already open
    fn open_reading(&mut self, session: &PracticeSession) -> Result<&mut ReadingView> {
        let current = self.reading.as_ref().is_some_and(|view| view.session_id == session.id);
        if !current {
            debug!("Opening session {} for reading", session.short_id());
            let tutor = self.lookup_tutor();
            let dispatcher = LookupDispatcher::new(
                session.vocabulary_index(),
                tutor,
                self.config.tutor.common.context_snippet_chars,
            )
            .with_cache(self.cache.clone());
            self.reading = Some(ReadingView {
                session_id: session.id.clone(),
                text: session.text.clone(),
                dispatcher,
                display: LookupDisplay::new(),
                selection: SelectionBridge::new(),
            });
        }
        self.reading
            .as_mut()
            .ok_or_else(|| anyhow!("No session open for reading"))
    }

    /// Look up a word, or a free-text selection of several words, in a session's text.
    ///
    /// A selection must occur in the text. Tokens spent are added to the session.
    pub async fn lookup(&mut self, session_id: &str, text: &str) -> Result<LookupResult> {
        let session = self.store.find_session(session_id)?.clone();
        let show_progress = self.show_progress;
        let view = self.open_reading(&session)?;

        let words = tokenize(text).iter().filter(|run| run.is_word()).count();
        let query = if words <= 1 {
            view.selection.on_token_lookup();
            text.to_string()
        } else {
            // Whole words only, punctuation ignored
            let within_text = format!(" {} ", lookup_key(&view.text)).contains(&format!(" {} ", lookup_key(text)));
            let snapshot = SelectionSnapshot {
                text: text.to_string(),
                rect: Rect::new(0.0, 0.0, text.chars().count() as f64, 1.0),
                within_text,
            };
            if view.selection.on_mouse_up(Some(snapshot)).is_none() {
                return Err(TutorError::InvalidInput(format!(
                    "'{}' does not occur in the session text",
                    text.trim()
                ))
                .into());
            }
            view.selection
                .activate()
                .map(|selection| selection.text)
                .ok_or_else(|| anyhow!("Selection was cleared before it could be looked up"))?
        };

        let spinner = spinner(show_progress, format!("Looking up '{}'", query.trim()));
        let result = view.dispatcher.lookup(&query, &view.text).await;
        spinner.finish_and_clear();

        view.display.offer(result.clone());
        debug!("Lookup #{} resolved from {:?}", result.ticket.value(), result.source);

        if !result.usage.is_empty() {
            self.store.dispatch(Action::RecordUsage {
                id: session.id.clone(),
                usage: result.usage,
            })?;
        }
        Ok(result)
    }

    /// The lookup result currently shown for the open session
    pub fn shown_lookup(&self) -> Option<&LookupResult> {
        self.reading.as_ref().and_then(|view| view.display.current())
    }

    /// Score a translation and finish the session with it
    pub async fn translate(&mut self, session_id: &str, translation: &str) -> Result<Evaluation> {
        let session = self.store.find_session(session_id)?.clone();
        let tutor = self.tutor()?;
        let spinner = self.spinner("Evaluating translation");
        let answer = tutor.evaluate_translation(&session.text, translation).await;
        spinner.finish_and_clear();
        let answer = answer.context("Failed to evaluate the translation")?;

        info!("Session {} scored {}/100 ({})", session.short_id(), answer.value.score, answer.usage);
        self.store.dispatch(Action::FinishSession {
            id: session.id,
            translation: translation.trim().to_string(),
            evaluation: answer.value.clone(),
            usage: answer.usage,
        })?;
        Ok(answer.value)
    }

    /// Delete a session, returning it
    pub fn delete_session(&mut self, session_id: &str) -> Result<PracticeSession> {
        let session = self.store.find_session(session_id)?.clone();
        if self.reading.as_ref().is_some_and(|view| view.session_id == session.id) {
            self.reading = None;
        }
        self.store.dispatch(Action::DeleteSession(session.id.clone()))?;
        Ok(session)
    }

    /// Save a word of a session to the deck, looking it up when the text's vocabulary lacks it
    pub async fn save_word(&mut self, session_id: &str, word: &str) -> Result<VocabularyItem> {
        let result = self.lookup(session_id, word).await?;
        if result.source == LookupSource::Fallback {
            return Err(anyhow!("No definition available for '{}'; not saved", word.trim()));
        }
        self.store.dispatch(Action::SaveWord(result.item.clone()))?;
        Ok(result.item)
    }

    /// Remove a word from the deck. Returns whether it was saved.
    pub fn unsave_word(&mut self, word: &str) -> Result<bool> {
        let was_saved = self.store.state().is_saved(word);
        self.store.dispatch(Action::UnsaveWord(word.to_string()))?;
        Ok(was_saved)
    }

    /// Cards for a review: a session's vocabulary or the saved words, filtered
    pub fn review_deck(&self, session_id: Option<&str>, filter: &WordFilter) -> Result<Vec<VocabularyItem>> {
        let deck = match session_id {
            Some(id) => filter.apply(&self.store.find_session(id)?.vocabulary),
            None => filter.apply(self.store.saved_words()),
        };
        Ok(deck)
    }
}
