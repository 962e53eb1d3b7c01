/*!
 * Scripted tutor for testing
 *
 * Implements `TutorService` without any provider: answers come from canned
 * values set up by the test, and every call is counted.
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lingotutor::errors::{ProviderError, TutorError};
use lingotutor::tutor::{Evaluation, GenerateRequest, Metered, StudyText, TokenUsage, TutorService};
use lingotutor::vocabulary::{VocabularyItem, normalize_key};

/// Usage reported for every scripted answer
pub const SCRIPTED_USAGE: TokenUsage = TokenUsage {
    prompt_tokens: 20,
    response_tokens: 10,
    total_tokens: 30,
};

/// Calls received by the tutor
#[derive(Debug, Default)]
pub struct CallTracker {
    pub generate_calls: usize,
    pub analyze_calls: usize,
    pub lookups: Vec<(String, String)>,
    pub evaluations: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedTutor {
    study: Option<StudyText>,
    definitions: HashMap<String, VocabularyItem>,
    delays_ms: HashMap<String, u64>,
    evaluation: Option<Evaluation>,
    fail_lookups: bool,
    tracker: Arc<Mutex<CallTracker>>,
}

impl ScriptedTutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer generate and analyze with this text
    pub fn with_study(mut self, study: StudyText) -> Self {
        self.study = Some(study);
        self
    }

    /// Answer lookups of `item.word` with `item`
    pub fn with_definition(mut self, item: VocabularyItem) -> Self {
        self.definitions.insert(normalize_key(&item.word), item);
        self
    }

    /// Delay the lookup of `word` before answering
    pub fn with_delay(mut self, word: &str, delay_ms: u64) -> Self {
        self.delays_ms.insert(normalize_key(word), delay_ms);
        self
    }

    pub fn with_evaluation(mut self, evaluation: Evaluation) -> Self {
        self.evaluation = Some(evaluation);
        self
    }

    /// Every lookup fails as a network error would
    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    pub fn tracker(&self) -> Arc<Mutex<CallTracker>> {
        self.tracker.clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.tracker.lock().unwrap().lookups.len()
    }

    fn scripted_study(&self) -> Result<StudyText, TutorError> {
        self.study
            .clone()
            .ok_or_else(|| TutorError::MalformedResponse("no study text scripted".to_string()))
    }
}

#[async_trait]
impl TutorService for ScriptedTutor {
    async fn generate(&self, _request: &GenerateRequest) -> Result<Metered<StudyText>, TutorError> {
        self.tracker.lock().unwrap().generate_calls += 1;
        Ok(Metered::new(self.scripted_study()?, SCRIPTED_USAGE))
    }

    async fn analyze(&self, text: &str) -> Result<Metered<StudyText>, TutorError> {
        self.tracker.lock().unwrap().analyze_calls += 1;
        let mut study = self.scripted_study()?;
        study.text = text.to_string();
        Ok(Metered::new(study, SCRIPTED_USAGE))
    }

    async fn lookup_word(&self, word: &str, context_snippet: &str) -> Result<Metered<VocabularyItem>, TutorError> {
        self.tracker
            .lock()
            .unwrap()
            .lookups
            .push((word.to_string(), context_snippet.to_string()));

        let key = normalize_key(word);
        if let Some(delay) = self.delays_ms.get(&key) {
            tokio::time::sleep(Duration::from_millis(*delay)).await;
        }
        if self.fail_lookups {
            return Err(ProviderError::ConnectionError("connection refused".to_string()).into());
        }

        let item = self
            .definitions
            .get(&key)
            .cloned()
            .unwrap_or_else(|| VocabularyItem::new(word, format!("meaning of {}", word), format!("{}-es", word)));
        Ok(Metered::new(item, SCRIPTED_USAGE))
    }

    async fn evaluate_translation(&self, _original: &str, _translation: &str) -> Result<Metered<Evaluation>, TutorError> {
        self.tracker.lock().unwrap().evaluations += 1;
        let evaluation = self
            .evaluation
            .clone()
            .ok_or_else(|| TutorError::MalformedResponse("no evaluation scripted".to_string()))?;
        Ok(Metered::new(evaluation, SCRIPTED_USAGE))
    }

    async fn check_connection(&self) -> Result<(), TutorError> {
        Ok(())
    }
}
