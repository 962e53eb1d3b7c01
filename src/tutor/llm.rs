/*!
 * `TutorService` over any LLM `Provider`.
 */

use async_trait::async_trait;
use log::{debug, info};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::models::{Evaluation, GenerateRequest, Metered, StudyText};
use super::parse::{
    AnalysisPayload, DifficultWord, EvaluationPayload, GeneratedPayload, clamp_score, parse_answer,
};
use super::{TutorService, prompts};
use crate::app_config::Config;
use crate::errors::TutorError;
use crate::language_utils;
use crate::providers::{self, CompletionRequest, Provider, RetryPolicy};
use crate::vocabulary::VocabularyItem;

/// Model settings applied to every request
#[derive(Debug, Clone)]
pub struct TutorSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// English name of the learner's native language, e.g. "Spanish"
    pub native_language: String,
}

impl Default for TutorSettings {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.7,
            max_tokens: 2048,
            native_language: "Spanish".to_string(),
        }
    }
}

/// Tutor backed by an LLM provider, with bounded retries
#[derive(Debug, Clone)]
pub struct LlmTutor {
    provider: Arc<dyn Provider>,
    retry: RetryPolicy,
    settings: TutorSettings,
}

impl LlmTutor {
    pub fn new(provider: Arc<dyn Provider>, retry: RetryPolicy, settings: TutorSettings) -> Self {
        Self { provider, retry, settings }
    }

    /// Build the tutor selected in the configuration.
    ///
    /// Fails with `TutorError::Configuration` on a missing credential or an
    /// unknown native language, before any request is made.
    pub fn from_config(config: &Config) -> Result<Self, TutorError> {
        let native_language = language_utils::get_language_name(&config.native_language)
            .map_err(|e| TutorError::Configuration(e.to_string()))?;
        let provider = providers::create_provider(&config.tutor)?;
        let common = &config.tutor.common;

        info!(
            "Using {} with model {}",
            config.tutor.provider.display_name(),
            config.tutor.get_model()
        );

        Ok(Self::new(
            provider,
            RetryPolicy::new(common.retry_count, common.retry_delay_ms),
            TutorSettings {
                model: config.tutor.get_model(),
                temperature: common.temperature,
                max_tokens: common.max_tokens,
                native_language,
            },
        ))
    }

    pub fn settings(&self) -> &TutorSettings {
        &self.settings
    }

    /// Send one prompt through the retry policy and parse the JSON answer
    async fn ask<T: DeserializeOwned + Send>(&self, operation: &str, prompt: String) -> Result<Metered<T>, TutorError> {
        let request = CompletionRequest::new(
            &self.settings.model,
            prompts::system_prompt(&self.settings.native_language),
            prompt,
        )
        .temperature(self.settings.temperature)
        .max_tokens(self.settings.max_tokens);

        let label = format!("{} {}", self.provider.name(), operation);
        let response = self
            .retry
            .run(&label, || self.provider.complete(request.clone()))
            .await?;

        debug!("{} answered with {}", label, response.usage);
        let value = parse_answer(&response.text)?;
        Ok(Metered::new(value, response.usage))
    }
}

/// Drop entries without a word; the model sometimes pads the list
fn clean_vocabulary(vocabulary: Vec<VocabularyItem>) -> Vec<VocabularyItem> {
    vocabulary
        .into_iter()
        .filter(|item| !item.word.trim().is_empty())
        .map(|mut item| {
            item.word = item.word.trim().to_string();
            item
        })
        .collect()
}

#[async_trait]
impl TutorService for LlmTutor {
    async fn generate(&self, request: &GenerateRequest) -> Result<Metered<StudyText>, TutorError> {
        if request.topic.trim().is_empty() {
            return Err(TutorError::InvalidInput("topic must not be empty".to_string()));
        }

        let answer: Metered<GeneratedPayload> = self.ask("generate", prompts::generate_prompt(request)).await?;
        if answer.value.text.trim().is_empty() {
            return Err(TutorError::MalformedResponse("generated text is empty".to_string()));
        }

        Ok(answer.map(|payload| StudyText {
            title: payload.title.trim().to_string(),
            text: payload.text,
            vocabulary: clean_vocabulary(payload.vocabulary),
        }))
    }

    async fn analyze(&self, text: &str) -> Result<Metered<StudyText>, TutorError> {
        if text.trim().is_empty() {
            return Err(TutorError::InvalidInput("text to analyze must not be empty".to_string()));
        }

        let answer: Metered<AnalysisPayload> = self.ask("analyze", prompts::analyze_prompt(text)).await?;
        Ok(answer.map(|payload| StudyText {
            title: payload.title.trim().to_string(),
            text: text.to_string(),
            vocabulary: clean_vocabulary(payload.vocabulary),
        }))
    }

    async fn lookup_word(
        &self,
        word: &str,
        context_snippet: &str,
    ) -> Result<Metered<VocabularyItem>, TutorError> {
        let answer: Metered<VocabularyItem> =
            self.ask("lookup", prompts::lookup_prompt(word, context_snippet)).await?;
        Ok(answer.map(|mut item| {
            item.word = word.to_string();
            item
        }))
    }

    async fn evaluate_translation(
        &self,
        original: &str,
        translation: &str,
    ) -> Result<Metered<Evaluation>, TutorError> {
        if translation.trim().is_empty() {
            return Err(TutorError::InvalidInput("translation must not be empty".to_string()));
        }

        let prompt = prompts::evaluate_prompt(original, translation, &self.settings.native_language);
        let answer: Metered<EvaluationPayload> = self.ask("evaluate", prompt).await?;
        Ok(answer.map(|payload| Evaluation {
            score: clamp_score(payload.score),
            feedback: payload.feedback,
            corrected_translation: payload.corrected_translation,
            key_improvements: payload.key_improvements,
            difficult_words: payload
                .difficult_words
                .into_iter()
                .map(DifficultWord::into_word)
                .collect(),
        }))
    }

    async fn check_connection(&self) -> Result<(), TutorError> {
        debug!("Checking connection to {}", self.provider.name());
        self.provider.test_connection().await.map_err(TutorError::from)
    }
}
