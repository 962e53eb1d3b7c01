/*!
 * Provider implementations for the LLM backends the tutor can talk to.
 *
 * This module contains client implementations for various LLM providers:
 * - Ollama: Local LLM server
 * - OpenAI: OpenAI API integration (also used for LM Studio)
 * - Anthropic: Anthropic API integration
 * - Mock: scripted provider for tests
 *
 * Every client performs exactly one HTTP exchange per `complete` call and
 * classifies failures into `ProviderError`; retrying is the job of
 * `retry::RetryPolicy`.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{ProviderKind, TutorConfig};
use crate::errors::{ProviderError, TutorError};
use crate::tutor::TokenUsage;

pub mod anthropic;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod retry;

pub use retry::RetryPolicy;

/// A provider-neutral completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// The model to use
    pub model: String,
    /// System prompt to guide the model
    pub system: String,
    /// The user message
    pub prompt: String,
    pub temperature: f32,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
    /// Ask the backend for JSON output where it supports a JSON mode
    pub json_output: bool,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            prompt: prompt.into(),
            temperature: 0.7,
            max_tokens: 2048,
            json_output: true,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// The text a provider answered with and the tokens it billed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    pub text: String,
    pub usage: TokenUsage,
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the tutor.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a request using this provider (a single attempt)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Human-readable provider name for logs
    fn name(&self) -> &'static str;
}

/// Build the HTTP client shared by the provider implementations
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Read an error body for logging, never failing
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string())
}

/// Create the provider selected in the configuration.
///
/// Fails with `TutorError::Configuration` when the provider needs an API key
/// and none is configured.
pub fn create_provider(config: &TutorConfig) -> Result<Arc<dyn Provider>, TutorError> {
    let api_key = config.require_api_key()?;
    let endpoint = config.get_endpoint();
    let timeout = Duration::from_secs(config.get_timeout_secs());

    let provider: Arc<dyn Provider> = match config.provider {
        ProviderKind::Ollama => Arc::new(ollama::Ollama::new(endpoint, timeout)),
        ProviderKind::OpenAI => Arc::new(openai::OpenAI::new(api_key, endpoint, timeout)),
        ProviderKind::LMStudio => {
            // LM Studio often doesn't require an API key; use a default if empty
            let api_key = if api_key.is_empty() { "lm-studio".to_string() } else { api_key };
            Arc::new(openai::OpenAI::new(api_key, endpoint, timeout).without_json_mode())
        }
        ProviderKind::Anthropic => Arc::new(anthropic::Anthropic::new(api_key, endpoint, timeout)),
    };

    Ok(provider)
}
