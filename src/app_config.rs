use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;
use url::Url;

use crate::errors::TutorError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Learner's native language (ISO code); definitions and translations use it
    pub native_language: String,

    /// Tutor (LLM) config
    pub tutor: TutorConfig,

    /// Where sessions and saved words are kept
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// LLM provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    // @provider: Ollama
    #[default]
    Ollama,
    // @provider: OpenAI
    OpenAI,
    // @provider: Anthropic
    Anthropic,
    // @provider: LM Studio (OpenAI-compatible local server)
    LMStudio,
}

impl ProviderKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::LMStudio => "LM Studio",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Ollama => "ollama".to_string(),
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::LMStudio => "lmstudio".to_string(),
        }
    }

    /// Whether the provider refuses requests without an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI | Self::Anthropic)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "lmstudio" => Ok(Self::LMStudio),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_kind: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_kind: ProviderKind) -> Self {
        Self {
            provider_type: provider_kind.to_lowercase_string(),
            model: default_model(provider_kind),
            api_key: String::new(),
            endpoint: default_endpoint(provider_kind),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Tutor service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TutorConfig {
    /// Provider to use
    #[serde(default)]
    pub provider: ProviderKind,

    /// Available providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Settings shared by all providers
    #[serde(default)]
    pub common: TutorCommonConfig,
}

/// Settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TutorCommonConfig {
    /// Retries after the first attempt for transient failures
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum number of tokens the model may answer with
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Characters of the full text sent along with a word lookup
    #[serde(default = "default_context_snippet_chars")]
    pub context_snippet_chars: usize,
}

impl Default for TutorCommonConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            context_snippet_chars: default_context_snippet_chars(),
        }
    }
}

/// Persistence settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// SQLite database file; the platform data directory when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000 // same delay before every retry
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_context_snippet_chars() -> usize {
    500
}

fn default_endpoint(kind: ProviderKind) -> String {
    match kind {
        ProviderKind::Ollama => "http://localhost:11434".to_string(),
        ProviderKind::OpenAI => "https://api.openai.com/v1".to_string(),
        ProviderKind::Anthropic => "https://api.anthropic.com".to_string(),
        // LM Studio default server (OpenAI compatible) runs on port 1234 under /v1
        ProviderKind::LMStudio => "http://localhost:1234/v1".to_string(),
    }
}

fn default_model(kind: ProviderKind) -> String {
    match kind {
        ProviderKind::Ollama => "llama3.1".to_string(),
        ProviderKind::OpenAI => "gpt-4o-mini".to_string(),
        ProviderKind::Anthropic => "claude-3-5-haiku-latest".to_string(),
        // Placeholder; users should set to the loaded model name in LM Studio
        ProviderKind::LMStudio => "local-model".to_string(),
    }
}

impl Config {
    /// Validate the configuration for consistency and required values.
    ///
    /// Credentials are not checked here: commands that never reach the
    /// provider (history, saved words, review) must keep working without one.
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::get_language_name(&self.native_language)?;

        for provider in &self.tutor.available_providers {
            provider.provider_type.parse::<ProviderKind>()?;
            if !provider.endpoint.is_empty() {
                Url::parse(&provider.endpoint)
                    .map_err(|e| anyhow!("Invalid endpoint '{}': {}", provider.endpoint, e))?;
            }
        }

        if !(0.0..=2.0).contains(&self.tutor.common.temperature) {
            return Err(anyhow!("Temperature must be between 0.0 and 2.0"));
        }

        if self.tutor.common.context_snippet_chars == 0 {
            return Err(anyhow!("context_snippet_chars must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            native_language: "es".to_string(),
            tutor: TutorConfig::default(),
            storage: StorageConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TutorConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a mutable handle on the active provider configuration, creating it if missing
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let position = self
            .available_providers
            .iter()
            .position(|p| p.provider_type == provider_str);

        let index = match position {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_kind: &ProviderKind) -> Option<&ProviderConfig> {
        let provider_str = provider_kind.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.model.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| default_model(self.provider))
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.endpoint.clone())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| default_endpoint(self.provider))
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|t| *t > 0)
            .unwrap_or_else(default_timeout_secs)
    }

    /// API key for the active provider, or a configuration error when one is required
    pub fn require_api_key(&self) -> Result<String, TutorError> {
        let api_key = self.get_api_key();
        if api_key.trim().is_empty() && self.provider.requires_api_key() {
            return Err(TutorError::Configuration(format!(
                "An API key is required for the {} provider (set it in the config file, \
                 pass --api-key or set LINGOTUTOR_API_KEY)",
                self.provider.display_name()
            )));
        }
        Ok(api_key)
    }
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            available_providers: vec![
                ProviderConfig::new(ProviderKind::Ollama),
                ProviderConfig::new(ProviderKind::OpenAI),
                ProviderConfig::new(ProviderKind::Anthropic),
                ProviderConfig::new(ProviderKind::LMStudio),
            ],
            common: TutorCommonConfig::default(),
        }
    }
}
