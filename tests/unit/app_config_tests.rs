/*!
 * Tests for application configuration functionality
 */

use lingotutor::app_config::{Config, LogLevel, ProviderKind};
use lingotutor::errors::TutorError;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.native_language, "es");
    assert_eq!(config.tutor.provider, ProviderKind::Ollama);
    assert_eq!(config.tutor.common.retry_count, 3);
    assert_eq!(config.tutor.common.retry_delay_ms, 1000);
    assert_eq!(config.tutor.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.storage.database_path.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.native_language = "xx".to_string();
    assert!(config.validate().is_err());
    config.native_language = "fre".to_string();
    assert!(config.validate().is_ok());

    config.tutor.active_provider_config_mut().endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.tutor.active_provider_config_mut().endpoint = String::new();

    config.tutor.common.temperature = 3.5;
    assert!(config.validate().is_err());
}

/// Credentials are checked when the tutor is built, not at validation
#[test]
fn test_requireApiKey_forHostedProviders_shouldNeedKey() {
    let mut config = Config::default();
    config.tutor.provider = ProviderKind::Anthropic;
    assert!(config.validate().is_ok());
    assert!(matches!(config.tutor.require_api_key(), Err(TutorError::Configuration(_))));

    config.tutor.active_provider_config_mut().api_key = "sk-test".to_string();
    assert_eq!(config.tutor.require_api_key().unwrap(), "sk-test");

    config.tutor.provider = ProviderKind::LMStudio;
    assert!(config.tutor.require_api_key().is_ok());
}

#[test]
fn test_config_fromPartialJson_shouldFillDefaults() {
    let json = r#"{
        "native_language": "de",
        "tutor": { "provider": "openai", "available_providers": [
            { "type": "openai", "model": "gpt-4o", "api_key": "k" }
        ]}
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.tutor.provider, ProviderKind::OpenAI);
    assert_eq!(config.tutor.get_model(), "gpt-4o");
    assert_eq!(config.tutor.get_endpoint(), "https://api.openai.com/v1");
    assert_eq!(config.tutor.get_timeout_secs(), 60);
    assert_eq!(config.tutor.common.context_snippet_chars, 500);
    assert!(config.validate().is_ok());
}
