use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{CompletionRequest, CompletionResponse, Provider, error_body, http_client};
use crate::errors::ProviderError;
use crate::tutor::TokenUsage;

/// Anthropic client for interacting with Anthropic API
#[derive(Debug)]
pub struct Anthropic {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
}

/// Anthropic message request
#[derive(Debug, Serialize)]
pub struct AnthropicRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<AnthropicMessage>,

    /// System prompt to guide the AI
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    max_tokens: u32,
}

/// Anthropic message format
#[derive(Debug, Serialize, Deserialize)]
pub struct AnthropicMessage {
    /// Role of the message sender (user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Token usage information
#[derive(Debug, Default, Deserialize)]
pub struct AnthropicUsage {
    /// Number of input tokens
    #[serde(default)]
    pub input_tokens: u64,
    /// Number of output tokens
    #[serde(default)]
    pub output_tokens: u64,
}

/// Anthropic response
#[derive(Debug, Deserialize)]
pub struct AnthropicResponse {
    /// The content of the response
    pub content: Vec<AnthropicContent>,
    /// Token usage information
    #[serde(default)]
    pub usage: AnthropicUsage,
}

/// Individual content block in an Anthropic response
#[derive(Debug, Deserialize)]
pub struct AnthropicContent {
    /// The type of content
    #[serde(rename = "type")]
    pub content_type: String,

    /// The actual text content
    #[serde(default)]
    pub text: String,
}

impl AnthropicRequest {
    /// Create a new Anthropic request
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            system: None,
            temperature: None,
            max_tokens,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(AnthropicMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl From<&CompletionRequest> for AnthropicRequest {
    fn from(request: &CompletionRequest) -> Self {
        // Anthropic has no JSON mode; the prompts ask for bare JSON instead
        AnthropicRequest::new(&request.model, request.max_tokens)
            .system(&request.system)
            .temperature(request.temperature)
            .add_message("user", &request.prompt)
    }
}

impl AnthropicResponse {
    /// Concatenated text blocks of the response
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text.as_str())
            .collect()
    }
}

impl Anthropic {
    /// Create a new Anthropic client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn messages_url(&self) -> String {
        if self.endpoint.is_empty() {
            "https://api.anthropic.com/v1/messages".to_string()
        } else {
            format!("{}/v1/messages", self.endpoint.trim_end_matches('/'))
        }
    }

    /// Send a messages request
    pub async fn send(&self, request: &AnthropicRequest) -> Result<AnthropicResponse, ProviderError> {
        let response = self
            .client
            .post(self.messages_url())
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(request)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = error_body(response).await;
            error!("Anthropic API error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        response
            .json::<AnthropicResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Anthropic response: {}", e)))
    }
}

#[async_trait]
impl Provider for Anthropic {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let response = self.send(&AnthropicRequest::from(&request)).await?;
        Ok(CompletionResponse {
            text: response.text(),
            usage: TokenUsage::new(response.usage.input_tokens, response.usage.output_tokens),
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = self.messages_url().replace("/v1/messages", "/v1/models");
        let response = self
            .client
            .get(url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ProviderError::from_status(status.as_u16(), error_body(response).await))
        }
    }

    fn name(&self) -> &'static str {
        "Anthropic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anthropicRequest_fromCompletion_shouldCarrySystemAndPrompt() {
        let request = CompletionRequest::new("claude", "be a tutor", "define cat").max_tokens(64);
        let body = serde_json::to_value(AnthropicRequest::from(&request)).unwrap();

        assert_eq!(body["model"], "claude");
        assert_eq!(body["system"], "be a tutor");
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "define cat");
    }

    #[test]
    fn test_anthropicResponse_text_shouldJoinTextBlocks() {
        let json = r#"{
            "content": [
                {"type": "text", "text": "{\"a\":"},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "1}"}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 3}
        }"#;
        let response: AnthropicResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), "{\"a\":1}");
        assert_eq!(response.usage.input_tokens, 12);
    }

    #[test]
    fn test_messagesUrl_shouldTrimTrailingSlash() {
        let client = Anthropic::new("key", "https://proxy.example/", Duration::from_secs(1));
        assert_eq!(client.messages_url(), "https://proxy.example/v1/messages");
    }
}
