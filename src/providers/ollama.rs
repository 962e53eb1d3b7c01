use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{CompletionRequest, CompletionResponse, Provider, error_body, http_client};
use crate::errors::ProviderError;
use crate::tutor::TokenUsage;

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant, or tool)
    pub role: String,
    /// Content of the message
    pub content: String,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Chat request for the Ollama API
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// Model name to use for generation
    model: String,
    /// Messages of the conversation
    messages: Vec<ChatMessage>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Format to return a response in
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    /// Whether to stream the response
    stream: bool,
}

/// Chat response from the Ollama API
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Response message
    pub message: ChatMessage,
    /// Number of prompt tokens
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(default)]
    pub eval_count: Option<u64>,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: None,
            format: None,
            stream: false,
        }
    }

    /// Set the temperature and the token limit
    pub fn options(mut self, temperature: f32, num_predict: u32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
            num_predict: Some(num_predict),
        });
        self
    }

    /// Set the format
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

impl From<&CompletionRequest> for ChatRequest {
    fn from(request: &CompletionRequest) -> Self {
        let messages = vec![
            ChatMessage { role: "system".to_string(), content: request.system.clone() },
            ChatMessage { role: "user".to_string(), content: request.prompt.clone() },
        ];
        let chat = ChatRequest::new(&request.model, messages)
            .options(request.temperature, request.max_tokens);
        if request.json_output { chat.format("json") } else { chat }
    }
}

impl Ollama {
    /// Create a new Ollama client from a complete URL
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: http_client(timeout),
        }
    }

    /// Chat with the Ollama API
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = error_body(response).await;
            error!("Ollama API error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let response_text = response.text().await.map_err(ProviderError::from_transport)?;
        parse_chat_response(&response_text)
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProviderError::from_transport)?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Ollama version response: {}", e)))?;

        response["version"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }
}

/// Parse a chat body, accepting a streamed JSONL body as a fallback
fn parse_chat_response(body: &str) -> Result<ChatResponse, ProviderError> {
    match serde_json::from_str::<ChatResponse>(body) {
        Ok(chat_response) => Ok(chat_response),
        Err(e) => {
            let preview: String = body.chars().take(500).collect();
            error!("Failed to parse Ollama API chat response: {}. Raw response (first 500 chars): {}", e, preview);

            // A server ignoring `stream: false` answers with one object per line
            let chunks: Vec<serde_json::Value> = body
                .lines()
                .filter(|line| !line.trim().is_empty())
                .filter_map(|line| serde_json::from_str(line).ok())
                .collect();

            let last = chunks
                .last()
                .ok_or_else(|| ProviderError::ParseError(format!("Ollama chat response: {}", e)))?;

            let content: String = chunks
                .iter()
                .filter_map(|chunk| chunk["message"]["content"].as_str())
                .collect();

            Ok(ChatResponse {
                message: ChatMessage { role: "assistant".to_string(), content },
                prompt_eval_count: last["prompt_eval_count"].as_u64(),
                eval_count: last["eval_count"].as_u64(),
            })
        }
    }
}

#[async_trait]
impl Provider for Ollama {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let response = self.chat(&ChatRequest::from(&request)).await?;
        Ok(CompletionResponse {
            text: response.message.content,
            usage: TokenUsage::new(
                response.prompt_eval_count.unwrap_or(0),
                response.eval_count.unwrap_or(0),
            ),
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.version().await.map(|_| ())
    }

    fn name(&self) -> &'static str {
        "Ollama"
    }
}
