use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{CompletionRequest, CompletionResponse, Provider, error_body, http_client};
use crate::errors::ProviderError;
use crate::tutor::TokenUsage;

/// Client for the OpenAI chat completions API and compatible servers
#[derive(Debug)]
pub struct OpenAI {
    client: Client,
    api_key: String,
    /// Base URL including the version segment, e.g. `https://api.openai.com/v1`
    endpoint: String,
    /// Whether to send `response_format: json_object`
    json_mode: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenAIMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Chat completions request body
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenAIUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIMessage,
}

/// Chat completions response body
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    pub choices: Vec<OpenAIChoice>,
    #[serde(default)]
    pub usage: OpenAIUsage,
}

impl OpenAIRequest {
    fn from_completion(request: &CompletionRequest, json_mode: bool) -> Self {
        Self {
            model: request.model.clone(),
            messages: vec![
                OpenAIMessage { role: "system".to_string(), content: request.system.clone() },
                OpenAIMessage { role: "user".to_string(), content: request.prompt.clone() },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: (json_mode && request.json_output)
                .then_some(ResponseFormat { format_type: "json_object" }),
        }
    }
}

impl OpenAI {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            api_key: api_key.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            json_mode: true,
        }
    }

    /// Never ask for `response_format`; some local servers reject it
    pub fn without_json_mode(mut self) -> Self {
        self.json_mode = false;
        self
    }

    /// Send a chat completions request
    pub async fn chat(&self, request: &OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.endpoint);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = error_body(response).await;
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        response
            .json::<OpenAIResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("OpenAI response: {}", e)))
    }
}

#[async_trait]
impl Provider for OpenAI {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let response = self
            .chat(&OpenAIRequest::from_completion(&request, self.json_mode))
            .await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::ParseError("OpenAI response has no choices".to_string()))?;

        Ok(CompletionResponse {
            text,
            usage: TokenUsage::new(response.usage.prompt_tokens, response.usage.completion_tokens),
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/models", self.endpoint);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
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
        "OpenAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openAIRequest_withJsonMode_shouldSetResponseFormat() {
        let request = CompletionRequest::new("gpt-4o-mini", "sys", "hi");
        let body = serde_json::to_value(OpenAIRequest::from_completion(&request, true)).unwrap();

        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_openAIRequest_withoutJsonMode_shouldOmitResponseFormat() {
        let request = CompletionRequest::new("local-model", "sys", "hi");
        let body = serde_json::to_value(OpenAIRequest::from_completion(&request, false)).unwrap();
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_openAIResponse_shouldParseUsage() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "{}"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 20, "completion_tokens": 8, "total_tokens": 28}
        }"#;
        let response: OpenAIResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "{}");
        assert_eq!(response.usage.completion_tokens, 8);
    }
}
