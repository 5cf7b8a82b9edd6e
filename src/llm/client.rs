//! Async chat-completion client used as the live decision backend
//!
//! Model-agnostic HTTP client. Anthropic endpoints are detected from the
//! URL; everything else is treated as OpenAI-compatible. One request per
//! call and no retries: a failed call is a failed decision.

use crate::core::config::LlmConfig;
use crate::core::error::{Result, SimError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

/// Async LLM client for making API calls
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    max_tokens: u32,
    api_format: ApiFormat,
}

impl LlmClient {
    pub fn new(api_key: String, settings: &LlmConfig) -> Self {
        let api_format = Self::detect_api_format(&settings.api_url);
        Self {
            client: Client::new(),
            api_key,
            api_url: settings.api_url.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            api_format,
        }
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }

    /// Create a client from environment variables, falling back to `settings`
    ///
    /// Required: LLM_API_KEY
    /// Optional: LLM_API_URL, LLM_MODEL (override the configured values)
    pub fn from_env(settings: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| SimError::Llm("LLM_API_KEY not set".into()))?;

        let mut settings = settings.clone();
        if let Ok(url) = std::env::var("LLM_API_URL") {
            settings.api_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            settings.model = model;
        }

        Ok(Self::new(api_key, &settings))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a completion request and return the text of the first choice
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(system, user).await,
            ApiFormat::OpenAI => self.complete_openai(system, user).await,
        }
    }

    async fn complete_anthropic(&self, system: &str, user: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: system.into(),
            messages: vec![Message {
                role: "user".into(),
                content: user.into(),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SimError::Llm(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(api_error(status, &error_text));
        }

        let completion: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| SimError::Llm(e.to_string()))?;

        completion
            .content
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| SimError::Llm("Empty response".into()))
    }

    async fn complete_openai(&self, system: &str, user: &str) -> Result<String> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![
                Message {
                    role: "system".into(),
                    content: system.into(),
                },
                Message {
                    role: "user".into(),
                    content: user.into(),
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SimError::Llm(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(api_error(status, &error_text));
        }

        let completion: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| SimError::Llm(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SimError::Llm("Empty response".into()))
    }
}

/// Longest error body kept in an API error message
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Error for a non-success status, with the body flattened onto one line
fn api_error(status: reqwest::StatusCode, body: &str) -> SimError {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    let body = match flat.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    };
    SimError::Llm(format!("API error ({}): {}", status, body))
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

// OpenAI-compatible API format
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    // null when the model refuses or only emits tool calls
    content: Option<String>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let settings = LlmConfig {
            api_url: "https://api.example.com/v1/chat/completions".into(),
            model: "test-model".into(),
            max_tokens: 64,
        };
        let client = LlmClient::new("test-key".into(), &settings);
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.model(), "test-model");
        assert_eq!(client.api_format, ApiFormat::OpenAI);
    }

    #[test]
    fn test_detects_anthropic_format() {
        assert_eq!(
            LlmClient::detect_api_format("https://api.anthropic.com/v1/messages"),
            ApiFormat::Anthropic
        );
        assert_eq!(
            LlmClient::detect_api_format("http://localhost:8000/v1/chat/completions"),
            ApiFormat::OpenAI
        );
    }

    #[test]
    fn test_api_error_flattens_body() {
        let body = "{\n  \"error\": {\n    \"message\": \"Incorrect API key\"\n  }\n}";
        let err = api_error(reqwest::StatusCode::UNAUTHORIZED, body);
        assert_eq!(
            err.to_string(),
            "LLM error: API error (401 Unauthorized): { \"error\": { \"message\": \"Incorrect API key\" } }"
        );
    }

    #[test]
    fn test_api_error_truncates_long_body() {
        let body = "x".repeat(MAX_ERROR_BODY_CHARS * 2);
        let msg = api_error(reqwest::StatusCode::BAD_GATEWAY, &body).to_string();
        assert!(msg.ends_with("..."));
        assert!(msg.len() < MAX_ERROR_BODY_CHARS + 60);
    }

    #[test]
    fn test_openai_null_content_parses() {
        let parsed: OpenAIResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#)
                .expect("null content is valid");
        assert!(parsed.choices[0].message.content.is_none());
    }
}
