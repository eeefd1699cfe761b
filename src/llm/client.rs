//! Async inference client
//!
//! A model-agnostic HTTP client for calling text-completion APIs.
//! Supports both Anthropic and OpenAI-compatible endpoints. The client is
//! pure transport: it never interprets the text it returns, performs no
//! retries, and bounds every request with a deadline and a stop sequence.

use crate::core::config::InferenceConfig;
use crate::core::error::{CommandError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAi,
}

/// The completion seam the rest of the pipeline depends on
///
/// Production code uses `InferenceClient`; tests drive the parser and
/// orchestrator with canned implementations instead of a live service.
#[async_trait]
pub trait Inference: Send + Sync {
    /// Send one completion request and return the raw response text
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Async inference client for making API calls
pub struct InferenceClient {
    client: Client,
    api_key: String,
    api_url: String,
    config: InferenceConfig,
    api_format: ApiFormat,
}

impl InferenceClient {
    /// Create a new client with explicit configuration
    pub fn new(api_key: String, api_url: String, config: InferenceConfig) -> Self {
        let api_format = Self::detect_api_format(&api_url);
        Self {
            client: Client::new(),
            api_key,
            api_url,
            config,
            api_format,
        }
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            // DeepSeek, OpenAI, and other compatible APIs use OpenAI format
            ApiFormat::OpenAi
        }
    }

    /// Create a client from environment variables
    ///
    /// Required: LLM_API_KEY
    /// Optional: LLM_API_URL (defaults to Anthropic API)
    /// Optional: LLM_MODEL (defaults to the config's model)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| CommandError::InferenceUnavailable("LLM_API_KEY not set".into()))?;
        let api_url = std::env::var("LLM_API_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com/v1/messages".into());
        let mut config = InferenceConfig::default();
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.model = model;
        }

        Ok(Self::new(api_key, api_url, config))
    }

    fn map_transport_error(e: reqwest::Error) -> CommandError {
        if e.is_timeout() {
            CommandError::InferenceTimeout
        } else {
            CommandError::InferenceUnavailable(e.to_string())
        }
    }

    async fn complete_anthropic(&self, system: &str, user: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_output_tokens,
            temperature: self.config.temperature,
            stop_sequences: self.config.stop_sequences.clone(),
            system: system.into(),
            messages: vec![Message {
                role: "user".into(),
                content: user.into(),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .timeout(self.config.request_timeout)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CommandError::InferenceUnavailable(format!(
                "API error: {}",
                error_text
            )));
        }

        let completion: AnthropicResponse = response
            .json()
            .await
            .map_err(Self::map_transport_error)?;

        completion
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| CommandError::InferenceUnavailable("Empty response".into()))
    }

    async fn complete_openai(&self, system: &str, user: &str) -> Result<String> {
        let request = OpenAiRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_output_tokens,
            temperature: self.config.temperature,
            stop: self.config.stop_sequences.clone(),
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
            .timeout(self.config.request_timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CommandError::InferenceUnavailable(format!(
                "API error: {}",
                error_text
            )));
        }

        let completion: OpenAiResponse = response
            .json()
            .await
            .map_err(Self::map_transport_error)?;

        completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| CommandError::InferenceUnavailable("Empty response".into()))
    }
}

#[async_trait]
impl Inference for InferenceClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(system, user).await,
            ApiFormat::OpenAi => self.complete_openai(system, user).await,
        }
    }
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    stop_sequences: Vec<String>,
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

// OpenAI-compatible API format (DeepSeek, OpenAI, etc.)
#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    stop: Vec<String>,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

// Shared
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
        let client = InferenceClient::new(
            "test-key".into(),
            "https://api.example.com".into(),
            InferenceConfig::default(),
        );
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.api_url, "https://api.example.com");
        assert_eq!(client.api_format, ApiFormat::OpenAi);
    }

    #[test]
    fn test_detect_api_format() {
        assert_eq!(
            InferenceClient::detect_api_format("https://api.anthropic.com/v1/messages"),
            ApiFormat::Anthropic
        );
        assert_eq!(
            InferenceClient::detect_api_format("https://api.deepseek.com/chat/completions"),
            ApiFormat::OpenAi
        );
    }

    #[test]
    fn test_from_env_missing_key() {
        // Temporarily clear the env var if set
        let result = InferenceClient::from_env();
        // Should fail if LLM_API_KEY is not set
        if std::env::var("LLM_API_KEY").is_err() {
            assert!(result.is_err());
        }
    }
}
