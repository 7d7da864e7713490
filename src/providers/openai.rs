use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// OpenAI client for chat-completions based translation.
///
/// Any OpenAI-compatible endpoint works; the base URL comes from config.
#[derive(Debug)]
pub struct OpenAI {
    /// Base URL of the API (without the `/chat/completions` suffix)
    endpoint: String,
    /// API key sent as a bearer token
    api_key: String,
    /// Model name
    model: String,
    /// HTTP client for making requests
    client: Client,
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatRequest {
    /// Model name to use for generation
    model: String,
    /// Messages of the conversation
    messages: Vec<ChatMessage>,
    /// Maximum number of tokens to generate
    max_tokens: u32,
    /// Temperature for generation
    temperature: f32,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    /// Role of the message sender (system, user or assistant)
    role: String,
    /// Content of the message
    content: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    /// Completion choices
    choices: Vec<ChatChoice>,
}

/// One completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    /// The generated message
    message: ChatMessage,
}

impl OpenAI {
    /// Create a new client
    pub fn new(endpoint: &str, api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(OpenAI {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        })
    }

    /// Build the translation prompt for one batch
    fn build_prompt(chunk_text: &str, target_language: &str) -> String {
        format!(
            "Translate the following movie subtitles to {} in a human-readable way, \
             understanding the movie context. Return exactly one translated line per \
             input line, in the same order, and nothing else:\n{}\n",
            target_language, chunk_text
        )
    }

    /// Map an HTTP error status to a provider error
    fn classify_status(status: reqwest::StatusCode, message: String) -> ProviderError {
        match status.as_u16() {
            401 | 403 => ProviderError::AuthenticationError(message),
            429 => ProviderError::RateLimitExceeded(message),
            code => ProviderError::ApiError {
                status_code: code,
                message,
            },
        }
    }
}

#[async_trait]
impl Provider for OpenAI {
    async fn translate_chunk(
        &self,
        chunk_text: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/chat/completions", self.endpoint);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::build_prompt(chunk_text, target_language),
            }],
            max_tokens: 2000,
            temperature: 0.7,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ProviderError::ConnectionError(format!("Failed to reach OpenAI API: {}", e))
                } else {
                    ProviderError::RequestFailed(format!("Failed to send request to OpenAI API: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(Self::classify_status(status, error_text));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Invalid OpenAI API response: {}", e)))?;

        let content = chat_response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                ProviderError::ParseError("OpenAI API response contained no choices".to_string())
            })?;

        let lines: Vec<String> = content
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        debug!("OpenAI returned {} translated lines", lines.len());
        Ok(lines)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
