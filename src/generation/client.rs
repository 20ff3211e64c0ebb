// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat-completion client for an OpenAI-compatible API

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Prefix of the inline string returned when a generation call fails
pub const ERROR_PREFIX: &str = "Error in AI response:";

/// Returned when the API answers without any usable content
pub const NO_RESPONSE: &str = "No response from AI.";

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(serde::Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatResponseMessage>,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Errors from a single completion call
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{status} from completion API: {body}")]
    Api { status: StatusCode, body: String },

    #[error("invalid completion response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Produces text for a prompt
///
/// Implementations never fail: errors are folded into the returned string so
/// a generation outage never hides detection results.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> String;
}

/// Connection settings for the completion API
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "gpt-4".to_string(),
            temperature: 0.4,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Client for a hosted chat-completion endpoint
pub struct CompletionClient {
    client: Client,
    config: CompletionConfig,
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("api_url", &self.config.api_url)
            .field("model", &self.config.model)
            .field("temperature", &self.config.temperature)
            .finish_non_exhaustive()
    }
}

impl CompletionClient {
    /// Create a new completion client
    pub fn new(config: CompletionConfig) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        info!(
            "Completion client configured: url={}, model={}, temperature={}",
            config.api_url, config.model, config.temperature
        );

        Ok(Self { client, config })
    }

    /// Send one prompt and return the first choice's content
    pub async fn try_generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Api { status, body });
        }

        let chat_response: ChatResponse = serde_json::from_str(&body)?;
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_else(|| NO_RESPONSE.to_string());

        debug!("Completion returned {} chars", content.len());
        Ok(content)
    }
}

#[async_trait]
impl TextGenerator for CompletionClient {
    async fn generate(&self, prompt: &str) -> String {
        match self.try_generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Completion request failed: {}", e);
                format!("{} {}", ERROR_PREFIX, e)
            }
        }
    }
}
