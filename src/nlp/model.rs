//! Chat client for the text-generation model.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument};

/// Connection details for the model server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Base URL of the Ollama server.
    pub host: String,
    pub model: String,
    /// Request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Reply from a chat call; the raw text lives in `message.content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub model: String,
    pub message: ChatMessage,
}

impl ChatReply {
    pub fn content(&self) -> &str {
        &self.message.content
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request to model server failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

/// Anything that can answer a single-turn chat prompt.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn chat(&self, prompt: &str) -> Result<ChatReply, ModelError>;
}

/// Ollama `/api/chat` client, non-streaming.
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &ModelConfig) -> Result<Self, ModelError> {
        let mut builder = Client::builder().user_agent("review-sentiment/0.1");
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: format!("{}/api/chat", config.host.trim_end_matches('/')),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    #[instrument(skip_all, fields(prompt_len = prompt.len()))]
    async fn chat(&self, prompt: &str) -> Result<ChatReply, ModelError> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "stream": false
        });
        let resp = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ModelError::Status {
                status,
                message: error_message(&text),
            });
        }
        debug!(bytes = text.len(), "model replied");
        serde_json::from_str(&text).map_err(|err| ModelError::InvalidResponse(err.to_string()))
    }
}

/// Pull `error` out of an Ollama error body, else a trimmed snippet of it.
fn error_message(body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = v.get("error").and_then(|e| e.as_str()) {
            return msg.to_string();
        }
    }
    let trimmed = body.trim();
    match trimmed.char_indices().nth(400) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
