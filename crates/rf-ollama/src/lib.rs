//! Ollama client
//!
//! Talks to a locally hosted Ollama server over its HTTP API.
//! Default endpoint: http://localhost:11434

use async_trait::async_trait;
use reqwest::Client;
use rf_types::{AppError, AppResult, ChatClient};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// System message pinning the model to pattern-only output
const SYSTEM_PROMPT: &str = "You are a regex pattern generator. You only output \
    valid regex patterns in the exact format requested. Never explain or add comments.";

/// Client for a local Ollama server
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    /// Creates a new client with default settings
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    /// Creates a new client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Check whether the server is reachable and report its version
    pub async fn status(&self) -> ServiceStatus {
        let url = format!("{}/api/version", self.base_url);
        debug!("Checking Ollama status at: {}", url);

        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let version = response
                    .json::<VersionResponse>()
                    .await
                    .ok()
                    .map(|v| v.version);
                ServiceStatus {
                    is_running: true,
                    version,
                    error: None,
                }
            }
            Ok(response) => {
                let status = response.status();
                warn!("Ollama status check failed with status: {}", status);
                ServiceStatus {
                    is_running: false,
                    version: None,
                    error: Some(format!("HTTP {}", status)),
                }
            }
            Err(e) => ServiceStatus {
                is_running: false,
                version: None,
                error: Some(e.to_string()),
            },
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn chat(&self, model: &str, prompt: &str) -> AppResult<String> {
        let url = format!("{}/api/chat", self.base_url);
        debug!("Sending chat request to Ollama: {}", url);

        let request = OllamaChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            stream: false,
            options: OllamaOptions {
                temperature: 0.1,
                top_p: 0.95,
                top_k: 40,
                num_predict: 100,
                repeat_penalty: 1.1,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Ollama request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Ollama API error {}: {}",
                status, error_text
            )));
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse Ollama response: {}", e)))?;

        let content = chat_response
            .message
            .map(|m| m.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                AppError::Upstream("Ollama response is missing message content".to_string())
            })?;

        debug!("Chat response received, {} bytes", content.len());
        Ok(content)
    }
}

/// Reachability report for the local server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub is_running: bool,
    pub version: Option<String>,
    pub error: Option<String>,
}

// Ollama API request/response types

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

/// Decoding options tuned for deterministic, short pattern output
#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    num_predict: u32,
    repeat_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct VersionResponse {
    version: String,
}
