//! Shared types, error types, and traits for regexforge

pub mod errors;

pub use errors::{AppError, AppResult};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default model used for generation when the caller does not pick one
pub const DEFAULT_MODEL: &str = "tinyllama";

/// Default flags applied to generated patterns
pub const DEFAULT_FLAGS: &str = "g";

/// A single chat round trip to a text-generation backend.
///
/// The generation pipeline only ever needs "send a prompt, get the reply
/// text back"; keeping that behind a trait lets tests substitute canned
/// responses for a live Ollama server.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send `prompt` to `model` and return the generated message content.
    ///
    /// Transport failures, non-success HTTP statuses, and malformed
    /// response envelopes all surface as [`AppError::Upstream`].
    async fn chat(&self, model: &str, prompt: &str) -> AppResult<String>;
}

/// One request to generate a pattern from a natural-language description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub description: String,
    /// Flag letters appended to the generated pattern (default `"g"`)
    pub flags: String,
    /// Model identifier passed to the chat backend
    pub model: String,
}

impl GenerationRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            flags: DEFAULT_FLAGS.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = flags.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Outcome of applying a pattern string to a subject string.
///
/// `is_valid == false` means the pattern could not be parsed or compiled
/// and always comes with an empty match list. A valid pattern that simply
/// matches nothing is `{ matches: [], is_valid: true }` — callers must not
/// conflate the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matches: Vec<String>,
    pub is_valid: bool,
}

impl MatchResult {
    pub fn invalid() -> Self {
        Self {
            matches: Vec::new(),
            is_valid: false,
        }
    }

    pub fn valid(matches: Vec<String>) -> Self {
        Self {
            matches,
            is_valid: true,
        }
    }
}
