//! LLM types — provider-neutral turn types and errors.
//!
//! Shared by the Gemini and `OpenAI` clients and by the chat session, which
//! only ever sees a [`ChatTransport`] and a stream of [`Fragment`]s.

use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM transport operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed, or the stream broke mid-body.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success status (auth, quota, outage).
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// A streamed event could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl LlmError {
    /// `true` when the provider rejected the call for quota or rate reasons.
    #[must_use]
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::ApiResponse { status: 429, .. })
    }
}

impl crate::error::ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// TURN TYPES
// =============================================================================

/// Speaker of a message. Serialized in the lowercase form Gemini expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A completed message in the session history sent with each turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Role::Model, text: text.into() }
    }
}

/// One incremental piece of streamed reply text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
}

impl Fragment {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Fixed per-session generation settings. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Persona / system prompt sent with every turn.
    pub system_instruction: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Lazy, finite, non-restartable sequence of reply fragments.
pub type FragmentStream = BoxStream<'static, Result<Fragment, LlmError>>;

// =============================================================================
// CHAT TRANSPORT TRAIT
// =============================================================================

/// Provider-neutral streaming chat transport. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one user turn with the prior history and return its reply stream.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request cannot be sent or the provider
    /// rejects it before streaming starts. Failures after that surface as
    /// `Err` items inside the stream.
    async fn send_turn(
        &self,
        config: &SessionConfig,
        history: &[Message],
        message: &str,
    ) -> Result<FragmentStream, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
