//! LLM — streaming multi-provider adapter behind the chat session.
//!
//! DESIGN
//! ======
//! Configured from environment variables. The `LlmClient` enum dispatches to
//! Gemini or an `OpenAI`-compatible endpoint based on `LLM_PROVIDER`; callers
//! only see the [`ChatTransport`] trait and a stream of fragments.

pub mod config;
pub mod gemini;
pub mod openai;
pub mod sse;
pub mod types;

use config::{LlmConfig, LlmProviderKind};
pub use types::ChatTransport;
use types::{FragmentStream, LlmError, Message, SessionConfig};

// =============================================================================
// CLIENT DISPATCH
// =============================================================================

/// Concrete streaming client for either Gemini or `OpenAI`.
///
/// Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: LlmProvider,
    model: String,
}

enum LlmProvider {
    Gemini(gemini::GeminiClient),
    OpenAi(openai::OpenAiClient),
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// See [`LlmConfig::from_env`] for the recognised variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let model = config.model.clone();
        let inner = match config.provider {
            LlmProviderKind::Gemini => {
                LlmProvider::Gemini(gemini::GeminiClient::new(config.api_key, config.base_url, config.timeouts)?)
            }
            LlmProviderKind::OpenAi => {
                LlmProvider::OpenAi(openai::OpenAiClient::new(config.api_key, config.base_url, config.timeouts)?)
            }
        };
        Ok(Self { inner, model })
    }

    /// Return the configured model name (e.g. `"gemini-1.5-flash"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Return the provider this client talks to.
    #[must_use]
    pub fn provider(&self) -> LlmProviderKind {
        match self.inner {
            LlmProvider::Gemini(_) => LlmProviderKind::Gemini,
            LlmProvider::OpenAi(_) => LlmProviderKind::OpenAi,
        }
    }
}

#[async_trait::async_trait]
impl ChatTransport for LlmClient {
    async fn send_turn(
        &self,
        config: &SessionConfig,
        history: &[Message],
        message: &str,
    ) -> Result<FragmentStream, LlmError> {
        match &self.inner {
            LlmProvider::Gemini(c) => {
                c.stream_turn(&self.model, config, history, message)
                    .await
            }
            LlmProvider::OpenAi(c) => {
                c.stream_turn(&self.model, config, history, message)
                    .await
            }
        }
    }
}
