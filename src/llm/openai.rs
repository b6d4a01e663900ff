//! OpenAI-compatible streaming chat completions client.
//!
//! Posts to `{base_url}/chat/completions` with `stream: true`. Works against
//! any endpoint that speaks the chat completions SSE dialect.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::config::LlmTimeouts;
use super::sse::{SsePayload, fragment_stream};
use super::types::{FragmentStream, LlmError, Message, Role, SessionConfig};

const DONE_MARKER: &str = "[DONE]";

// =============================================================================
// CLIENT
// =============================================================================

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    pub async fn stream_turn(
        &self,
        model: &str,
        config: &SessionConfig,
        history: &[Message],
        message: &str,
    ) -> Result<FragmentStream, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = build_request(model, config, history, message);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiResponse { status, body: text });
        }

        Ok(fragment_stream(response.bytes_stream(), parse_payload))
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
pub(crate) struct CcRequest<'a> {
    model: &'a str,
    messages: Vec<CcMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct CcMessage<'a> {
    role: &'static str,
    content: &'a str,
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Model => "assistant",
    }
}

pub(crate) fn build_request<'a>(
    model: &'a str,
    config: &'a SessionConfig,
    history: &'a [Message],
    message: &'a str,
) -> CcRequest<'a> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    if !config.system_instruction.trim().is_empty() {
        messages.push(CcMessage { role: "system", content: &config.system_instruction });
    }
    messages.extend(
        history
            .iter()
            .map(|m| CcMessage { role: wire_role(m.role), content: &m.text }),
    );
    messages.push(CcMessage { role: "user", content: message });

    CcRequest {
        model,
        messages,
        temperature: config.temperature,
        max_tokens: config.max_output_tokens,
        stream: true,
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Extract `choices[0].delta.content` from one streamed chunk.
pub(crate) fn parse_payload(data: &str) -> Result<SsePayload, LlmError> {
    if data.trim() == DONE_MARKER {
        return Ok(SsePayload::Done);
    }
    let root: Value = serde_json::from_str(data).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    if let Some(error) = root.get("error") {
        let body = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(LlmError::ApiResponse { status: 500, body });
    }

    let Some(delta) = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(|c| c.get("delta"))
    else {
        return Ok(SsePayload::Skip);
    };

    match delta.get("content").and_then(Value::as_str) {
        Some(text) => Ok(SsePayload::Text(text.to_string())),
        None => Ok(SsePayload::Skip),
    }
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
