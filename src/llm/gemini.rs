//! Gemini `streamGenerateContent` client.
//!
//! Thin HTTP wrapper over `models/{model}:streamGenerateContent?alt=sse`.
//! Request building and payload parsing are pure functions for testability.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::config::LlmTimeouts;
use super::sse::{SsePayload, fragment_stream};
use super::types::{FragmentStream, LlmError, Message, Role, SessionConfig};

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
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
        let url = format!("{}/models/{model}:streamGenerateContent?alt=sse", self.base_url);
        let body = build_request(config, history, message);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
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
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiRequest<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: Vec<ApiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: [ApiPart<'a>; 1],
}

#[derive(Serialize)]
struct ApiContent<'a> {
    role: Role,
    parts: [ApiPart<'a>; 1],
}

#[derive(Serialize)]
struct ApiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

pub(crate) fn build_request<'a>(config: &'a SessionConfig, history: &'a [Message], message: &'a str) -> ApiRequest<'a> {
    let contents = history
        .iter()
        .map(|m| ApiContent { role: m.role, parts: [ApiPart { text: &m.text }] })
        .chain(std::iter::once(ApiContent { role: Role::User, parts: [ApiPart { text: message }] }))
        .collect();

    ApiRequest {
        system_instruction: SystemInstruction { parts: [ApiPart { text: &config.system_instruction }] },
        contents,
        generation_config: GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        },
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Extract the text delta from one streamed `GenerateContentResponse`.
pub(crate) fn parse_payload(data: &str) -> Result<SsePayload, LlmError> {
    let root: Value = serde_json::from_str(data).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    if let Some(error) = root.get("error") {
        let status = error
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(500);
        let body = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(LlmError::ApiResponse { status, body });
    }

    let Some(parts) = root
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
    else {
        return Ok(SsePayload::Skip);
    };

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    Ok(SsePayload::Text(text))
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
