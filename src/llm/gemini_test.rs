use super::*;
use serde_json::json;

fn config() -> SessionConfig {
    SessionConfig { system_instruction: "be a shell".into(), temperature: 0.7, max_output_tokens: 512 }
}

// ===== request building =====

#[test]
fn request_carries_persona_and_generation_config() {
    let cfg = config();
    let body = serde_json::to_value(build_request(&cfg, &[], "hi")).unwrap();
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be a shell");
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 512);
    assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
}

#[test]
fn request_appends_message_after_history() {
    let cfg = config();
    let history = vec![Message::user("who is aion"), Message::model("a developer")];
    let body = serde_json::to_value(build_request(&cfg, &history, "prices?")).unwrap();
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[1]["parts"][0]["text"], "a developer");
    assert_eq!(contents[2]["role"], "user");
    assert_eq!(contents[2]["parts"][0]["text"], "prices?");
}

// ===== payload parsing =====

#[test]
fn parse_text_delta() {
    let data = json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": "STATUS: " }, { "text": "ok" }] } }]
    })
    .to_string();
    assert_eq!(parse_payload(&data).unwrap(), SsePayload::Text("STATUS: ok".into()));
}

#[test]
fn parse_usage_only_payload_is_skipped() {
    let data = json!({ "usageMetadata": { "promptTokenCount": 12 } }).to_string();
    assert_eq!(parse_payload(&data).unwrap(), SsePayload::Skip);
}

#[test]
fn parse_finish_without_text_is_empty() {
    let data = json!({
        "candidates": [{ "content": { "role": "model", "parts": [] }, "finishReason": "STOP" }]
    })
    .to_string();
    assert_eq!(parse_payload(&data).unwrap(), SsePayload::Text(String::new()));
}

#[test]
fn parse_embedded_error_maps_status() {
    let data = json!({ "error": { "code": 429, "message": "quota exhausted", "status": "RESOURCE_EXHAUSTED" } })
        .to_string();
    let err = parse_payload(&data).unwrap_err();
    assert!(err.is_quota());
    assert!(matches!(err, LlmError::ApiResponse { ref body, .. } if body == "quota exhausted"));
}

#[test]
fn parse_invalid_json_errors() {
    assert!(matches!(parse_payload("{not json"), Err(LlmError::ApiParse(_))));
}
