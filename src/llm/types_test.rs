use super::*;
use crate::error::ErrorCode;

// =============================================================================
// LlmError::error_code
// =============================================================================

#[test]
fn error_code_config_parse() {
    let err = LlmError::ConfigParse("bad".into());
    assert_eq!(err.error_code(), "E_CONFIG_PARSE");
}

#[test]
fn error_code_missing_api_key() {
    let err = LlmError::MissingApiKey { var: "KEY".into() };
    assert_eq!(err.error_code(), "E_MISSING_API_KEY");
}

#[test]
fn error_code_api_response() {
    let err = LlmError::ApiResponse { status: 500, body: "oops".into() };
    assert_eq!(err.error_code(), "E_API_RESPONSE");
}

#[test]
fn error_code_api_parse() {
    let err = LlmError::ApiParse("json".into());
    assert_eq!(err.error_code(), "E_API_PARSE");
}

// =============================================================================
// LlmError::retryable / is_quota
// =============================================================================

#[test]
fn retryable_api_request() {
    assert!(LlmError::ApiRequest("conn refused".into()).retryable());
}

#[test]
fn retryable_api_response_429() {
    let err = LlmError::ApiResponse { status: 429, body: "quota".into() };
    assert!(err.retryable());
    assert!(err.is_quota());
}

#[test]
fn retryable_api_response_503() {
    let err = LlmError::ApiResponse { status: 503, body: "unavailable".into() };
    assert!(err.retryable());
    assert!(!err.is_quota());
}

#[test]
fn not_retryable_auth_failure() {
    let err = LlmError::ApiResponse { status: 401, body: "unauthorized".into() };
    assert!(!err.retryable());
}

#[test]
fn not_retryable_missing_api_key() {
    assert!(!LlmError::MissingApiKey { var: "K".into() }.retryable());
}

#[test]
fn display_missing_api_key_names_var() {
    let err = LlmError::MissingApiKey { var: "GEMINI_API_KEY".into() };
    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

// =============================================================================
// Role / Message serde
// =============================================================================

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
    assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
}

#[test]
fn message_constructors_set_role() {
    assert_eq!(Message::user("hi").role, Role::User);
    assert_eq!(Message::model("hello").role, Role::Model);
    assert_eq!(Message::model("hello").text, "hello");
}
