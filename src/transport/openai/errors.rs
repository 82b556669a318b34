use crate::error::LlmError;
use serde_json::Value;

/// Classify an OpenAI-compatible HTTP error by parsing the standard envelope.
///
/// OpenAI-style APIs typically return:
/// `{ "error": { "message": "...", "type": "...", "code": "..." } }`
///
/// Bodies that don't match the envelope become `ApiError` with the raw body.
pub fn classify_http_error(provider: &str, status: u16, body_text: &str) -> LlmError {
    classify_envelope(provider, status, body_text).unwrap_or_else(|| LlmError::ApiError {
        code: status,
        message: if body_text.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body_text.to_string()
        },
        details: None,
    })
}

/// Map an `error` object found inside a stream frame.
pub fn classify_error_object(provider: &str, error_obj: &Value) -> LlmError {
    let body = serde_json::json!({ "error": error_obj });
    classify_envelope(provider, 200, &body.to_string())
        .unwrap_or_else(|| LlmError::StreamError(error_obj.to_string()))
}

fn classify_envelope(provider: &str, status: u16, body_text: &str) -> Option<LlmError> {
    let json: Value = serde_json::from_str(body_text).ok()?;
    let error_obj = json.get("error")?;

    let message = error_obj
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown error");
    let error_type = error_obj.get("type").and_then(|v| v.as_str());
    let error_code = error_obj.get("code").and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    let mapped = match error_type.unwrap_or("") {
        "authentication_error" => LlmError::AuthenticationError(message.to_string()),
        "rate_limit_error" | "requests" | "tokens" => LlmError::RateLimitError(message.to_string()),
        "insufficient_quota" => LlmError::QuotaExceededError(message.to_string()),
        "not_found_error" => LlmError::NotFound(message.to_string()),
        "invalid_request_error" if status == 401 => {
            LlmError::AuthenticationError(message.to_string())
        }
        "invalid_request_error" => LlmError::InvalidInput(message.to_string()),
        _ => map_by_status(provider, status, message, json.clone(), error_code),
    };

    Some(mapped)
}

fn map_by_status(
    provider: &str,
    status: u16,
    message: &str,
    details: Value,
    error_code: Option<String>,
) -> LlmError {
    let lower = message.to_lowercase();

    if status == 401 || lower.contains("api key") || lower.contains("unauthorized") {
        return LlmError::AuthenticationError(message.to_string());
    }
    if status == 429 || lower.contains("rate limit") {
        return LlmError::RateLimitError(message.to_string());
    }
    if lower.contains("quota") {
        return LlmError::QuotaExceededError(message.to_string());
    }
    if status == 404 {
        return LlmError::NotFound(message.to_string());
    }

    match error_code {
        Some(code) => LlmError::ProviderError {
            provider: provider.to_string(),
            message: message.to_string(),
            error_code: Some(code),
        },
        None => LlmError::ApiError {
            code: status,
            message: message.to_string(),
            details: Some(details),
        },
    }
}
