//! Normalization of heterogeneous transport failures.
//!
//! A transport may fail with a typed `LlmError`, with a raw error payload
//! decoded from the wire, or with any boxed error from a foreign client.
//! Generation entry points resolve all of them through [`CaughtError`] and
//! surface a single `LlmError::GenerationError` carrying only the message.

use super::types::LlmError;

/// Message used when a failure carries nothing printable.
pub const GENERATION_ERROR_FALLBACK: &str = "generation error";

/// Whatever a transport call failed with.
#[derive(Debug)]
pub enum TransportFailure {
    /// Typed error raised by a transport built on this crate.
    Error(LlmError),
    /// Raw value whose shape is unknown (an RPC error body, a thrown value).
    Payload(serde_json::Value),
    /// Error from a foreign client library.
    Boxed(Box<dyn std::error::Error + Send + Sync>),
}

impl From<LlmError> for TransportFailure {
    fn from(err: LlmError) -> Self {
        Self::Error(err)
    }
}

impl From<serde_json::Value> for TransportFailure {
    fn from(value: serde_json::Value) -> Self {
        Self::Payload(value)
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        Self::Error(err.into())
    }
}

impl From<serde_json::Error> for TransportFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::Error(err.into())
    }
}

/// A caught failure, classified by how its message can be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaughtError {
    /// The failure exposes a message field.
    HasMessage(String),
    /// The failure only has a printable representation.
    HasToString(String),
    Unknown,
}

impl CaughtError {
    /// Resolve to a message, falling back to [`GENERATION_ERROR_FALLBACK`].
    pub fn into_message(self) -> String {
        match self {
            Self::HasMessage(m) | Self::HasToString(m) => m,
            Self::Unknown => GENERATION_ERROR_FALLBACK.to_string(),
        }
    }

    fn from_payload(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => match map.get("message") {
                Some(serde_json::Value::String(m)) if !m.is_empty() => Self::HasMessage(m.clone()),
                _ => Self::Unknown,
            },
            serde_json::Value::String(s) if !s.is_empty() => Self::HasToString(s.clone()),
            _ => Self::Unknown,
        }
    }

    fn from_display(text: String) -> Self {
        if text.is_empty() {
            Self::Unknown
        } else {
            Self::HasToString(text)
        }
    }
}

impl From<&TransportFailure> for CaughtError {
    fn from(failure: &TransportFailure) -> Self {
        match failure {
            TransportFailure::Error(err) => match err.raw_message() {
                Some(m) if !m.is_empty() => Self::HasMessage(m.to_string()),
                _ => Self::from_display(err.to_string()),
            },
            TransportFailure::Payload(value) => Self::from_payload(value),
            TransportFailure::Boxed(err) => Self::from_display(err.to_string()),
        }
    }
}

/// Log a failed generation call and fold it into `LlmError::GenerationError`.
pub fn normalize_generation_error(operation: &str, failure: TransportFailure) -> LlmError {
    let message = CaughtError::from(&failure).into_message();
    tracing::error!(operation, error = ?failure, "{operation}: {message}");
    LlmError::GenerationError(message)
}
