//! Core error type shared by vendors, transports and the streaming client.

use thiserror::Error;

/// Errors produced by vendor adapters and their transports.
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    /// Malformed or missing access/options fields, detected at call time.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    /// Transport-level failure (connection, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    /// Response body could not be decoded into the expected shape.
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Rate limit error: {0}")]
    RateLimitError(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceededError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Provider error envelope carrying a provider-specific code.
    #[error("{provider} error: {message}")]
    ProviderError {
        provider: String,
        message: String,
        error_code: Option<String>,
    },

    /// Non-success HTTP status that did not map onto a narrower variant.
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Stream error: {0}")]
    StreamError(String),

    /// The caller cancelled a streaming generation.
    #[error("Stream cancelled")]
    Cancelled,

    /// Normalized failure of a synchronous generation call.
    ///
    /// Displays as the bare message so callers never see the original shape.
    #[error("{0}")]
    GenerationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Coarse error category, used for logging and caller-side policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Authentication,
    RateLimit,
    Client,
    Server,
    Network,
    Parsing,
    Stream,
    Generation,
    Internal,
}

impl LlmError {
    /// Build an `ApiError` without details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// HTTP status associated with the error, when known.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            Self::AuthenticationError(_) => Some(401),
            Self::RateLimitError(_) => Some(429),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationError(_) | Self::InvalidParameter(_) | Self::MissingApiKey(_) => {
                ErrorCategory::Configuration
            }
            Self::AuthenticationError(_) => ErrorCategory::Authentication,
            Self::RateLimitError(_) | Self::QuotaExceededError(_) => ErrorCategory::RateLimit,
            Self::InvalidInput(_) | Self::NotFound(_) => ErrorCategory::Client,
            Self::ApiError { code, .. } if *code >= 500 => ErrorCategory::Server,
            Self::ApiError { .. } | Self::ProviderError { .. } => ErrorCategory::Client,
            Self::HttpError(_) => ErrorCategory::Network,
            Self::JsonError(_) | Self::ParseError(_) => ErrorCategory::Parsing,
            Self::StreamError(_) | Self::Cancelled => ErrorCategory::Stream,
            Self::GenerationError(_) => ErrorCategory::Generation,
            Self::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// The provider/transport message without the variant prefix.
    ///
    /// Returns `None` when the variant carries no message of its own.
    pub fn raw_message(&self) -> Option<&str> {
        let msg = match self {
            Self::ConfigurationError(m)
            | Self::InvalidParameter(m)
            | Self::MissingApiKey(m)
            | Self::HttpError(m)
            | Self::JsonError(m)
            | Self::ParseError(m)
            | Self::AuthenticationError(m)
            | Self::RateLimitError(m)
            | Self::QuotaExceededError(m)
            | Self::InvalidInput(m)
            | Self::NotFound(m)
            | Self::StreamError(m)
            | Self::GenerationError(m)
            | Self::InternalError(m) => m.as_str(),
            Self::ProviderError { message, .. } | Self::ApiError { message, .. } => {
                message.as_str()
            }
            Self::Cancelled => return None,
        };
        Some(msg)
    }
}
