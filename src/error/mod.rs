//! Error Handling Module
//!
//! This module provides error handling for the vendor adapters:
//! - Core error type (`LlmError`)
//! - Normalization of arbitrary transport failures into one stable message
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use llm_vendors::error::{CaughtError, TransportFailure};
//!
//! let failure = TransportFailure::Payload(serde_json::json!({ "message": "rate limited" }));
//! assert_eq!(CaughtError::from(&failure).into_message(), "rate limited");
//! ```

mod conversions;
pub mod normalize;
pub mod types;

pub use normalize::*;
pub use types::*;
