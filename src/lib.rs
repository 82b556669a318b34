//! # llm-vendors - Pluggable LLM vendor adapters
//!
//! A vendor adapts one provider dialect to a host application: it turns
//! partial persisted settings into a complete access record, discovers
//! models, and runs chat generation synchronously or as a stream.
//!
#![deny(unsafe_code)]

//! ## Features
//!
//! - **OpenAI vendor**: chat completions with callable functions, optional
//!   moderation pre-check, OpenAI-compatible hosts and the Helicone proxy.
//! - **Stable failures**: whatever a transport fails with, callers see one
//!   message, and the failure is logged.
//! - **Shared streaming client**: ordered chunks, exactly one terminal item,
//!   cancellation that never hangs.
//! - **Explicit model query**: fetch-when-enabled, no focus refetch, success
//!   observers.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use llm_vendors::prelude::*;
//!
//! let vendor = ModelVendorOpenAi::from_env(&HttpConfig::default())?;
//! let access = vendor.get_transport_access(&OpenAiSetup::new().with_api_key(key));
//! let reply = vendor
//!     .chat_generate_or_throw(
//!         &access,
//!         &OpenAiLlmOptions::new("gpt-4o-mini"),
//!         vec![ChatMessage::user("Hello")],
//!         None,
//!         None,
//!         None,
//!     )
//!     .await?;
//! ```

pub mod capabilities;
pub mod defaults;
pub mod error;
pub mod query;
pub mod registry;
pub mod streaming;
pub mod telemetry;
pub mod transport;
pub mod types;
pub mod vendor;

pub use capabilities::{BackendCapabilities, backend_caps};
pub use error::{CaughtError, LlmError, TransportFailure};
pub use query::{ModelsQuery, QueryPolicy, QueryState};
pub use registry::VendorRegistry;
pub use streaming::{CancelHandle, ChatStream, ChatStreamEvent, StreamOutcome};
pub use transport::{OpenAiHttpTransport, ServerEnv, Transport};
pub use vendor::{ModelVendor, ModelVendorOpenAi, VendorInfo, VendorLocation};

/// Commonly used items.
pub mod prelude {
    pub use crate::capabilities::{BackendCapabilities, backend_caps};
    pub use crate::error::LlmError;
    pub use crate::query::{ModelsQuery, QueryPolicy, QueryState};
    pub use crate::registry::VendorRegistry;
    pub use crate::streaming::{
        CancelHandle, ChatStream, ChatStreamEvent, StreamOutcome, new_cancel_handle,
    };
    pub use crate::transport::{OpenAiHttpTransport, ServerEnv, Transport};
    pub use crate::types::*;
    pub use crate::vendor::{
        ModelVendor, ModelVendorOpenAi, VendorInfo, VendorLocation, is_valid_openai_api_key,
    };
}
