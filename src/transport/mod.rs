//! Transport contracts.
//!
//! A vendor never talks to the network itself; it goes through a `Transport`
//! for its access type. The HTTP implementation for the OpenAI dialect lives
//! in [`openai`]; tests substitute stubs.

use async_trait::async_trait;

use crate::error::{LlmError, TransportFailure};
use crate::streaming::ChatStream;
use crate::types::{ChatGenerateOutput, ChatGenerateRequest, ModelList};

pub mod openai;

pub use openai::{OpenAiHttpTransport, ServerEnv};

/// Request/response and streaming operations a vendor depends on.
#[async_trait]
pub trait Transport<A>: Send + Sync
where
    A: Send + Sync + 'static,
{
    /// List the models reachable with `access`.
    async fn list_models(&self, access: &A) -> Result<ModelList, LlmError>;

    /// One generation round trip, optionally with callable functions.
    ///
    /// Failures may take any shape; callers normalize them.
    async fn chat_generate_with_functions(
        &self,
        request: &ChatGenerateRequest<A>,
    ) -> Result<ChatGenerateOutput, TransportFailure>;

    /// Open a provider stream for the same request shape.
    async fn chat_stream(&self, request: ChatGenerateRequest<A>) -> Result<ChatStream, LlmError>;
}
