//! Streaming Types
//!
//! Defines the event and stream types produced by streaming generation, the
//! cancellation handle, and the provider-agnostic streaming client that all
//! vendors delegate to.

use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use crate::error::LlmError;
use crate::types::ChatGenerateOutput;

pub mod cancel;
pub mod unified;

pub use cancel::{CancelHandle, new_cancel_handle};
pub use unified::{drive_stream, guard_stream, unified_streaming_client};

/// Chat streaming event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatStreamEvent {
    /// Incremental text
    ContentDelta { delta: String },
    /// Fragment of a function call; the name arrives once, arguments in pieces
    FunctionCallDelta {
        name: Option<String>,
        arguments_delta: Option<String>,
    },
    /// Successful end of the stream
    StreamEnd { finish_reason: Option<String> },
}

impl ChatStreamEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::StreamEnd { .. })
    }
}

/// Chat Stream - ordered events, ending in one terminal `StreamEnd` or `Err`.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatStreamEvent, LlmError>> + Send>>;

/// Everything a completed stream delivered, accumulated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamOutcome {
    pub text: String,
    pub function_name: Option<String>,
    pub function_arguments: String,
    pub finish_reason: Option<String>,
}

impl StreamOutcome {
    pub fn apply(&mut self, event: &ChatStreamEvent) {
        match event {
            ChatStreamEvent::ContentDelta { delta } => self.text.push_str(delta),
            ChatStreamEvent::FunctionCallDelta {
                name,
                arguments_delta,
            } => {
                if let Some(name) = name {
                    self.function_name = Some(name.clone());
                }
                if let Some(args) = arguments_delta {
                    self.function_arguments.push_str(args);
                }
            }
            ChatStreamEvent::StreamEnd { finish_reason } => {
                self.finish_reason = finish_reason.clone();
            }
        }
    }

    /// Fold into the same result shape the synchronous path returns.
    ///
    /// Arguments that are not valid JSON are kept as a JSON string.
    pub fn into_output(self) -> ChatGenerateOutput {
        match self.function_name {
            Some(function_name) => {
                let function_arguments = serde_json::from_str(&self.function_arguments)
                    .unwrap_or(serde_json::Value::String(self.function_arguments));
                ChatGenerateOutput::FunctionCall {
                    function_name,
                    function_arguments,
                }
            }
            None => ChatGenerateOutput::assistant(self.text, self.finish_reason),
        }
    }
}
