//! OpenAI streaming implementation using eventsource-stream
//!
//! Turns the `text/event-stream` body of a chat completion into a
//! [`ChatStream`]. Each `data:` frame carries one chunk; `[DONE]` ends the
//! stream and the last `finish_reason` seen is reported on `StreamEnd`.

use eventsource_stream::Eventsource;
use futures::Stream;
use futures_util::StreamExt;
use std::fmt::Display;

use super::errors::classify_error_object;
use super::wire::WireStreamChunk;
use crate::error::LlmError;
use crate::streaming::{ChatStream, ChatStreamEvent};

const DONE_MARKER: &str = "[DONE]";

/// State carried across frames of one stream.
#[derive(Debug, Default)]
pub struct StreamState {
    pub finish_reason: Option<String>,
}

/// Convert one `data:` payload into zero or more events.
pub fn convert_chunk(
    data: &str,
    state: &mut StreamState,
) -> Result<Vec<ChatStreamEvent>, LlmError> {
    let chunk: WireStreamChunk = serde_json::from_str(data)
        .map_err(|e| LlmError::ParseError(format!("Failed to parse stream chunk: {e}")))?;

    if let Some(error) = &chunk.error {
        return Err(classify_error_object("openai", error));
    }

    let mut events = Vec::new();
    // only the first choice is requested (n = 1)
    if let Some(choice) = chunk.choices.into_iter().next() {
        if let Some(content) = choice.delta.content {
            if !content.is_empty() {
                events.push(ChatStreamEvent::ContentDelta { delta: content });
            }
        }
        if let Some(call) = choice.delta.function_call {
            if call.name.is_some() || call.arguments.is_some() {
                events.push(ChatStreamEvent::FunctionCallDelta {
                    name: call.name,
                    arguments_delta: call.arguments,
                });
            }
        }
        if choice.finish_reason.is_some() {
            state.finish_reason = choice.finish_reason;
        }
    }
    Ok(events)
}

/// Decode an SSE byte stream into chat events.
pub fn sse_to_chat_stream<S, B, E>(bytes: S) -> ChatStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let mut events = Box::pin(bytes.eventsource());
    let s = async_stream::stream! {
        let mut state = StreamState::default();
        while let Some(frame) = events.next().await {
            let event = match frame {
                Ok(event) => event,
                Err(e) => {
                    yield Err(LlmError::StreamError(format!("SSE error: {e}")));
                    return;
                }
            };
            let data = event.data.trim();
            if data.is_empty() {
                continue;
            }
            if data == DONE_MARKER {
                break;
            }
            match convert_chunk(data, &mut state) {
                Ok(converted) => {
                    for e in converted {
                        yield Ok(e);
                    }
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
        tracing::debug!(finish_reason = ?state.finish_reason, "openai stream finished");
        yield Ok(ChatStreamEvent::StreamEnd { finish_reason: state.finish_reason });
    };
    Box::pin(s)
}

/// Stream for a reply that was produced locally, without a provider call.
pub fn canned_stream(text: String, finish_reason: &str) -> ChatStream {
    let events = vec![
        Ok(ChatStreamEvent::ContentDelta { delta: text }),
        Ok(ChatStreamEvent::StreamEnd {
            finish_reason: Some(finish_reason.to_string()),
        }),
    ];
    Box::pin(futures::stream::iter(events))
}
