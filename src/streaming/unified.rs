//! Provider-agnostic streaming client.
//!
//! Vendors hand a `ChatGenerateRequest` to [`unified_streaming_client`]; the
//! transport opens the provider stream and this module enforces the stream
//! contract on top of it:
//! - events are forwarded in order,
//! - exactly one terminal item (`StreamEnd` or `Err`) is delivered, last,
//! - once the cancel handle fires nothing but `Err(LlmError::Cancelled)` is
//!   delivered and the inner stream is dropped.

use futures_util::StreamExt;

use super::{CancelHandle, ChatStream, ChatStreamEvent, StreamOutcome};
use crate::error::LlmError;
use crate::transport::Transport;
use crate::types::ChatGenerateRequest;

enum Step {
    Cancelled,
    Item(Option<Result<ChatStreamEvent, LlmError>>),
}

/// Wrap `inner` so it honors `cancel` and ends with exactly one terminal item.
pub fn guard_stream(inner: ChatStream, cancel: CancelHandle) -> ChatStream {
    let mut inner = inner;
    let s = async_stream::stream! {
        loop {
            let step = tokio::select! {
                biased;
                _ = cancel.cancelled() => Step::Cancelled,
                item = inner.next() => Step::Item(item),
            };
            match step {
                Step::Cancelled => {
                    tracing::debug!("stream cancelled by caller");
                    yield Err(LlmError::Cancelled);
                    break;
                }
                // Inner stream ended without a terminal event.
                Step::Item(None) => {
                    yield Ok(ChatStreamEvent::StreamEnd { finish_reason: None });
                    break;
                }
                Step::Item(Some(Ok(event))) => {
                    let terminal = event.is_terminal();
                    yield Ok(event);
                    if terminal {
                        break;
                    }
                }
                Step::Item(Some(Err(e))) => {
                    yield Err(e);
                    break;
                }
            }
        }
    };
    Box::pin(s)
}

fn single_error(err: LlmError) -> ChatStream {
    Box::pin(futures::stream::once(async move { Err(err) }))
}

/// Open a stream through `transport` and guard it.
///
/// Failures while opening are delivered as the terminal item of the returned
/// stream, never as an error of this call.
pub async fn unified_streaming_client<A, T>(
    transport: &T,
    request: ChatGenerateRequest<A>,
    cancel: CancelHandle,
) -> ChatStream
where
    A: Send + Sync + 'static,
    T: Transport<A> + ?Sized,
{
    if cancel.is_cancelled() {
        return single_error(LlmError::Cancelled);
    }

    let opened = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LlmError::Cancelled),
        opened = transport.chat_stream(request) => opened,
    };

    match opened {
        Ok(inner) => guard_stream(inner, cancel),
        Err(e) => {
            tracing::warn!(error = %e, "failed to open chat stream");
            single_error(e)
        }
    }
}

/// Consume a stream, reporting every delta to `on_chunk`.
///
/// Returns the accumulated outcome on `StreamEnd`, or the terminal error.
pub async fn drive_stream<F>(
    mut stream: ChatStream,
    mut on_chunk: F,
) -> Result<StreamOutcome, LlmError>
where
    F: FnMut(&ChatStreamEvent),
{
    let mut outcome = StreamOutcome::default();
    while let Some(item) = stream.next().await {
        let event = item?;
        outcome.apply(&event);
        if event.is_terminal() {
            return Ok(outcome);
        }
        on_chunk(&event);
    }
    Ok(outcome)
}
