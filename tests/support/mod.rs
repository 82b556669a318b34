//! Shared test helpers: SSE fixtures and stub transports.
#![allow(dead_code)]

use async_trait::async_trait;
use futures_util::StreamExt;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use llm_vendors::error::{LlmError, TransportFailure};
use llm_vendors::streaming::{ChatStream, ChatStreamEvent};
use llm_vendors::transport::Transport;
use llm_vendors::types::{
    ChatGenerateOutput, ChatGenerateRequest, ModelInfo, ModelList, OpenAiAccess,
};

pub fn fixture_path(name: &str) -> String {
    format!(
        "{}/tests/fixtures/openai/{name}",
        env!("CARGO_MANIFEST_DIR")
    )
}

/// Load an `.sse` fixture and split it into one chunk per SSE event.
pub fn load_sse_fixture_as_bytes(name: &str) -> io::Result<Vec<Result<Vec<u8>, io::Error>>> {
    let raw = std::fs::read_to_string(fixture_path(name))?;
    let normalized = raw.replace("\r\n", "\n");
    let mut out = Vec::new();
    for chunk in normalized.split("\n\n") {
        let s = chunk.trim_end_matches('\n');
        if s.is_empty() {
            continue;
        }
        let mut owned = String::from(s);
        owned.push_str("\n\n");
        out.push(Ok(owned.into_bytes()));
    }
    Ok(out)
}

/// A 41+ character key in the OpenAI format.
pub fn test_api_key() -> String {
    format!("sk-{}", "t".repeat(40))
}

type FailureFactory = Arc<dyn Fn() -> TransportFailure + Send + Sync>;

/// How the stub answers streaming requests.
#[derive(Clone)]
pub enum StreamPlan {
    /// Deliver the deltas, then end normally.
    Complete(Vec<String>),
    /// Deliver the deltas with a pause between each, then never yield again.
    StallAfter(Vec<String>),
    /// Fail to open.
    OpenError(LlmError),
}

/// Transport stub that records what it is asked to do.
pub struct StubTransport {
    reply: Option<ChatGenerateOutput>,
    failure: Option<FailureFactory>,
    models: Result<ModelList, LlmError>,
    stream: StreamPlan,
    pub requests: Mutex<Vec<ChatGenerateRequest<OpenAiAccess>>>,
    pub list_calls: AtomicUsize,
    pub stream_calls: AtomicUsize,
}

impl StubTransport {
    pub fn replying(reply: ChatGenerateOutput) -> Self {
        Self {
            reply: Some(reply),
            failure: None,
            models: Ok(ModelList::new(vec![
                ModelInfo::new("gpt-4o"),
                ModelInfo::new("gpt-x"),
            ])),
            stream: StreamPlan::Complete(vec!["Hel".into(), "lo".into()]),
            requests: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            stream_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing<F>(failure: F) -> Self
    where
        F: Fn() -> TransportFailure + Send + Sync + 'static,
    {
        Self {
            reply: None,
            failure: Some(Arc::new(failure)),
            ..Self::replying(ChatGenerateOutput::assistant("", None))
        }
    }

    pub fn with_models(mut self, models: Result<ModelList, LlmError>) -> Self {
        self.models = models;
        self
    }

    pub fn with_stream(mut self, plan: StreamPlan) -> Self {
        self.stream = plan;
        self
    }

    pub fn generate_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ChatGenerateRequest<OpenAiAccess>> {
        self.requests.lock().unwrap().last().cloned()
    }
}

fn deltas(texts: Vec<String>) -> Vec<Result<ChatStreamEvent, LlmError>> {
    texts
        .into_iter()
        .map(|delta| Ok(ChatStreamEvent::ContentDelta { delta }))
        .collect()
}

#[async_trait]
impl Transport<OpenAiAccess> for StubTransport {
    async fn list_models(&self, _access: &OpenAiAccess) -> Result<ModelList, LlmError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.models.clone()
    }

    async fn chat_generate_with_functions(
        &self,
        request: &ChatGenerateRequest<OpenAiAccess>,
    ) -> Result<ChatGenerateOutput, TransportFailure> {
        self.requests.lock().unwrap().push(request.clone());
        match (&self.failure, &self.reply) {
            (Some(fail), _) => Err(fail()),
            (None, Some(reply)) => Ok(reply.clone()),
            (None, None) => Err(TransportFailure::Error(LlmError::InternalError(
                "stub has no reply".into(),
            ))),
        }
    }

    async fn chat_stream(
        &self,
        request: ChatGenerateRequest<OpenAiAccess>,
    ) -> Result<ChatStream, LlmError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        match self.stream.clone() {
            StreamPlan::Complete(texts) => {
                let mut events = deltas(texts);
                events.push(Ok(ChatStreamEvent::StreamEnd {
                    finish_reason: Some("stop".into()),
                }));
                Ok(Box::pin(futures_util::stream::iter(events)))
            }
            StreamPlan::StallAfter(texts) => {
                let paced = futures_util::stream::iter(deltas(texts)).then(|event| async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    event
                });
                Ok(Box::pin(paced.chain(futures_util::stream::pending())))
            }
            StreamPlan::OpenError(e) => Err(e),
        }
    }
}
