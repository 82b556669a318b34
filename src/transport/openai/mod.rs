//! OpenAI HTTP transport
//!
//! Implements [`Transport`] for [`OpenAiAccess`] against the OpenAI REST API
//! or any compatible host: model listing, chat completions (plain and
//! streaming) and the optional moderation pre-check.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::defaults::openai::{CHAT_COMPLETIONS_PATH, MODELS_PATH};
use crate::error::{LlmError, TransportFailure};
use crate::streaming::ChatStream;
use crate::types::{
    ChatGenerateOutput, ChatGenerateRequest, HttpConfig, ModelInfo, ModelList, OpenAiAccess,
};

use super::Transport;

pub mod access;
pub mod errors;
pub mod moderation;
pub mod streaming;
pub mod wire;

pub use access::{ResolvedAccess, ServerEnv};

use errors::classify_http_error;
use moderation::MODERATION_FINISH_REASON;
use wire::{WireChatRequest, WireChatResponse, WireFunctionCallChoice, WireModelsResponse};

/// Transport for the `openai` dialect.
#[derive(Debug, Clone)]
pub struct OpenAiHttpTransport {
    http: Client,
    env: ServerEnv,
}

impl OpenAiHttpTransport {
    pub fn new(config: &HttpConfig, env: ServerEnv) -> Result<Self, LlmError> {
        Ok(Self {
            http: config.build_client()?,
            env,
        })
    }

    /// Use a preconfigured client.
    pub fn with_client(http: Client, env: ServerEnv) -> Self {
        Self { http, env }
    }

    pub fn server_env(&self) -> &ServerEnv {
        &self.env
    }

    fn resolve(&self, access: &OpenAiAccess) -> ResolvedAccess {
        ResolvedAccess::resolve(access, &self.env)
    }

    async fn post_chat(
        &self,
        resolved: &ResolvedAccess,
        request: &ChatGenerateRequest<OpenAiAccess>,
        stream: bool,
    ) -> Result<reqwest::Response, LlmError> {
        let body = WireChatRequest {
            model: &request.model.id,
            messages: &request.history,
            temperature: request.model.temperature,
            max_tokens: request.model.max_tokens,
            n: 1,
            stream,
            functions: request.functions.as_deref(),
            function_call: request
                .force_function_name
                .as_deref()
                .map(|name| WireFunctionCallChoice { name }),
        };

        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(
            request_id = %request_id,
            model = %request.model.id,
            endpoint = CHAT_COMPLETIONS_PATH,
            stream,
            "sending chat request"
        );

        let response = self
            .http
            .post(resolved.url(CHAT_COMPLETIONS_PATH))
            .headers(resolved.headers()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(
                request_id = %request_id,
                status = status.as_u16(),
                "chat request failed"
            );
            return Err(classify_http_error("openai", status.as_u16(), &body));
        }
        Ok(response)
    }

    /// Run the moderation check when the access record asks for it.
    async fn moderate(
        &self,
        access: &OpenAiAccess,
        resolved: &ResolvedAccess,
        request: &ChatGenerateRequest<OpenAiAccess>,
    ) -> Result<Option<String>, LlmError> {
        if !access.moderation_check {
            return Ok(None);
        }
        match request.last_user_message() {
            Some(input) => moderation::check(&self.http, resolved, input).await,
            None => Ok(None),
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, LlmError> {
    let text = response.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| LlmError::ParseError(format!("Failed to parse OpenAI response: {e}")))
}

fn to_output(response: WireChatResponse) -> Result<ChatGenerateOutput, LlmError> {
    let choice =
        response.choices.into_iter().next().ok_or_else(|| {
            LlmError::ParseError("OpenAI response contained no choices".to_string())
        })?;

    if let Some(call) = choice.message.function_call {
        let function_arguments = serde_json::from_str(&call.arguments).map_err(|e| {
            LlmError::ParseError(format!(
                "Invalid arguments for function '{}': {e}",
                call.name
            ))
        })?;
        return Ok(ChatGenerateOutput::FunctionCall {
            function_name: call.name,
            function_arguments,
        });
    }

    Ok(ChatGenerateOutput::assistant(
        choice.message.content.unwrap_or_default(),
        choice.finish_reason,
    ))
}

/// Keep chat models on OpenAI's own origins; sort and dedup.
fn to_model_list(response: WireModelsResponse, openai_origin: bool) -> ModelList {
    let mut models: Vec<ModelInfo> = response
        .data
        .into_iter()
        .filter(|m| !openai_origin || m.id.contains("gpt"))
        .map(|m| {
            let mut info = ModelInfo::new(m.id);
            if let Some(created) = m.created {
                info = info.with_created_unix(created);
            }
            if let Some(owner) = m.owned_by {
                info = info.with_owned_by(owner);
            }
            info
        })
        .collect();
    models.sort_by(|a, b| a.id.cmp(&b.id));
    models.dedup_by(|a, b| a.id == b.id);
    ModelList::new(models)
}

#[async_trait]
impl Transport<OpenAiAccess> for OpenAiHttpTransport {
    async fn list_models(&self, access: &OpenAiAccess) -> Result<ModelList, LlmError> {
        let resolved = self.resolve(access);
        tracing::debug!(endpoint = MODELS_PATH, origin = %resolved.origin, "listing models");

        let response = self
            .http
            .get(resolved.url(MODELS_PATH))
            .headers(resolved.headers()?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_error("openai", status.as_u16(), &body));
        }

        let parsed: WireModelsResponse = read_json(response).await?;
        Ok(to_model_list(parsed, resolved.is_openai_origin()))
    }

    async fn chat_generate_with_functions(
        &self,
        request: &ChatGenerateRequest<OpenAiAccess>,
    ) -> Result<ChatGenerateOutput, TransportFailure> {
        let resolved = self.resolve(&request.access);

        if let Some(reply) = self.moderate(&request.access, &resolved, request).await? {
            return Ok(ChatGenerateOutput::assistant(
                reply,
                Some(MODERATION_FINISH_REASON.to_string()),
            ));
        }

        let response = self.post_chat(&resolved, request, false).await?;
        let parsed: WireChatResponse = read_json(response).await?;
        if let Some(model) = &parsed.model {
            tracing::debug!(model = %model, "chat response received");
        }
        Ok(to_output(parsed)?)
    }

    async fn chat_stream(
        &self,
        request: ChatGenerateRequest<OpenAiAccess>,
    ) -> Result<ChatStream, LlmError> {
        let resolved = self.resolve(&request.access);

        if let Some(reply) = self.moderate(&request.access, &resolved, &request).await? {
            return Ok(streaming::canned_stream(reply, MODERATION_FINISH_REASON));
        }

        let response = self.post_chat(&resolved, &request, true).await?;
        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| LlmError::HttpError(format!("Stream error: {e}"))));
        Ok(streaming::sse_to_chat_stream(bytes))
    }
}
