//! OpenAI wire format (chat completions, models, moderations).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{ChatMessage, FunctionSpec};

#[derive(Debug, Serialize)]
pub struct WireChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
    pub n: u32,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<&'a [FunctionSpec]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<WireFunctionCallChoice<'a>>,
}

/// Forces the model to call the named function.
#[derive(Debug, Serialize)]
pub struct WireFunctionCallChoice<'a> {
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct WireChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
pub struct WireChoice {
    pub message: WireResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub function_call: Option<WireFunctionCall>,
}

#[derive(Debug, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    /// JSON-encoded arguments object.
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub struct WireModelsResponse {
    pub data: Vec<WireModel>,
}

#[derive(Debug, Deserialize)]
pub struct WireModel {
    pub id: String,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub owned_by: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WireModerationRequest<'a> {
    pub input: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct WireModerationResponse {
    pub results: Vec<WireModerationResult>,
}

#[derive(Debug, Deserialize)]
pub struct WireModerationResult {
    pub flagged: bool,
    #[serde(default)]
    pub categories: BTreeMap<String, bool>,
}

impl WireModerationResult {
    pub fn flagged_categories(&self) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|(_, flagged)| **flagged)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// One `data:` frame of a streaming response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WireStreamChunk {
    pub choices: Vec<WireStreamChoice>,
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WireStreamChoice {
    pub delta: WireDelta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WireDelta {
    pub content: Option<String>,
    pub function_call: Option<WireFunctionCallDelta>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WireFunctionCallDelta {
    pub name: Option<String>,
    pub arguments: Option<String>,
}
