//! Access records: how to reach an OpenAI-compatible endpoint.
//!
//! `OpenAiAccess` is the fully-populated record handed to transports.
//! `OpenAiSetup` is the partial form persisted in user settings; any subset of
//! its fields may be present. Serialized keys match the persisted settings
//! and must stay stable.

use serde::{Deserialize, Serialize};

/// Wire dialect tag carried inside an access record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
}

impl Dialect {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully-populated access record.
///
/// Empty strings mean "unset"; they are never replaced by `None`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiAccess {
    pub dialect: Dialect,
    /// API key.
    #[serde(rename = "oaiKey")]
    pub api_key: String,
    /// Organization id; empty means the key's default organization.
    #[serde(rename = "oaiOrg")]
    pub organization_id: String,
    /// Full origin of an OpenAI-compatible host; empty means the default origin.
    #[serde(rename = "oaiHost")]
    pub host: String,
    /// Helicone proxy key.
    #[serde(rename = "heliKey")]
    pub proxy_key: String,
    /// Screen the last user message with the moderation endpoint first.
    #[serde(rename = "moderationCheck")]
    pub moderation_check: bool,
}

impl OpenAiAccess {
    /// Complete a partial record: defaults first, then every present field
    /// of `setup` wins, field by field.
    pub fn from_partial(setup: &OpenAiSetup) -> Self {
        let mut access = Self::default();
        if let Some(v) = &setup.api_key {
            access.api_key = v.clone();
        }
        if let Some(v) = &setup.organization_id {
            access.organization_id = v.clone();
        }
        if let Some(v) = &setup.host {
            access.host = v.clone();
        }
        if let Some(v) = &setup.proxy_key {
            access.proxy_key = v.clone();
        }
        if let Some(v) = setup.moderation_check {
            access.moderation_check = v;
        }
        access
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "" } else { "***" }
}

impl std::fmt::Debug for OpenAiAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAccess")
            .field("dialect", &self.dialect)
            .field("api_key", &redact(&self.api_key))
            .field("organization_id", &self.organization_id)
            .field("host", &self.host)
            .field("proxy_key", &redact(&self.proxy_key))
            .field("moderation_check", &self.moderation_check)
            .finish()
    }
}

/// Partial access record as stored in user settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSetup {
    #[serde(rename = "oaiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(rename = "oaiOrg", skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(rename = "oaiHost", skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(rename = "heliKey", skip_serializing_if = "Option::is_none")]
    pub proxy_key: Option<String>,
    #[serde(rename = "moderationCheck", skip_serializing_if = "Option::is_none")]
    pub moderation_check: Option<bool>,
}

impl OpenAiSetup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_organization_id(mut self, org: impl Into<String>) -> Self {
        self.organization_id = Some(org.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_proxy_key(mut self, key: impl Into<String>) -> Self {
        self.proxy_key = Some(key.into());
        self
    }

    pub fn with_moderation_check(mut self, enabled: bool) -> Self {
        self.moderation_check = Some(enabled);
        self
    }
}
