//! Resolution of an access record into an origin and request headers.
//!
//! Values missing from the access record fall back to the server
//! environment: `OPENAI_API_KEY`, `OPENAI_API_ORG_ID`, `OPENAI_API_HOST` and
//! `HELICONE_API_KEY`.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::defaults::openai as endpoints;
use crate::error::LlmError;
use crate::types::OpenAiAccess;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_ORG_ID: &str = "OPENAI_API_ORG_ID";
pub const ENV_HOST: &str = "OPENAI_API_HOST";
pub const ENV_HELICONE_KEY: &str = "HELICONE_API_KEY";

/// Server-side fallbacks for fields a client left empty.
#[derive(Debug, Clone, Default)]
pub struct ServerEnv {
    pub api_key: Option<SecretString>,
    pub organization_id: Option<String>,
    pub host: Option<String>,
    pub proxy_key: Option<SecretString>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ServerEnv {
    /// Read the fallbacks from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the fallbacks through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_key: non_empty(lookup(ENV_API_KEY)).map(SecretString::from),
            organization_id: non_empty(lookup(ENV_ORG_ID)),
            host: non_empty(lookup(ENV_HOST)),
            proxy_key: non_empty(lookup(ENV_HELICONE_KEY)).map(SecretString::from),
        }
    }
}

/// Access record merged with the server environment, ready for requests.
#[derive(Debug, Clone)]
pub struct ResolvedAccess {
    pub origin: String,
    pub api_key: Option<SecretString>,
    pub organization_id: Option<String>,
    pub proxy_key: Option<SecretString>,
}

fn normalize_origin(host: &str) -> String {
    let host = host.trim();
    let with_scheme = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    };
    with_scheme.trim_end_matches('/').to_string()
}

fn pick_secret(client: &str, server: &Option<SecretString>) -> Option<SecretString> {
    if client.is_empty() {
        server.clone()
    } else {
        Some(SecretString::from(client.to_string()))
    }
}

impl ResolvedAccess {
    pub fn resolve(access: &OpenAiAccess, env: &ServerEnv) -> Self {
        let proxy_key = pick_secret(&access.proxy_key, &env.proxy_key);

        let host = if !access.host.is_empty() {
            Some(access.host.as_str())
        } else {
            env.host.as_deref()
        };
        let origin = match host {
            Some(h) => normalize_origin(h),
            None if proxy_key.is_some() => endpoints::HELICONE_ORIGIN.to_string(),
            None => endpoints::DEFAULT_ORIGIN.to_string(),
        };

        let organization_id = if access.organization_id.is_empty() {
            env.organization_id.clone()
        } else {
            Some(access.organization_id.clone())
        };

        Self {
            origin,
            api_key: pick_secret(&access.api_key, &env.api_key),
            organization_id,
            proxy_key,
        }
    }

    /// Whether requests go to OpenAI itself (directly or through Helicone).
    pub fn is_openai_origin(&self) -> bool {
        self.origin == endpoints::DEFAULT_ORIGIN || self.origin == endpoints::HELICONE_ORIGIN
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    /// Build the request headers.
    ///
    /// A key is mandatory for OpenAI's own origins; custom hosts may run
    /// without one.
    pub fn headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match &self.api_key {
            Some(key) => {
                headers.insert(AUTHORIZATION, bearer(key)?);
            }
            None if self.is_openai_origin() => {
                return Err(LlmError::MissingApiKey(
                    "OpenAI API key not provided".to_string(),
                ));
            }
            None => {}
        }

        if let Some(org) = &self.organization_id {
            let value = HeaderValue::from_str(org).map_err(|e| {
                LlmError::ConfigurationError(format!("Invalid organization id: {e}"))
            })?;
            headers.insert(HeaderName::from_static("openai-organization"), value);
        }

        if let Some(key) = &self.proxy_key {
            headers.insert(HeaderName::from_static("helicone-auth"), bearer(key)?);
        }

        Ok(headers)
    }
}

fn bearer(secret: &SecretString) -> Result<HeaderValue, LlmError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", secret.expose_secret()))
        .map_err(|e| LlmError::ConfigurationError(format!("Invalid credential: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}
