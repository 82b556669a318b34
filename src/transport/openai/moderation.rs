//! Pre-flight moderation of the user's latest message.

use reqwest::Client;

use super::access::ResolvedAccess;
use super::errors::classify_http_error;
use super::wire::{WireModerationRequest, WireModerationResponse};
use crate::defaults::openai::MODERATIONS_PATH;
use crate::error::LlmError;

pub const MODERATION_FINISH_REASON: &str = "moderation";

/// Reply sent instead of a completion when the input is flagged.
pub fn moderation_reply(categories: &[&str]) -> String {
    let listed = if categories.is_empty() {
        "unspecified".to_string()
    } else {
        categories.join(", ")
    };
    format!(
        "[Moderation] I am unable to provide a response to your query as it violated the \
         following categories of the OpenAI usage policies: {listed}.\n\
         For further explanation please visit https://platform.openai.com/docs/guides/moderation/moderation"
    )
}

/// Check `input`; returns the reply to send back when it is flagged.
pub async fn check(
    http: &Client,
    access: &ResolvedAccess,
    input: &str,
) -> Result<Option<String>, LlmError> {
    let response = http
        .post(access.url(MODERATIONS_PATH))
        .headers(access.headers()?)
        .json(&WireModerationRequest { input })
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_http_error("openai", status.as_u16(), &body));
    }

    let parsed: WireModerationResponse = response
        .json()
        .await
        .map_err(|e| LlmError::ParseError(format!("Invalid moderation response: {e}")))?;

    let Some(result) = parsed.results.first() else {
        return Ok(None);
    };
    if !result.flagged {
        return Ok(None);
    }

    let categories = result.flagged_categories();
    tracing::warn!(categories = ?categories, "input flagged by moderation");
    Ok(Some(moderation_reply(&categories)))
}
