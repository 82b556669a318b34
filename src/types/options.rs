//! Per-model generation options and their resolution.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::defaults::generation;

/// Generation options of one configured OpenAI model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OpenAiLlmOptions {
    /// Provider model id; must not be empty.
    #[serde(rename = "llmRef")]
    #[validate(length(min = 1, message = "model reference must not be empty"))]
    pub model_ref: String,
    #[serde(
        rename = "llmTemperature",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = 0.0, max = 2.0), custom(function = "finite_temperature"))]
    pub temperature: Option<f32>,
    #[serde(
        rename = "llmResponseTokens",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = 1))]
    pub response_tokens: Option<u32>,
}

fn finite_temperature(temperature: f32) -> Result<(), ValidationError> {
    if temperature.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("temperature_not_finite"))
    }
}

impl OpenAiLlmOptions {
    pub fn new(model_ref: impl Into<String>) -> Self {
        Self {
            model_ref: model_ref.into(),
            temperature: None,
            response_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_response_tokens(mut self, tokens: u32) -> Self {
        self.response_tokens = Some(tokens);
        self
    }
}

/// Effective model parameters sent with a generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedModel {
    pub id: String,
    pub temperature: f32,
    #[serde(rename = "maxTokens")]
    pub max_tokens: u32,
}

impl ResolvedModel {
    /// Apply the defaulting rules: the call-site token override wins over the
    /// options, then the fixed fallbacks apply. A zero budget counts as unset.
    pub fn resolve(options: &OpenAiLlmOptions, max_tokens_override: Option<u32>) -> Self {
        Self {
            id: options.model_ref.clone(),
            temperature: options.temperature.unwrap_or(generation::TEMPERATURE),
            max_tokens: max_tokens_override
                .filter(|&n| n > 0)
                .or(options.response_tokens.filter(|&n| n > 0))
                .unwrap_or(generation::MAX_RESPONSE_TOKENS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_use_fallbacks() {
        let resolved = ResolvedModel::resolve(&OpenAiLlmOptions::new("gpt-x"), None);
        assert_eq!(resolved.id, "gpt-x");
        assert_eq!(resolved.temperature, 0.5);
        assert_eq!(resolved.max_tokens, 1024);
    }

    #[test]
    fn override_beats_options() {
        let options = OpenAiLlmOptions::new("gpt-x").with_response_tokens(256);
        assert_eq!(ResolvedModel::resolve(&options, None).max_tokens, 256);
        assert_eq!(ResolvedModel::resolve(&options, Some(64)).max_tokens, 64);
    }

    #[test]
    fn zero_override_falls_through() {
        let options = OpenAiLlmOptions::new("gpt-x").with_response_tokens(512);
        assert_eq!(ResolvedModel::resolve(&options, Some(0)).max_tokens, 512);
        let bare = OpenAiLlmOptions::new("gpt-x");
        assert_eq!(ResolvedModel::resolve(&bare, Some(0)).max_tokens, 1024);
    }

    #[test]
    fn explicit_temperature_is_kept() {
        let options = OpenAiLlmOptions::new("gpt-x").with_temperature(0.0);
        assert_eq!(ResolvedModel::resolve(&options, None).temperature, 0.0);
    }

    #[test]
    fn validation_rejects_empty_ref_and_out_of_range() {
        assert!(OpenAiLlmOptions::new("").validate().is_err());
        assert!(
            OpenAiLlmOptions::new("gpt-x")
                .with_temperature(3.5)
                .validate()
                .is_err()
        );
        assert!(
            OpenAiLlmOptions::new("gpt-x")
                .with_response_tokens(0)
                .validate()
                .is_err()
        );
        assert!(OpenAiLlmOptions::new("gpt-x").validate().is_ok());
    }

    #[test]
    fn validation_rejects_non_finite_temperature() {
        for t in [f32::NAN, f32::INFINITY] {
            assert!(
                OpenAiLlmOptions::new("gpt-x")
                    .with_temperature(t)
                    .validate()
                    .is_err()
            );
        }
    }
}
