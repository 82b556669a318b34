//! Chat messages, callable function specs and generation results.

use serde::{Deserialize, Serialize};

use super::options::ResolvedModel;
use crate::error::LlmError;

/// Message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Function,
}

/// One message of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Function name, for `Role::Function` results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Result of a function the model asked to call.
    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Function,
            content: content.into(),
            name: Some(name.into()),
        }
    }
}

/// Callable function the model may invoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: serde_json::Value,
}

impl FunctionSpec {
    pub fn new(name: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Normalized result of a synchronous generation: either text or a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatGenerateOutput {
    Message {
        role: Role,
        content: String,
        finish_reason: Option<String>,
    },
    FunctionCall {
        function_name: String,
        function_arguments: serde_json::Value,
    },
}

impl ChatGenerateOutput {
    pub fn assistant(content: impl Into<String>, finish_reason: Option<String>) -> Self {
        Self::Message {
            role: Role::Assistant,
            content: content.into(),
            finish_reason,
        }
    }

    /// Message text, when this is a plain message.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Message { content, .. } => Some(content.as_str()),
            Self::FunctionCall { .. } => None,
        }
    }

    pub fn is_function_call(&self) -> bool {
        matches!(self, Self::FunctionCall { .. })
    }
}

/// Arguments of one generation call, shared by the synchronous and the
/// streaming paths.
#[derive(Debug, Clone)]
pub struct ChatGenerateRequest<A> {
    pub access: A,
    pub model: ResolvedModel,
    pub functions: Option<Vec<FunctionSpec>>,
    pub force_function_name: Option<String>,
    pub history: Vec<ChatMessage>,
}

impl<A> ChatGenerateRequest<A> {
    pub fn new(access: A, model: ResolvedModel, history: Vec<ChatMessage>) -> Self {
        Self {
            access,
            model,
            functions: None,
            force_function_name: None,
            history,
        }
    }

    pub fn with_functions(mut self, functions: Option<Vec<FunctionSpec>>) -> Self {
        self.functions = functions;
        self
    }

    pub fn with_force_function_name(mut self, name: Option<String>) -> Self {
        self.force_function_name = name;
        self
    }

    /// A forced function name must refer to one of the supplied functions.
    pub fn validate_forced_function(&self) -> Result<(), LlmError> {
        let Some(forced) = &self.force_function_name else {
            return Ok(());
        };
        let known = self
            .functions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|f| &f.name == forced);
        if known {
            Ok(())
        } else {
            Err(LlmError::ConfigurationError(format!(
                "forced function '{forced}' is not among the supplied functions"
            )))
        }
    }

    /// Content of the most recent user message.
    pub fn last_user_message(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::options::{OpenAiLlmOptions, ResolvedModel};
    use serde_json::json;

    fn request(history: Vec<ChatMessage>) -> ChatGenerateRequest<()> {
        ChatGenerateRequest::new(
            (),
            ResolvedModel::resolve(&OpenAiLlmOptions::new("gpt-x"), None),
            history,
        )
    }

    #[test]
    fn forced_function_must_be_supplied() {
        let weather = FunctionSpec::new("get_weather", json!({ "type": "object" }));
        let ok = request(vec![])
            .with_functions(Some(vec![weather.clone()]))
            .with_force_function_name(Some("get_weather".into()));
        assert!(ok.validate_forced_function().is_ok());

        let unknown = request(vec![])
            .with_functions(Some(vec![weather]))
            .with_force_function_name(Some("get_time".into()));
        assert!(matches!(
            unknown.validate_forced_function(),
            Err(LlmError::ConfigurationError(_))
        ));

        let no_functions = request(vec![]).with_force_function_name(Some("x".into()));
        assert!(no_functions.validate_forced_function().is_err());
    }

    #[test]
    fn last_user_message_skips_other_roles() {
        let req = request(vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("first"),
            ChatMessage::assistant("ok"),
            ChatMessage::user("second"),
            ChatMessage::assistant("sure"),
        ]);
        assert_eq!(req.last_user_message(), Some("second"));
    }

    #[test]
    fn output_serializes_untagged() {
        let call = ChatGenerateOutput::FunctionCall {
            function_name: "f".into(),
            function_arguments: json!({ "a": 1 }),
        };
        assert_eq!(
            serde_json::to_value(&call).unwrap(),
            json!({ "function_name": "f", "function_arguments": { "a": 1 } })
        );
        let msg = ChatGenerateOutput::assistant("hi", Some("stop".into()));
        assert_eq!(serde_json::to_value(&msg).unwrap()["role"], "assistant");
        assert_eq!(msg.text(), Some("hi"));
        assert!(!msg.is_function_call());
    }

    #[test]
    fn function_message_carries_name() {
        let value = serde_json::to_value(ChatMessage::function("f", "{}")).unwrap();
        assert_eq!(
            value,
            json!({ "role": "function", "content": "{}", "name": "f" })
        );
    }
}
