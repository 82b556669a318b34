//! Data types shared by vendors, transports and callers.

pub mod access;
pub mod chat;
pub mod http;
pub mod models;
pub mod options;

pub use access::{Dialect, OpenAiAccess, OpenAiSetup};
pub use chat::{ChatGenerateOutput, ChatGenerateRequest, ChatMessage, FunctionSpec, Role};
pub use http::{HttpConfig, HttpConfigBuilder};
pub use models::{ModelInfo, ModelList};
pub use options::{OpenAiLlmOptions, ResolvedModel};
