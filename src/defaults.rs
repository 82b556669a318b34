//! Default values shared across vendors and transports.

/// Generation parameter defaults.
pub mod generation {
    /// Sampling temperature when the options leave it unset.
    pub const TEMPERATURE: f32 = 0.5;
    /// Token budget when neither the call site nor the options set one.
    pub const MAX_RESPONSE_TOKENS: u32 = 1024;
}

/// OpenAI dialect endpoints.
pub mod openai {
    pub const DEFAULT_ORIGIN: &str = "https://api.openai.com";
    /// Helicone proxy origin, used when only a proxy key is configured.
    pub const HELICONE_ORIGIN: &str = "https://oai.hconeai.com";
    pub const MODELS_PATH: &str = "/v1/models";
    pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
    pub const MODERATIONS_PATH: &str = "/v1/moderations";
}

/// HTTP transport defaults.
pub mod http {
    use std::time::Duration;

    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const USER_AGENT: &str = concat!("llm-vendors/", env!("CARGO_PKG_VERSION"));
}
