//! Backend capability flags.
//!
//! The server decides which vendors it can back. Flags are atomics so that a
//! vendor's visibility always reflects the current value.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::transport::openai::access::ENV_API_KEY;

/// Which vendor backends the server currently supports.
#[derive(Debug, Default)]
pub struct BackendCapabilities {
    has_llm_openai: AtomicBool,
}

impl BackendCapabilities {
    pub fn new(has_llm_openai: bool) -> Self {
        Self {
            has_llm_openai: AtomicBool::new(has_llm_openai),
        }
    }

    /// Derive the flags from the process environment.
    pub fn from_env() -> Self {
        Self::from_env_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_env_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let has_key = lookup(ENV_API_KEY).is_some_and(|v| !v.trim().is_empty());
        Self::new(has_key)
    }

    pub fn has_llm_openai(&self) -> bool {
        self.has_llm_openai.load(Ordering::Acquire)
    }

    pub fn set_has_llm_openai(&self, value: bool) {
        self.has_llm_openai.store(value, Ordering::Release);
    }
}

static BACKEND_CAPS: OnceLock<Arc<BackendCapabilities>> = OnceLock::new();

/// Process-wide capability flags, initialized from the environment.
pub fn backend_caps() -> Arc<BackendCapabilities> {
    BACKEND_CAPS
        .get_or_init(|| Arc::new(BackendCapabilities::from_env()))
        .clone()
}
