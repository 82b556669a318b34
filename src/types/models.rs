//! Model information returned by model discovery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One model offered by a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model ID
    pub id: String,
    /// Creation time reported by the provider
    pub created: Option<DateTime<Utc>>,
    /// Model owner/organization
    pub owned_by: String,
    /// Context window size, when known
    pub context_window: Option<u32>,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created: None,
            owned_by: String::new(),
            context_window: None,
        }
    }

    /// Set the creation time from unix seconds; out-of-range values are dropped.
    pub fn with_created_unix(mut self, secs: i64) -> Self {
        self.created = DateTime::from_timestamp(secs, 0);
        self
    }

    pub fn with_owned_by(mut self, owner: impl Into<String>) -> Self {
        self.owned_by = owner.into();
        self
    }
}

/// Decoded result of one list-models request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelList {
    pub models: Vec<ModelInfo>,
}

impl ModelList {
    pub fn new(models: Vec<ModelInfo>) -> Self {
        Self { models }
    }

    pub fn ids(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.id.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
