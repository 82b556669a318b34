//! Model discovery query.
//!
//! A [`ModelsQuery`] wraps one list-models call together with its caching
//! policy and observers. It is owned by the caller; state changes are
//! broadcast over a `tokio::sync::watch` channel.

use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::LlmError;
use crate::types::ModelList;

/// Performs the list-models request.
pub type ModelsFetcher =
    Arc<dyn Fn() -> BoxFuture<'static, Result<ModelList, LlmError>> + Send + Sync>;

/// Called with the decoded list after each successful fetch.
pub type SuccessCallback = Box<dyn FnMut(&ModelList) + Send>;

/// When a query may run and how long its data stays fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    pub enabled: bool,
    pub refetch_on_window_focus: bool,
    /// `None` keeps data fresh until invalidated.
    pub stale_time: Option<Duration>,
}

impl QueryPolicy {
    /// Fetch only when enabled, never on focus, never stale.
    pub fn manual(enabled: bool) -> Self {
        Self {
            enabled,
            refetch_on_window_focus: false,
            stale_time: None,
        }
    }
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self::manual(true)
    }
}

#[derive(Debug, Clone)]
pub enum QueryState {
    Idle,
    Loading,
    Success(ModelList),
    Error(LlmError),
}

impl QueryState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

pub struct ModelsQuery {
    key: String,
    policy: QueryPolicy,
    fetcher: ModelsFetcher,
    observers: Vec<SuccessCallback>,
    state: watch::Sender<QueryState>,
    fetched_at: Option<Instant>,
    invalidated: bool,
}

impl fmt::Debug for ModelsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelsQuery")
            .field("key", &self.key)
            .field("policy", &self.policy)
            .field("observers", &self.observers.len())
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl ModelsQuery {
    pub fn new(key: impl Into<String>, policy: QueryPolicy, fetcher: ModelsFetcher) -> Self {
        let (state, _) = watch::channel(QueryState::Idle);
        Self {
            key: key.into(),
            policy,
            fetcher,
            observers: Vec::new(),
            state,
            fetched_at: None,
            invalidated: false,
        }
    }

    /// Register a success observer.
    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&ModelList) + Send + 'static,
    {
        self.add_observer(callback);
        self
    }

    pub fn add_observer<F>(&mut self, callback: F)
    where
        F: FnMut(&ModelList) + Send + 'static,
    {
        self.observers.push(Box::new(callback));
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn policy(&self) -> QueryPolicy {
        self.policy
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> QueryState {
        self.state.borrow().clone()
    }

    /// Last successfully fetched list, if the current state holds one.
    pub fn data(&self) -> Option<ModelList> {
        match &*self.state.borrow() {
            QueryState::Success(list) => Some(list.clone()),
            _ => None,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.policy.enabled = enabled;
    }

    /// Mark cached data stale; the next `fetch` goes to the network.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    pub fn is_stale(&self) -> bool {
        if self.invalidated {
            return true;
        }
        match (self.fetched_at, self.policy.stale_time) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(at), Some(ttl)) => at.elapsed() >= ttl,
        }
    }

    /// Fetch the model list, honoring the policy.
    ///
    /// Returns `Ok(None)` without a request while disabled and the cached
    /// list while it is fresh. Errors are returned as the transport produced
    /// them and never reach the success observers.
    pub async fn fetch(&mut self) -> Result<Option<ModelList>, LlmError> {
        if !self.policy.enabled {
            tracing::trace!(key = %self.key, "query disabled; skipping fetch");
            return Ok(None);
        }
        if !self.is_stale() {
            if let Some(cached) = self.data() {
                return Ok(Some(cached));
            }
        }

        self.state.send_replace(QueryState::Loading);
        match (self.fetcher)().await {
            Ok(list) => {
                self.fetched_at = Some(Instant::now());
                self.invalidated = false;
                self.state.send_replace(QueryState::Success(list.clone()));
                for observer in self.observers.iter_mut() {
                    observer(&list);
                }
                tracing::debug!(key = %self.key, models = list.models.len(), "models fetched");
                Ok(Some(list))
            }
            Err(e) => {
                tracing::debug!(key = %self.key, error = %e, "models fetch failed");
                self.state.send_replace(QueryState::Error(e.clone()));
                Err(e)
            }
        }
    }

    /// Window focus notification. Refetches only if the policy asks for it.
    pub async fn window_focused(&mut self) -> Result<Option<ModelList>, LlmError> {
        if !self.policy.refetch_on_window_focus {
            return Ok(None);
        }
        self.invalidate();
        self.fetch().await
    }
}
