//! Cancellation utilities
//!
//! A `CancelHandle` is the abort signal of one streaming call. Streams guarded
//! by it stop delivering chunks as soon as it fires, even while waiting on the
//! network.

use tokio_util::sync::CancellationToken;

/// A handle that can be used to request cancellation.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Guarded streams yield `LlmError::Cancelled` and
    /// drop the underlying response, which closes the HTTP connection.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once cancellation was requested.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// A handle that fires when this one fires, and can also be fired alone.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }
}

/// Create a standalone cancel handle that can be shared across tasks.
pub fn new_cancel_handle() -> CancelHandle {
    CancelHandle::new()
}
