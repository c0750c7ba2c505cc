//! Failure vocabulary for hook calls.
//!
//! Policy modules return [`HookError`] from their decision functions; the
//! runtime adds [`HookError::Panicked`] and [`HookError::Overran`] itself when
//! a call unwinds or blows its time budget. No variant ever reaches the host
//! engine: gates report them and fail open.

use std::time::Duration;

use thiserror::Error;

pub type HookResult<T> = std::result::Result<T, HookError>;

#[derive(Debug, Error)]
pub enum HookError {
    /// The policy module refused to answer, with its own explanation.
    #[error("hook failed: {0}")]
    Failed(String),

    /// A dependency of the policy module (storage, lookup) is not ready.
    #[error("hook backend unavailable: {0}")]
    Unavailable(String),

    /// The decision function panicked.
    #[error("hook panicked: {0}")]
    Panicked(String),

    /// The decision function answered after its budget ran out.
    #[error("hook answered in {elapsed:?}, over the {budget:?} budget")]
    Overran { elapsed: Duration, budget: Duration },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HookError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Builds a [`HookError::Panicked`] from a `catch_unwind` payload.
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked(message)
    }
}
