//! Error types.

use std::fmt;

use thiserror::Error;

use crate::events::{EventKind, SubscriptionToken};
use crate::model::WindowId;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("window {0} already has an active message hook")]
    AlreadyAttached(WindowId),
    #[error("window {0} is not a live window")]
    UnknownWindow(WindowId),
    #[error("native subclass installation refused for window {0}")]
    InstallFailed(WindowId),
    #[error("hook for window {0} has been detached")]
    Detached(WindowId),
    #[error("{} listener(s) failed during dispatch on window {window}", failures.len())]
    ListenerFailures {
        window: WindowId,
        failures: Vec<ListenerFailure>,
    },
    #[error("Config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type HookResult<T> = Result<T, HookError>;

/// Error type listeners return.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// One listener that did not complete normally during a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    pub token: SubscriptionToken,
    pub kind: EventKind,
    pub cause: FailureCause,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The listener returned `Err`.
    Error(String),
    /// The listener panicked; the panic was contained.
    Panicked(String),
}

impl fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            FailureCause::Error(msg) => {
                write!(f, "listener {} on {:?} failed: {}", self.token, self.kind, msg)
            }
            FailureCause::Panicked(msg) => {
                write!(f, "listener {} on {:?} panicked: {}", self.token, self.kind, msg)
            }
        }
    }
}
