//! Message annotation port (visible "speaking" indicator).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::MessageRef;

/// Annotation failures are logged and ignored by callers.
#[derive(Debug, Clone, Error)]
#[error("failed to {action} marker ':{name}:': {message}")]
pub struct AnnotationError {
    /// `"add"` or `"remove"`.
    pub action: &'static str,
    pub name: String,
    pub message: String,
}

/// Adds and removes a named marker on a message.
///
/// Implemented by the Slack web client (`reactions.add` / `reactions.remove`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageAnnotator: Send + Sync {
    async fn add_marker(&self, target: &MessageRef, name: &str) -> Result<(), AnnotationError>;

    async fn remove_marker(&self, target: &MessageRef, name: &str)
    -> Result<(), AnnotationError>;
}
