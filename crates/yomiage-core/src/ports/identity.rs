//! Identity lookup port (sender id → profile).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::UserProfile;

/// Errors from the identity lookup. Never fatal to a run.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// The lookup service answered with an error.
    #[error("identity lookup failed: {0}")]
    Lookup(String),

    /// The lookup could not be issued or did not complete.
    #[error("identity lookup unavailable: {0}")]
    Unavailable(String),
}

/// Resolves a sender id to a profile.
///
/// Implemented by the Slack web client (`users.info`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn lookup_user(&self, user_id: &str) -> Result<UserProfile, IdentityError>;
}
