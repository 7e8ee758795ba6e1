//! Error types for the Slack adapters.

use thiserror::Error;

/// Result type alias for Slack operations.
pub type SlackResult<T> = Result<T, SlackError>;

/// Errors from the Slack Web API or the Socket Mode connection.
#[derive(Debug, Error)]
pub enum SlackError {
    /// Slack answered `ok: false`.
    #[error("Slack API {method} failed: {code}")]
    Api {
        /// Web API method, e.g. `users.info`
        method: &'static str,
        /// Slack's error code, e.g. `user_not_found`
        code: String,
    },

    /// Non-success HTTP status (rate limits, outages).
    #[error("Slack API {method} returned HTTP {status}")]
    Status {
        method: &'static str,
        status: u16,
    },

    /// The response body did not match the expected shape.
    #[error("Invalid response from Slack API {method}: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Websocket handshake or I/O failure.
    #[error("Socket Mode connection error: {0}")]
    WebSocket(String),
}

impl SlackError {
    /// Slack's error code when the API itself rejected the call.
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}
