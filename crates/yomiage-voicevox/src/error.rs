//! Internal error types for VOICEVOX requests.
//!
//! Mapped to [`yomiage_core::SynthesisError`] at the port boundary.

use thiserror::Error;

/// Result type alias for VOICEVOX operations.
pub type VoicevoxResult<T> = Result<T, VoicevoxError>;

/// Errors from the VOICEVOX engine or the HTTP layer beneath it.
#[derive(Debug, Error)]
pub enum VoicevoxError {
    /// The engine answered with something other than 200.
    #[error("VOICEVOX request failed with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, lossily decoded
        body: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured endpoint is not a usable base URL.
    #[error("Invalid VOICEVOX endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A 200 response whose body could not be interpreted.
    #[error("Invalid response from VOICEVOX: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },
}
