//! CLI-specific error types.
//!
//! Each variant maps to a sysexits-style process exit code so supervisors
//! can tell a misconfiguration from an outage.

use thiserror::Error;
use yomiage_core::{AudioError, SettingsError};
use yomiage_slack::{RouterError, SlackError};
use yomiage_voicevox::VoicevoxError;

/// Errors that end the process.
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Slack rejected the bot token.
    #[error("Slack authentication failed: {0}")]
    Auth(String),

    /// A remote service could not be reached.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The audio output device could not be opened.
    #[error("Audio device error: {0}")]
    Audio(String),

    /// The Socket Mode connection ended for good.
    #[error("Slack connection closed: {0}")]
    Transport(String),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// - 78 (`EX_CONFIG`): configuration
    /// - 69 (`EX_UNAVAILABLE`): authentication, remote services, transport
    /// - 71 (`EX_OSERR`): audio device
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,
            Self::Auth(_) | Self::Unavailable(_) | Self::Transport(_) => 69,
            Self::Audio(_) => 71,
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<AudioError> for CliError {
    fn from(err: AudioError) -> Self {
        Self::Audio(err.to_string())
    }
}

impl From<RouterError> for CliError {
    fn from(err: RouterError) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<VoicevoxError> for CliError {
    fn from(err: VoicevoxError) -> Self {
        match err {
            VoicevoxError::InvalidUrl(e) => Self::Config(format!("invalid VOICEVOX endpoint: {e}")),
            other => Self::Unavailable(format!("VOICEVOX: {other}")),
        }
    }
}

impl From<SlackError> for CliError {
    fn from(err: SlackError) -> Self {
        match err {
            SlackError::InvalidUrl(e) => Self::Config(format!("invalid Slack API URL: {e}")),
            SlackError::Api { code, .. } => Self::Auth(code),
            other => Self::Unavailable(format!("Slack: {other}")),
        }
    }
}
