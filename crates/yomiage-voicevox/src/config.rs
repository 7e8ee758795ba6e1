//! Public configuration for the VOICEVOX client.

use std::time::Duration;

use yomiage_core::settings::{DEFAULT_HTTP_TIMEOUT, VoicevoxSettings};

/// Configuration for the VOICEVOX client.
///
/// # Example
///
/// ```
/// use yomiage_voicevox::VoicevoxConfig;
/// use std::time::Duration;
///
/// let config = VoicevoxConfig::new("http://127.0.0.1:50021", "3")
///     .with_timeout(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct VoicevoxConfig {
    /// Engine base URL, e.g. `http://127.0.0.1:50021`
    pub(crate) endpoint: String,
    /// Speaker (style) id passed as the `speaker` query parameter
    pub(crate) speaker_id: String,
    /// Per-request timeout
    pub(crate) timeout: Duration,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
}

impl VoicevoxConfig {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, speaker_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            speaker_id: speaker_id.into(),
            timeout: DEFAULT_HTTP_TIMEOUT,
            user_agent: concat!("yomiage-voicevox/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Build from the `VOICEVOX_*` settings.
    #[must_use]
    pub fn from_settings(settings: &VoicevoxSettings) -> Self {
        Self::new(settings.endpoint.clone(), settings.speaker_id.clone())
    }

    /// Set the per-request timeout.
    ///
    /// Defaults to 15 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn speaker_id(&self) -> &str {
        &self.speaker_id
    }
}
