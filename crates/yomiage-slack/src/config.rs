//! Public configuration for the Slack clients.

use std::time::Duration;

use yomiage_core::settings::{DEFAULT_HTTP_TIMEOUT, Secret, SlackCredentials};

/// Default Web API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api/";

/// Configuration for the Slack Web API and Socket Mode clients.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Bot token (`xoxb-…`) for Web API calls
    pub(crate) bot_token: Secret,
    /// App-level token (`xapp-…`) for `apps.connections.open`
    pub(crate) app_level_token: Secret,
    pub(crate) api_base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) user_agent: String,
}

impl SlackConfig {
    #[must_use]
    pub fn new(bot_token: Secret, app_level_token: Secret) -> Self {
        Self {
            bot_token,
            app_level_token,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
            user_agent: concat!("yomiage-slack/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    #[must_use]
    pub fn from_credentials(credentials: &SlackCredentials) -> Self {
        Self::new(
            credentials.bot_token.clone(),
            credentials.app_level_token.clone(),
        )
    }

    /// Set the Web API base URL. Defaults to `https://slack.com/api/`.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the per-request timeout. Defaults to 15 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
