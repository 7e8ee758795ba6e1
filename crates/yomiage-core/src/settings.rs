//! Process-wide settings and their loading from the environment.
//!
//! [`Settings`] is built exactly once at startup, wrapped in an `Arc` and
//! shared read-only by every pipeline stage. All parsing goes through
//! [`Settings::from_lookup`] so tests can feed a map instead of mutating the
//! process environment.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Slack bot token (`xoxb-…`), used for the Web API.
pub const ENV_SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";

/// Slack app-level token (`xapp-…`), used to open Socket Mode connections.
pub const ENV_SLACK_APP_LEVEL_TOKEN: &str = "SLACK_APP_LEVEL_TOKEN";

/// Base URL of the VOICEVOX engine.
pub const ENV_VOICEVOX_ENDPOINT: &str = "VOICEVOX_ENDPOINT";

/// VOICEVOX speaker (style) id.
pub const ENV_VOICEVOX_SPEAKER_ID: &str = "VOICEVOX_SPEAKER_ID";

/// JSON array of sender ids to read out.
pub const ENV_USER_IDS: &str = "USER_IDS";

/// JSON array of channel ids to read out.
pub const ENV_CHANNEL_IDS: &str = "CHANNEL_IDS";

/// Deadline shared by identity lookup and both synthesis calls of one run.
pub const DEFAULT_RUN_DEADLINE: Duration = Duration::from_secs(20);

/// Per-request timeout of the HTTP clients.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Output rate of VOICEVOX `synthesis` with default query parameters.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Interval at which the playback serializer polls the device for idle.
pub const DEFAULT_PLAYBACK_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Reaction put on a message while it is being read out.
pub const DEFAULT_SPEAKING_REACTION: &str = "speaker";

/// Errors raised while building [`Settings`]. All of them are startup-fatal.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// One or more required variables are unset or empty.
    #[error("missing required environment variables: {}", .keys.join(", "))]
    MissingVariables {
        /// Every missing key, in declaration order.
        keys: Vec<&'static str>,
    },

    /// An allow-list variable is not a JSON array of strings.
    #[error("failed to parse {key} as a JSON array of strings: {source}")]
    InvalidList {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A credential that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw credential, for building request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Slack credentials.
#[derive(Debug, Clone)]
pub struct SlackCredentials {
    pub bot_token: Secret,
    pub app_level_token: Secret,
}

/// Where and with which voice to synthesize.
#[derive(Debug, Clone)]
pub struct VoicevoxSettings {
    pub endpoint: String,
    pub speaker_id: String,
}

/// Allow-lists. An empty list means "no filtering on this dimension".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowLists {
    pub user_ids: Vec<String>,
    pub channel_ids: Vec<String>,
}

/// Tunables that come from the command line rather than the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub run_deadline: Duration,
    pub http_timeout: Duration,
    pub sample_rate: u32,
    pub playback_poll_interval: Duration,
    /// Reaction name for the "speaking" indicator; `None` disables it.
    pub speaking_reaction: Option<String>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            run_deadline: DEFAULT_RUN_DEADLINE,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            sample_rate: DEFAULT_SAMPLE_RATE,
            playback_poll_interval: DEFAULT_PLAYBACK_POLL_INTERVAL,
            speaking_reaction: Some(DEFAULT_SPEAKING_REACTION.to_string()),
        }
    }
}

/// Immutable process-wide configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub slack: SlackCredentials,
    pub voicevox: VoicevoxSettings,
    pub allow: AllowLists,
    pub runtime: RuntimeOptions,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// Every missing required key is collected before failing, so the error
    /// names all of them at once. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut required = |key: &'static str| match lookup(key) {
            Some(value) if !value.is_empty() => value,
            _ => {
                missing.push(key);
                String::new()
            }
        };

        let bot_token = required(ENV_SLACK_BOT_TOKEN);
        let app_level_token = required(ENV_SLACK_APP_LEVEL_TOKEN);
        let endpoint = required(ENV_VOICEVOX_ENDPOINT);
        let speaker_id = required(ENV_VOICEVOX_SPEAKER_ID);

        if !missing.is_empty() {
            return Err(SettingsError::MissingVariables { keys: missing });
        }

        let user_ids = parse_id_list(ENV_USER_IDS, lookup(ENV_USER_IDS))?;
        let channel_ids = parse_id_list(ENV_CHANNEL_IDS, lookup(ENV_CHANNEL_IDS))?;

        Ok(Self {
            slack: SlackCredentials {
                bot_token: Secret::new(bot_token),
                app_level_token: Secret::new(app_level_token),
            },
            voicevox: VoicevoxSettings {
                endpoint,
                speaker_id,
            },
            allow: AllowLists {
                user_ids,
                channel_ids,
            },
            runtime: RuntimeOptions::default(),
        })
    }

    /// Replace the runtime options.
    #[must_use]
    pub fn with_runtime(mut self, runtime: RuntimeOptions) -> Self {
        self.runtime = runtime;
        self
    }
}

fn parse_id_list(key: &'static str, raw: Option<String>) -> Result<Vec<String>, SettingsError> {
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        tracing::info!(key, "Not set; no filtering on this dimension");
        return Ok(Vec::new());
    };
    serde_json::from_str(&raw).map_err(|source| SettingsError::InvalidList { key, source })
}
