//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together.
//! All concrete implementations are instantiated here:
//! - Slack Web API client (via yomiage-slack)
//! - VOICEVOX client (via yomiage-voicevox)
//! - Speech pipeline and playback serializer (via yomiage-core)
//!
//! The audio device is opened by the `run` handler so that `check` works on
//! machines without one.

use std::sync::Arc;

use yomiage_core::{
    AudioOutput, PlaybackSerializer, RuntimeOptions, Settings, SpeakingIndicator, SpeechPipeline,
};
use yomiage_slack::{AuthTest, DefaultSlackWebClient, SlackConfig, SocketModeClient};
use yomiage_voicevox::{DefaultVoicevoxClient, VoicevoxConfig};

use crate::error::CliError;

/// Load [`Settings`] from the environment and apply command-line options.
pub fn load_settings(runtime: RuntimeOptions) -> Result<Settings, CliError> {
    Ok(Settings::from_env()?.with_runtime(runtime))
}

/// Fully composed application context.
pub struct AppContext {
    pub settings: Settings,
    pub slack: Arc<DefaultSlackWebClient>,
    pub voicevox: Arc<DefaultVoicevoxClient>,
    /// Who the bot token belongs to, from `auth.test`.
    pub bot: AuthTest,
}

/// Build the remote clients and verify the Slack bot token.
///
/// Fails with [`CliError::Auth`] when Slack rejects the token.
pub async fn bootstrap(settings: Settings) -> Result<AppContext, CliError> {
    let slack_config =
        SlackConfig::from_credentials(&settings.slack).with_timeout(settings.runtime.http_timeout);
    let slack = Arc::new(DefaultSlackWebClient::new(&slack_config)?);

    let bot = slack.auth_test().await?;
    tracing::info!(
        bot_user = %bot.user,
        bot_user_id = %bot.user_id,
        team = %bot.team,
        "Slack API authentication successful"
    );

    let voicevox_config = VoicevoxConfig::from_settings(&settings.voicevox)
        .with_timeout(settings.runtime.http_timeout);
    let voicevox = Arc::new(DefaultVoicevoxClient::new(&voicevox_config)?);
    tracing::info!(
        endpoint = %voicevox.endpoint(),
        speaker_id = %voicevox.speaker_id(),
        "VOICEVOX client configured"
    );

    Ok(AppContext {
        settings,
        slack,
        voicevox,
        bot,
    })
}

impl AppContext {
    /// Log which senders and channels will be read out.
    ///
    /// Sender names are looked up for readability only; a failed lookup is
    /// a warning, never fatal.
    pub async fn log_targets(&self) {
        let allow = &self.settings.allow;

        if allow.user_ids.is_empty() {
            tracing::info!("Reading messages from all users");
        }
        for user_id in &allow.user_ids {
            match self.slack.user_info(user_id).await {
                Ok(profile) => {
                    tracing::info!(user_id = %user_id, name = %profile.spoken_name(), "Target user");
                }
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "Could not resolve target user");
                }
            }
        }

        if allow.channel_ids.is_empty() {
            tracing::info!("Reading messages from all channels");
        } else {
            tracing::info!(channels = ?allow.channel_ids, "Target channels");
        }
    }

    /// Compose the speech pipeline around an opened audio output.
    pub fn build_pipeline(&self, output: Arc<dyn AudioOutput>) -> SpeechPipeline {
        let runtime = &self.settings.runtime;

        let mut playback =
            PlaybackSerializer::new(output).with_poll_interval(runtime.playback_poll_interval);
        if let Some(reaction) = &runtime.speaking_reaction {
            playback = playback.with_indicator(SpeakingIndicator::new(
                self.slack.clone(),
                reaction.clone(),
            ));
        }

        SpeechPipeline::from_settings(
            &self.settings,
            self.slack.clone(),
            self.voicevox.clone(),
            playback,
        )
    }

    /// A Socket Mode connection that opens sockets through the Web API client.
    pub fn socket_client(&self) -> SocketModeClient {
        SocketModeClient::new(self.slack.clone())
    }
}
