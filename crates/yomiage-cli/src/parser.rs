//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser};
use yomiage_core::settings::{
    DEFAULT_HTTP_TIMEOUT, DEFAULT_PLAYBACK_POLL_INTERVAL, DEFAULT_RUN_DEADLINE,
    DEFAULT_SAMPLE_RATE, DEFAULT_SPEAKING_REACTION, RuntimeOptions,
};

use crate::commands::Commands;

/// Read Slack messages aloud through a VOICEVOX engine.
///
/// Credentials and filters come from the environment (or a `.env` file):
/// `SLACK_BOT_TOKEN`, `SLACK_APP_LEVEL_TOKEN`, `VOICEVOX_ENDPOINT`,
/// `VOICEVOX_SPEAKER_ID`, and optionally `USER_IDS` / `CHANNEL_IDS` as JSON
/// arrays.
#[derive(Debug, Parser)]
#[command(name = "yomiage")]
#[command(about = "Read Slack messages aloud with VOICEVOX")]
#[command(version)]
pub struct Cli {
    /// Load environment variables from this file instead of ./.env
    #[arg(long = "env-file", global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Tuning knobs that end up in [`RuntimeOptions`].
#[derive(Debug, Clone, Args)]
pub struct RuntimeArgs {
    /// Do not mark messages with a reaction while they are being read
    #[arg(long = "no-reaction", global = true)]
    pub no_reaction: bool,

    /// Reaction shown on a message while it is being read
    #[arg(
        long,
        global = true,
        env = "YOMIAGE_REACTION",
        default_value = DEFAULT_SPEAKING_REACTION,
        value_name = "EMOJI"
    )]
    pub reaction: String,

    /// Deadline for user lookup plus synthesis of one message, in seconds
    #[arg(
        long = "deadline-secs",
        global = true,
        env = "YOMIAGE_DEADLINE_SECS",
        default_value_t = DEFAULT_RUN_DEADLINE.as_secs()
    )]
    pub deadline_secs: u64,

    /// Per-request HTTP timeout, in seconds
    #[arg(
        long = "http-timeout-secs",
        global = true,
        env = "YOMIAGE_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_HTTP_TIMEOUT.as_secs()
    )]
    pub http_timeout_secs: u64,

    /// Sample rate of the synthesized PCM, in Hz
    #[arg(long = "sample-rate", global = true, default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,
}

impl RuntimeArgs {
    pub fn to_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            run_deadline: Duration::from_secs(self.deadline_secs),
            http_timeout: Duration::from_secs(self.http_timeout_secs),
            sample_rate: self.sample_rate,
            playback_poll_interval: DEFAULT_PLAYBACK_POLL_INTERVAL,
            speaking_reaction: (!self.no_reaction).then(|| self.reaction.clone()),
        }
    }
}
