//! Subcommands.

use clap::Subcommand;

/// Available commands. `run` is the default when none is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Listen on Slack and read matching messages aloud
    #[default]
    Run,

    /// Validate configuration and reach Slack and VOICEVOX, then exit
    Check,
}
