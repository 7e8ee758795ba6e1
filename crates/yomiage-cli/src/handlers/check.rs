//! `check`: validate configuration and connectivity without listening.

use yomiage_core::RuntimeOptions;

use crate::bootstrap::{bootstrap, load_settings};
use crate::error::CliError;

/// Execute the check command.
///
/// Verifies the environment, the Slack bot token and that the VOICEVOX
/// engine answers, then prints a short summary.
pub async fn execute(runtime: RuntimeOptions) -> Result<(), CliError> {
    let settings = load_settings(runtime)?;
    let ctx = bootstrap(settings).await?;
    ctx.log_targets().await;

    let version = ctx.voicevox.version().await?;

    println!(
        "Slack:    authenticated as {} ({}) in {}",
        ctx.bot.user, ctx.bot.user_id, ctx.bot.team
    );
    println!(
        "VOICEVOX: engine {version} at {}, speaker {}",
        ctx.voicevox.endpoint(),
        ctx.voicevox.speaker_id()
    );
    println!("Users:    {}", describe_allow_list(&ctx.settings.allow.user_ids));
    println!("Channels: {}", describe_allow_list(&ctx.settings.allow.channel_ids));
    Ok(())
}

fn describe_allow_list(ids: &[String]) -> String {
    if ids.is_empty() {
        "all".to_string()
    } else {
        ids.join(", ")
    }
}
