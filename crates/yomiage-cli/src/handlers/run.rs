//! `run`: listen on Slack and read messages aloud until interrupted.

use std::sync::Arc;

use yomiage_audio::LocalAudioOutput;
use yomiage_core::RuntimeOptions;
use yomiage_slack::EventRouter;

use crate::bootstrap::{bootstrap, load_settings};
use crate::error::CliError;

/// Execute the run command.
///
/// Returns `Ok(())` on Ctrl-C. Losing the Slack connection is an error.
pub async fn execute(runtime: RuntimeOptions) -> Result<(), CliError> {
    let settings = load_settings(runtime)?;

    let sample_rate = settings.runtime.sample_rate;
    let output = LocalAudioOutput::open(sample_rate)?;
    tracing::info!(sample_rate, "Audio output ready");

    let ctx = bootstrap(settings).await?;
    ctx.log_targets().await;

    let pipeline = Arc::new(ctx.build_pipeline(Arc::new(output)));
    let router = EventRouter::new(pipeline);
    let mut socket = ctx.socket_client();

    tokio::select! {
        result = router.run(&mut socket) => match result {
            Ok(never) => match never {},
            Err(e) => Err(e.into()),
        },
        () = shutdown_signal() => {
            tracing::info!("Interrupted, shutting down");
            Ok(())
        }
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
