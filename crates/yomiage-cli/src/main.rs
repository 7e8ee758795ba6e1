//! CLI entry point.
//!
//! Parses arguments, installs logging, loads `.env` and dispatches to a
//! handler. Wiring lives in `bootstrap`.

use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use yomiage_cli::{Cli, CliError, Commands, handlers};

/// Log filter used when `RUST_LOG` is unset.
const fn default_filter(verbose: bool) -> &'static str {
    if verbose { "warn,yomiage=debug" } else { "warn,yomiage=info" }
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// Load an explicit env file, or `./.env` when present.
///
/// Values already in the process environment win.
fn load_env_file(explicit: Option<&Path>) -> Result<(), CliError> {
    match explicit {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| {
                CliError::Config(format!("failed to load env file {}: {e}", path.display()))
            })?;
            tracing::info!(path = %path.display(), "Loaded environment file");
        }
        None => match dotenvy::dotenv() {
            Ok(path) => tracing::info!(path = %path.display(), "Loaded environment file"),
            Err(e) => tracing::info!(
                error = %e,
                "No .env file loaded, relying on the process environment"
            ),
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose)?;

    let runtime = cli.runtime.to_options();
    let result = match load_env_file(cli.env_file.as_deref()) {
        Ok(()) => match cli.command.unwrap_or_default() {
            Commands::Run => handlers::run::execute(runtime).await,
            Commands::Check => handlers::check::execute(runtime).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Fatal error");
        std::process::exit(e.exit_code());
    }
    Ok(())
}
