//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(runtime: RuntimeOptions) -> Result<(), CliError>`
//! - Load settings, bootstrap, then do the command's work
//!
//! Handlers should NOT construct clients themselves; that is what
//! [`crate::bootstrap`] is for.

pub mod check;
pub mod run;
