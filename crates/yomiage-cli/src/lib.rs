//! yomiage command-line adapter.
//!
//! `main.rs` parses arguments, installs logging and loads `.env`; everything
//! else lives here so it can be tested: argument parsing ([`parser`]),
//! composition ([`bootstrap`]), command handlers ([`handlers`]) and exit
//! codes ([`error`]).

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

// Re-export primary types for convenient access
pub use bootstrap::{AppContext, bootstrap, load_settings};
pub use commands::Commands;
pub use error::CliError;
pub use parser::{Cli, RuntimeArgs};
