//! VOICEVOX engine client.
//!
//! Implements [`yomiage_core::SpeechSynthesizer`] on top of the engine's
//! `/audio_query` and `/synthesis` endpoints. The HTTP layer sits behind a
//! crate-private backend trait so the client is tested without a server.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// The backend generic is an implementation detail; callers use
// `DefaultVoicevoxClient` through the `SpeechSynthesizer` port.
#![allow(private_bounds, private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

pub use client::{DefaultVoicevoxClient, VoicevoxClient};
pub use config::VoicevoxConfig;
pub use error::{VoicevoxError, VoicevoxResult};
