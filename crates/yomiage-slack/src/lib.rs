//! Slack adapters for yomiage.
//!
//! - [`SlackWebClient`]: `auth.test`, `users.info`, `reactions.*` and
//!   `apps.connections.open`. Implements the core `IdentityLookup` and
//!   `MessageAnnotator` ports.
//! - [`SocketModeClient`]: the Socket Mode websocket as an [`EnvelopeSource`].
//! - [`EventRouter`]: acknowledges envelopes and spawns one handler task per
//!   message event.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// The backend generic is an implementation detail; callers use
// `DefaultSlackWebClient` through the core ports.
#![allow(private_bounds, private_interfaces)]

mod api;
mod config;
mod error;
mod events;
mod http;
mod port;
mod router;
mod socket;
mod transport;
mod web;

// ============================================================================
// Public API
// ============================================================================

pub use api::AuthTest;
pub use config::{DEFAULT_API_BASE_URL, SlackConfig};
pub use error::{SlackError, SlackResult};
pub use events::{SlackEvent, SocketEnvelope, ack_frame};
pub use router::{EventRouter, RouterError};
pub use socket::{ConnectionOpener, SocketModeClient};
pub use transport::{EnvelopeSource, TransportEvent};
pub use web::{DefaultSlackWebClient, SlackWebClient};

// Used by integration tests only
#[cfg(test)]
use bytes as _;
