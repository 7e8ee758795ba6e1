//! Transport abstraction consumed by the router.

use async_trait::async_trait;

use crate::error::SlackResult;
use crate::events::SocketEnvelope;

/// Lifecycle notifications and payload envelopes, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Connecting,
    Connected,
    ConnectionError(String),
    Envelope(SocketEnvelope),
}

/// A never-ending stream of [`TransportEvent`]s that can acknowledge envelopes.
///
/// `next` returns `None` only when the transport is closed for good.
#[async_trait]
pub trait EnvelopeSource: Send {
    async fn next(&mut self) -> Option<TransportEvent>;

    async fn ack(&mut self, envelope_id: &str) -> SlackResult<()>;
}
