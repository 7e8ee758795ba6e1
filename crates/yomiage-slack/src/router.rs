//! Event router: transport envelopes in, one handler task per message out.

use std::convert::Infallible;
use std::sync::Arc;

use thiserror::Error;
use yomiage_core::MessageHandler;

use crate::events::{SlackEvent, SocketEnvelope};
use crate::transport::{EnvelopeSource, TransportEvent};

#[derive(Debug, Error)]
pub enum RouterError {
    /// The transport will deliver no more events.
    #[error("Slack transport closed")]
    TransportClosed,
}

/// Drains an [`EnvelopeSource`] and dispatches message events.
///
/// Each message is handled on its own `tokio::spawn`ed task that the router
/// never awaits. There is no limit on tasks in flight.
pub struct EventRouter {
    handler: Arc<dyn MessageHandler>,
}

impl EventRouter {
    pub fn new(handler: Arc<dyn MessageHandler>) -> Self {
        Self { handler }
    }

    /// Run until the source closes.
    pub async fn run<S: EnvelopeSource + ?Sized>(&self, source: &mut S) -> Result<Infallible, RouterError> {
        while let Some(event) = source.next().await {
            match event {
                TransportEvent::Connecting => tracing::info!("Slack Socket Mode: connecting"),
                TransportEvent::Connected => tracing::info!("Slack Socket Mode: connected"),
                TransportEvent::ConnectionError(e) => {
                    tracing::error!(error = %e, "Slack Socket Mode: connection error");
                }
                TransportEvent::Envelope(envelope) => self.on_envelope(source, envelope).await,
            }
        }
        Err(RouterError::TransportClosed)
    }

    async fn on_envelope<S: EnvelopeSource + ?Sized>(&self, source: &mut S, envelope: SocketEnvelope) {
        if let Some(id) = envelope.envelope_id.as_deref() {
            if let Err(e) = source.ack(id).await {
                tracing::warn!(envelope_id = %id, error = %e, "Failed to acknowledge envelope");
            }
        }

        match envelope.decode() {
            Ok(SlackEvent::Message(message)) => {
                tracing::debug!(
                    user = %message.user,
                    channel = %message.channel,
                    ts = %message.ts,
                    "Dispatching message event"
                );
                let handler = Arc::clone(&self.handler);
                tokio::spawn(async move { handler.handle(message).await });
            }
            Ok(SlackEvent::Unsupported(what)) => {
                tracing::debug!(what = %what, "Ignoring unsupported event");
            }
            Err(e) => {
                tracing::warn!(
                    envelope_type = %envelope.kind,
                    error = %e,
                    "Dropping undecodable envelope"
                );
            }
        }
    }
}
