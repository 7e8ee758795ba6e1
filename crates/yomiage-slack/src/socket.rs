//! Socket Mode client over tokio-tungstenite.
//!
//! Connection lifecycle:
//!
//! ```text
//!   Idle ──Connecting──▶ apps.connections.open + websocket handshake
//!     ▲                        │ ok                       │ error
//!     │                        ▼                          ▼
//!     └──── disconnect ──── Open ──── socket closed ──▶ Closed (next() = None)
//! ```
//!
//! A `disconnect` frame is Slack asking the client to move to a new socket,
//! so the client opens a fresh one. Every other failure closes the source.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use crate::error::{SlackError, SlackResult};
use crate::events::{SocketEnvelope, ack_frame};
use crate::http::HttpBackend;
use crate::transport::{EnvelopeSource, TransportEvent};
use crate::web::SlackWebClient;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Hands out Socket Mode websocket URLs.
#[async_trait]
pub trait ConnectionOpener: Send + Sync {
    async fn open_connection(&self) -> SlackResult<Url>;
}

#[async_trait]
impl<B: HttpBackend> ConnectionOpener for SlackWebClient<B> {
    async fn open_connection(&self) -> SlackResult<Url> {
        Self::open_connection(self).await
    }
}

/// What a text frame asks the client to do.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FrameAction {
    Emit(TransportEvent),
    Reconnect { reason: String },
    Ignore { detail: String },
}

/// Classify one text frame.
pub(crate) fn classify_text(text: &str) -> FrameAction {
    match serde_json::from_str::<SocketEnvelope>(text) {
        Ok(envelope) => match envelope.kind.as_str() {
            "hello" => FrameAction::Emit(TransportEvent::Connected),
            "disconnect" => FrameAction::Reconnect {
                reason: envelope.reason.unwrap_or_else(|| "unspecified".to_string()),
            },
            _ => FrameAction::Emit(TransportEvent::Envelope(envelope)),
        },
        Err(e) => FrameAction::Ignore {
            detail: format!("undecodable frame: {e}"),
        },
    }
}

enum Link {
    Idle { announced: bool },
    Open(Box<WsStream>),
    Closed,
}

/// Socket Mode [`EnvelopeSource`].
pub struct SocketModeClient {
    opener: Arc<dyn ConnectionOpener>,
    link: Link,
}

impl SocketModeClient {
    pub fn new(opener: Arc<dyn ConnectionOpener>) -> Self {
        Self {
            opener,
            link: Link::Idle { announced: false },
        }
    }

    async fn connect(&self) -> SlackResult<WsStream> {
        let url = self.opener.open_connection().await?;
        tracing::debug!(host = url.host_str().unwrap_or_default(), "Opening Socket Mode websocket");
        let (stream, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| SlackError::WebSocket(e.to_string()))?;
        Ok(stream)
    }

    async fn close_current(&mut self, next: Link) {
        if let Link::Open(mut stream) = std::mem::replace(&mut self.link, next) {
            let _ = stream.close(None).await;
        }
    }

    /// Apply one websocket read result. `Some` is handed to the caller.
    async fn on_frame(
        &mut self,
        frame: Option<Result<Message, tokio_tungstenite::tungstenite::Error>>,
    ) -> Option<TransportEvent> {
        match frame {
            Some(Ok(Message::Text(text))) => match classify_text(&text) {
                FrameAction::Emit(event) => Some(event),
                FrameAction::Reconnect { reason } => {
                    tracing::info!(reason = %reason, "Slack requested a reconnect");
                    self.close_current(Link::Idle { announced: false }).await;
                    None
                }
                FrameAction::Ignore { detail } => {
                    tracing::warn!(detail = %detail, "Ignoring Socket Mode frame");
                    None
                }
            },
            Some(Ok(Message::Close(close))) => {
                self.link = Link::Closed;
                Some(TransportEvent::ConnectionError(format!(
                    "socket closed by server: {close:?}"
                )))
            }
            // Pings are answered by tungstenite itself.
            Some(Ok(_)) => None,
            Some(Err(e)) => {
                self.link = Link::Closed;
                Some(TransportEvent::ConnectionError(e.to_string()))
            }
            None => {
                self.link = Link::Closed;
                Some(TransportEvent::ConnectionError("socket stream ended".into()))
            }
        }
    }
}

#[async_trait]
impl EnvelopeSource for SocketModeClient {
    async fn next(&mut self) -> Option<TransportEvent> {
        loop {
            match &mut self.link {
                Link::Closed => return None,
                Link::Idle { announced: false } => {
                    self.link = Link::Idle { announced: true };
                    return Some(TransportEvent::Connecting);
                }
                Link::Idle { announced: true } => match self.connect().await {
                    Ok(stream) => self.link = Link::Open(Box::new(stream)),
                    Err(e) => {
                        self.link = Link::Closed;
                        return Some(TransportEvent::ConnectionError(e.to_string()));
                    }
                },
                Link::Open(stream) => {
                    let frame = stream.next().await;
                    if let Some(event) = self.on_frame(frame).await {
                        return Some(event);
                    }
                }
            }
        }
    }

    async fn ack(&mut self, envelope_id: &str) -> SlackResult<()> {
        let Link::Open(stream) = &mut self.link else {
            return Err(SlackError::WebSocket("cannot ack: socket is not open".into()));
        };
        stream
            .send(Message::Text(ack_frame(envelope_id).into()))
            .await
            .map_err(|e| SlackError::WebSocket(e.to_string()))
    }
}
