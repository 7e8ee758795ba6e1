//! Socket Mode envelopes and Events API payload decoding.

use serde::Deserialize;
use serde_json::Value;
use yomiage_core::InboundMessageEvent;

/// A frame received over the Socket Mode websocket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SocketEnvelope {
    /// `hello`, `disconnect`, `events_api`, `slash_commands`, `interactive`, …
    #[serde(rename = "type")]
    pub kind: String,
    /// Present on every frame that must be acknowledged.
    #[serde(default)]
    pub envelope_id: Option<String>,
    #[serde(default)]
    pub payload: Option<Value>,
    /// Set on `disconnect` frames (`warning`, `refresh_requested`, …).
    #[serde(default)]
    pub reason: Option<String>,
}

/// The `{"envelope_id": …}` acknowledgement frame.
pub fn ack_frame(envelope_id: &str) -> String {
    serde_json::json!({ "envelope_id": envelope_id }).to_string()
}

/// What an envelope turned out to contain.
#[derive(Debug, Clone, PartialEq)]
pub enum SlackEvent {
    /// A `message` event from an `event_callback`.
    Message(InboundMessageEvent),
    /// Anything else; the string says what, for logging.
    Unsupported(String),
}

#[derive(Debug, Deserialize)]
struct EventsApiPayload {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    event: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum InnerEvent {
    #[serde(rename = "message")]
    Message(MessageEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MessageEvent {
    user: String,
    channel: String,
    text: String,
    ts: String,
    bot_id: Option<String>,
    subtype: Option<String>,
}

impl From<MessageEvent> for InboundMessageEvent {
    fn from(event: MessageEvent) -> Self {
        Self {
            user: event.user,
            channel: event.channel,
            text: event.text,
            ts: event.ts,
            bot_id: event.bot_id,
            subtype: event.subtype,
        }
    }
}

fn type_of(value: &Value) -> String {
    value
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("<untyped>")
        .to_string()
}

impl SocketEnvelope {
    /// Decode the payload. Only `events_api` → `event_callback` → `message`
    /// yields a [`SlackEvent::Message`].
    pub fn decode(&self) -> Result<SlackEvent, serde_json::Error> {
        if self.kind != "events_api" {
            return Ok(SlackEvent::Unsupported(format!("envelope type {}", self.kind)));
        }
        let Some(payload) = &self.payload else {
            return Ok(SlackEvent::Unsupported("events_api envelope without payload".into()));
        };

        let outer = EventsApiPayload::deserialize(payload)?;
        if outer.kind != "event_callback" {
            return Ok(SlackEvent::Unsupported(format!("events_api type {}", outer.kind)));
        }
        let Some(inner) = outer.event else {
            return Ok(SlackEvent::Unsupported("event_callback without event".into()));
        };

        match InnerEvent::deserialize(&inner)? {
            InnerEvent::Message(message) => Ok(SlackEvent::Message(message.into())),
            InnerEvent::Other => Ok(SlackEvent::Unsupported(format!(
                "inner event type {}",
                type_of(&inner)
            ))),
        }
    }
}
