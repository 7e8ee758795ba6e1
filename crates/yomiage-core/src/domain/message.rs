//! Inbound chat messages.

/// One chat message as delivered by the transport.
///
/// Created by the event router, consumed once by the pipeline, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundMessageEvent {
    /// Sender id (empty for system messages and edits).
    pub user: String,
    /// Origin channel id.
    pub channel: String,
    /// Raw message body, including chat markup.
    pub text: String,
    /// Message timestamp; doubles as the message id for reactions.
    pub ts: String,
    /// Set when the message was posted by a bot integration.
    pub bot_id: Option<String>,
    /// Message subtype (`bot_message`, `channel_join`, …).
    pub subtype: Option<String>,
}

impl InboundMessageEvent {
    /// Whether the message carries a bot-origin marker.
    pub fn is_from_bot(&self) -> bool {
        self.bot_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Reference to this message for annotation calls.
    pub fn message_ref(&self) -> MessageRef {
        MessageRef {
            channel: self.channel.clone(),
            ts: self.ts.clone(),
        }
    }
}

/// A `(channel, timestamp)` pair identifying a single message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub channel: String,
    pub ts: String,
}
