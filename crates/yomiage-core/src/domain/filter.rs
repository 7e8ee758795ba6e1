//! Pass/reject decision for inbound messages.
//!
//! Hard rejects (empty sender, bot marker, automated subtype) are absolute.
//! Allow-lists are soft: each one only applies when it is non-empty.

use std::collections::HashSet;
use std::fmt;

use super::message::InboundMessageEvent;
use crate::settings::AllowLists;

/// Subtypes posted by integrations rather than people.
pub const AUTOMATED_SUBTYPES: &[&str] = &["bot_message", "slackbot_response"];

/// Why a message was not read out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptySender,
    BotMessage,
    AutomatedSubtype,
    SenderNotAllowed,
    ChannelNotAllowed,
}

impl RejectReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptySender => "empty_sender",
            Self::BotMessage => "bot_message",
            Self::AutomatedSubtype => "automated_subtype",
            Self::SenderNotAllowed => "sender_not_allowed",
            Self::ChannelNotAllowed => "channel_not_allowed",
        }
    }

    /// Hard rejects bypass the allow-lists entirely.
    pub const fn is_hard(self) -> bool {
        matches!(
            self,
            Self::EmptySender | Self::BotMessage | Self::AutomatedSubtype
        )
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`MessageFilter::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Accept,
    Reject(RejectReason),
}

impl FilterDecision {
    pub const fn is_accept(self) -> bool {
        matches!(self, Self::Accept)
    }
}

/// Sender/channel allow-list filter.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    user_ids: HashSet<String>,
    channel_ids: HashSet<String>,
}

impl MessageFilter {
    pub fn new<U, C>(user_ids: U, channel_ids: C) -> Self
    where
        U: IntoIterator,
        U::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            user_ids: user_ids.into_iter().map(Into::into).collect(),
            channel_ids: channel_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_allow_lists(allow: &AllowLists) -> Self {
        Self::new(allow.user_ids.iter().cloned(), allow.channel_ids.iter().cloned())
    }

    pub fn evaluate(&self, event: &InboundMessageEvent) -> FilterDecision {
        if event.user.is_empty() {
            return FilterDecision::Reject(RejectReason::EmptySender);
        }
        if event.is_from_bot() {
            return FilterDecision::Reject(RejectReason::BotMessage);
        }
        if event
            .subtype
            .as_deref()
            .is_some_and(|subtype| AUTOMATED_SUBTYPES.contains(&subtype))
        {
            return FilterDecision::Reject(RejectReason::AutomatedSubtype);
        }

        if !self.user_ids.is_empty() && !self.user_ids.contains(&event.user) {
            return FilterDecision::Reject(RejectReason::SenderNotAllowed);
        }
        if !self.channel_ids.is_empty() && !self.channel_ids.contains(&event.channel) {
            return FilterDecision::Reject(RejectReason::ChannelNotAllowed);
        }

        FilterDecision::Accept
    }
}
