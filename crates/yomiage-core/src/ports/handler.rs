//! Entry point the event router hands decoded messages to.

use async_trait::async_trait;

use crate::domain::InboundMessageEvent;

/// Consumes one inbound message to completion.
///
/// Implementations own their error handling: nothing flows back to the
/// router, which spawns one task per call and never awaits it.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, event: InboundMessageEvent);
}
