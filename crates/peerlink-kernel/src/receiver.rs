//! Peer receiver: records messages arriving from other clients.

use crate::observed::observed;

use peerlink_types::error::{PeerLinkError, PeerLinkResult};
use peerlink_types::observe::Observer;
use peerlink_types::store::ConversationLog;
use std::sync::Arc;

/// Inbound peer logic. Shares its conversation log with the [`ClientFront`].
///
/// [`ClientFront`]: crate::front::ClientFront
pub struct PeerReceiver {
    conversations: Arc<dyn ConversationLog>,
    observer: Arc<dyn Observer>,
}

impl PeerReceiver {
    /// Create a receiver appending to `conversations`.
    pub fn new(conversations: Arc<dyn ConversationLog>, observer: Arc<dyn Observer>) -> Self {
        Self {
            conversations,
            observer,
        }
    }

    /// Append `content` to the conversation keyed by `author`.
    ///
    /// `author` is established by the transport and must be non-empty.
    pub async fn on_message_received(&self, content: &str, author: &str) -> PeerLinkResult<()> {
        let append = async move {
            let appended = self.conversations.append(author, author, content).await;
            if appended.is_ok() {
                self.observer
                    .event("on_message_received", &format!("message from '{author}'"));
            }
            appended.map_err(PeerLinkError::from)
        };
        observed(&*self.observer, "on_message_received", append).await
    }
}
