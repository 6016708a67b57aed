//! Conversation log: append-only message history keyed by peer login.
//!
//! Appends go through the map's `entry` API, which holds the key's shard
//! lock for the whole read-modify-write. Two writers on the same peer are
//! therefore linearized, while writers on other shards proceed in parallel.

use async_trait::async_trait;
use dashmap::DashMap;
use peerlink_types::error::StoreResult;
use peerlink_types::message::Message;
use peerlink_types::store::ConversationLog;

/// Thread-safe per-peer message history.
#[derive(Debug, Default)]
pub struct InMemoryConversationLog {
    conversations: DashMap<String, Vec<Message>>,
}

impl InMemoryConversationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Peers with at least one message.
    pub fn peers(&self) -> Vec<String> {
        self.conversations.iter().map(|e| e.key().clone()).collect()
    }
}

#[async_trait]
impl ConversationLog for InMemoryConversationLog {
    async fn append(&self, peer: &str, author: &str, content: &str) -> StoreResult<()> {
        self.conversations
            .entry(peer.to_string())
            .or_default()
            .push(Message::new(author, content));
        Ok(())
    }

    async fn read(&self, peer: &str) -> StoreResult<Vec<Message>> {
        Ok(self
            .conversations
            .get(peer)
            .map(|c| c.clone())
            .unwrap_or_default())
    }
}
