//! Messages exchanged between peers.

use serde::{Deserialize, Serialize};

/// An immutable text message and its author's login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Login of the author.
    pub author: String,
    /// Message text.
    pub content: String,
}

impl Message {
    /// Create a message.
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
        }
    }
}
