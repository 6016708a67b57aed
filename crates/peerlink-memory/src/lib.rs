//! In-memory stores for the PeerLink directory and clients.
//!
//! All state lives for the lifetime of the process only:
//!
//! - [`InMemoryUserRegistry`]: accounts known to the directory
//! - [`InMemorySessionRegistry`]: last announced address per login
//! - [`InMemoryConversationLog`]: per-peer message history on a client

pub mod conversations;
pub mod sessions;
pub mod users;

pub use conversations::InMemoryConversationLog;
pub use sessions::InMemorySessionRegistry;
pub use users::InMemoryUserRegistry;
