//! Session registry: last-writer-wins address per login.

use async_trait::async_trait;
use dashmap::DashMap;
use peerlink_types::error::StoreResult;
use peerlink_types::session::Session;
use peerlink_types::store::SessionRegistry;

/// Thread-safe registry of sessions, keyed by login.
///
/// Sessions never expire; a new insert for the same login replaces the old one.
#[derive(Debug, Default)]
pub struct InMemorySessionRegistry {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is stored.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn insert(&self, login: &str, address: &str) -> StoreResult<()> {
        self.sessions
            .insert(login.to_string(), Session::new(login, address));
        Ok(())
    }

    async fn get(&self, login: &str) -> StoreResult<Option<Session>> {
        Ok(self.sessions.get(login).map(|s| s.clone()))
    }
}
