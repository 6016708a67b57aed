//! Capability traits for the three shared stores.
//!
//! Implementations must be safe to call from any number of concurrent tasks
//! without the caller taking locks. Absence is reported as `Ok(None)` (or an
//! empty vector), never as an error.

use crate::account::Account;
use crate::error::StoreResult;
use crate::message::Message;
use crate::session::Session;
use async_trait::async_trait;

/// Accounts known to the directory.
#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// Insert a new account. Fails with `Conflict` if the login is taken.
    async fn insert(&self, login: &str, password: &str) -> StoreResult<()>;

    /// Find the account whose login and password both match.
    async fn find_by_login_password(
        &self,
        login: &str,
        password: &str,
    ) -> StoreResult<Option<Account>>;

    /// Find an account by login alone.
    async fn find_by_login(&self, login: &str) -> StoreResult<Option<Account>>;
}

/// Current reachable address per login.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Store the session for `login`, overwriting any previous one.
    async fn insert(&self, login: &str, address: &str) -> StoreResult<()>;

    /// Get the session for `login`.
    async fn get(&self, login: &str) -> StoreResult<Option<Session>>;
}

/// Per-peer ordered message history.
#[async_trait]
pub trait ConversationLog: Send + Sync {
    /// Append a message to the conversation with `peer`.
    ///
    /// Appends to the same peer are linearized; appends to different peers
    /// do not block each other.
    async fn append(&self, peer: &str, author: &str, content: &str) -> StoreResult<()>;

    /// Read the conversation with `peer`, oldest first. Empty if none yet.
    async fn read(&self, peer: &str) -> StoreResult<Vec<Message>>;
}
