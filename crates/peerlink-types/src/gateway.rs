//! Outbound capabilities used by client logic: the directory and other peers.

use crate::cancel::CancelSignal;
use crate::error::PeerLinkResult;
use crate::message::Message;
use crate::session::Session;
use async_trait::async_trait;

/// Client-side access to the directory service.
#[async_trait]
pub trait DirectoryGateway: Send + Sync {
    /// Authenticate against the directory and announce `address`.
    async fn register_session(
        &self,
        login: &str,
        password: &str,
        address: &str,
        cancel: &CancelSignal,
    ) -> PeerLinkResult<()>;

    /// Resolve `target`'s session on behalf of `requester`.
    ///
    /// Directory answers keep their kind (`Unauthorized`, `NotFound`, ...);
    /// transport failures and cancellation are `Technical`.
    async fn ask_session(
        &self,
        requester: &str,
        target: &str,
        cancel: &CancelSignal,
    ) -> PeerLinkResult<Session>;
}

/// Client-to-client message delivery.
#[async_trait]
pub trait PeerGateway: Send + Sync {
    /// Deliver `message` to the peer listening at `address`, announcing `from`.
    /// Single attempt, no retries.
    async fn deliver(
        &self,
        address: &str,
        message: &Message,
        from: &str,
        cancel: &CancelSignal,
    ) -> PeerLinkResult<()>;
}
