//! Wire-backed implementations of the outbound gateway traits.

use crate::message::{WireRequest, WireResponse};
use crate::node::{call, WireError};

use async_trait::async_trait;
use peerlink_types::cancel::CancelSignal;
use peerlink_types::error::{PeerLinkError, PeerLinkResult};
use peerlink_types::gateway::{DirectoryGateway, PeerGateway};
use peerlink_types::message::Message;
use peerlink_types::session::Session;
use tracing::debug;

/// Every transport failure, cancellation included, surfaces as `Technical`.
fn transport_error(addr: &str, e: WireError) -> PeerLinkError {
    PeerLinkError::Technical(format!("call to {addr} failed: {e}"))
}

fn unexpected(addr: &str, resp: &WireResponse) -> PeerLinkError {
    PeerLinkError::Technical(format!("unexpected response from {addr}: {resp:?}"))
}

/// [`DirectoryGateway`] talking to a directory node over TCP.
#[derive(Debug, Clone)]
pub struct WireDirectoryGateway {
    directory_addr: String,
}

impl WireDirectoryGateway {
    /// Gateway dialing the directory at `directory_addr` on every call.
    pub fn new(directory_addr: impl Into<String>) -> Self {
        Self {
            directory_addr: directory_addr.into(),
        }
    }

    /// Address of the directory this gateway dials.
    pub fn directory_addr(&self) -> &str {
        &self.directory_addr
    }
}

#[async_trait]
impl DirectoryGateway for WireDirectoryGateway {
    async fn register_session(
        &self,
        login: &str,
        password: &str,
        address: &str,
        cancel: &CancelSignal,
    ) -> PeerLinkResult<()> {
        let request = WireRequest::StartSession {
            login: login.to_string(),
            password: password.to_string(),
            address: Some(address.to_string()),
        };
        let resp = call(&self.directory_addr, Some(login), request, cancel)
            .await
            .map_err(|e| transport_error(&self.directory_addr, e))?;

        match resp {
            WireResponse::Ok => {
                debug!(login, address, "Directory accepted session");
                Ok(())
            }
            other => Err(other
                .as_error()
                .unwrap_or_else(|| unexpected(&self.directory_addr, &other))),
        }
    }

    async fn ask_session(
        &self,
        requester: &str,
        target: &str,
        cancel: &CancelSignal,
    ) -> PeerLinkResult<Session> {
        let request = WireRequest::ProvideSession {
            target: target.to_string(),
        };
        let resp = call(&self.directory_addr, Some(requester), request, cancel)
            .await
            .map_err(|e| transport_error(&self.directory_addr, e))?;

        match resp {
            WireResponse::Session { session } => Ok(session),
            other => Err(other
                .as_error()
                .unwrap_or_else(|| unexpected(&self.directory_addr, &other))),
        }
    }
}

/// [`PeerGateway`] delivering messages straight to another client's peer node.
#[derive(Debug, Clone, Default)]
pub struct WirePeerGateway;

impl WirePeerGateway {
    /// Gateway dialing whichever peer address each delivery names.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PeerGateway for WirePeerGateway {
    async fn deliver(
        &self,
        address: &str,
        message: &Message,
        from: &str,
        cancel: &CancelSignal,
    ) -> PeerLinkResult<()> {
        let request = WireRequest::DeliverMessage {
            content: message.content.clone(),
        };
        let resp = call(address, Some(from), request, cancel)
            .await
            .map_err(|e| transport_error(address, e))?;

        match resp {
            WireResponse::Ok => Ok(()),
            other => Err(other
                .as_error()
                .unwrap_or_else(|| unexpected(address, &other))),
        }
    }
}
