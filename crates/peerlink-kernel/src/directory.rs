//! Directory service: authenticates users and answers "where is X reachable".
//!
//! The directory never sees message content. It owns two stores:
//! the [`UserRegistry`] of accounts and the [`SessionRegistry`] mapping a
//! login to its last announced address.

use crate::observed::observed;

use peerlink_types::error::{PeerLinkError, PeerLinkResult};
use peerlink_types::observe::Observer;
use peerlink_types::session::{validate_address, Session};
use peerlink_types::store::{SessionRegistry, UserRegistry};
use std::sync::Arc;

/// Directory logic over injected stores.
pub struct DirectoryService {
    users: Arc<dyn UserRegistry>,
    sessions: Arc<dyn SessionRegistry>,
    observer: Arc<dyn Observer>,
}

impl DirectoryService {
    /// Create a directory over the given stores, reporting through `observer`.
    pub fn new(
        users: Arc<dyn UserRegistry>,
        sessions: Arc<dyn SessionRegistry>,
        observer: Arc<dyn Observer>,
    ) -> Self {
        Self {
            users,
            sessions,
            observer,
        }
    }

    /// Authenticate `login` and record that it is reachable at `address`.
    ///
    /// The address is validated before any store is touched. Unknown
    /// login and wrong password are indistinguishable to the caller.
    pub async fn start_session(
        &self,
        login: &str,
        password: &str,
        address: &str,
    ) -> PeerLinkResult<()> {
        observed(
            &*self.observer,
            "start_session",
            self.authenticate_and_record(login, password, address),
        )
        .await
    }

    /// Resolve `target`'s session for `requester`.
    ///
    /// The requester must be a known account. Having a session is not
    /// required.
    pub async fn provide_user_session(
        &self,
        requester: &str,
        target: &str,
    ) -> PeerLinkResult<Session> {
        observed(
            &*self.observer,
            "provide_user_session",
            self.lookup_for(requester, target),
        )
        .await
    }

    async fn authenticate_and_record(
        &self,
        login: &str,
        password: &str,
        address: &str,
    ) -> PeerLinkResult<()> {
        validate_address(address)?;

        let account = self
            .users
            .find_by_login_password(login, password)
            .await?
            .ok_or_else(|| PeerLinkError::Unauthorized("invalid login or password".to_string()))?;

        self.sessions.insert(&account.login, address).await?;
        self.observer.event(
            "start_session",
            &format!("session started for '{}' at {address}", account.login),
        );
        Ok(())
    }

    async fn lookup_for(&self, requester: &str, target: &str) -> PeerLinkResult<Session> {
        if self.users.find_by_login(requester).await?.is_none() {
            return Err(PeerLinkError::Unauthorized(format!(
                "requester '{requester}' is not a known account"
            )));
        }

        let session = self
            .sessions
            .get(target)
            .await?
            .ok_or_else(|| PeerLinkError::NotFound(format!("no session for '{target}'")))?;

        self.observer.event(
            "provide_user_session",
            &format!("'{requester}' resolved '{target}' at {}", session.address),
        );
        Ok(session)
    }
}
