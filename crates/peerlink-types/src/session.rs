//! Sessions: "this login is reachable at this address".

use crate::error::PeerLinkError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directory record binding a login to a reachable `host:port` address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Owner of the session.
    pub login: String,
    /// Address the owner can be reached at. Always satisfies [`validate_address`].
    pub address: String,
    /// Whether the session is considered live. Set on every registration.
    pub online: bool,
    /// When the session was last (re)registered.
    pub registered_at: DateTime<Utc>,
}

impl Session {
    /// Build a fresh online session.
    pub fn new(login: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            address: address.into(),
            online: true,
            registered_at: Utc::now(),
        }
    }
}

/// Check that `address` has the shape `host:port` with an integer port > 0.
///
/// Exactly one `:` separator is accepted, so bracketed IPv6 literals are
/// rejected. The host part is not inspected.
pub fn validate_address(address: &str) -> Result<(), PeerLinkError> {
    let parts: Vec<&str> = address.split(':').collect();
    if parts.len() != 2 {
        return Err(PeerLinkError::Malformed(format!(
            "address '{address}' must have the form host:port"
        )));
    }

    let port: i64 = parts[1].parse().map_err(|_| {
        PeerLinkError::Malformed(format!(
            "port '{}' in address '{address}' is not an integer",
            parts[1]
        ))
    })?;

    if port <= 0 {
        return Err(PeerLinkError::Malformed(format!(
            "port in address '{address}' must be greater than 0"
        )));
    }

    Ok(())
}
