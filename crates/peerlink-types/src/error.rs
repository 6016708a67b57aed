//! Shared error types for the PeerLink system.
//!
//! Every component reports failures through [`PeerLinkError`], which carries
//! exactly one of four kinds. Collaborator errors (stores, transport) are
//! mapped into one of these kinds before they leave a component.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The four failure kinds shared by every component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller-supplied input failed a precondition.
    Malformed,
    /// Caller lacks the required prior state.
    Unauthorized,
    /// A referenced entity does not exist.
    NotFound,
    /// Infrastructure failure unrelated to caller input; safe to retry.
    Technical,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Malformed => write!(f, "malformed"),
            ErrorKind::Unauthorized => write!(f, "unauthorized"),
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::Technical => write!(f, "technical"),
        }
    }
}

/// Top-level error type for the PeerLink system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeerLinkError {
    /// Invalid input, detected before any state mutation.
    #[error("Malformed request: {0}")]
    Malformed(String),

    /// Missing credentials, identity, or account.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A store, gateway, or transport failure.
    #[error("Technical error: {0}")]
    Technical(String),
}

impl PeerLinkError {
    /// The kind tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PeerLinkError::Malformed(_) => ErrorKind::Malformed,
            PeerLinkError::Unauthorized(_) => ErrorKind::Unauthorized,
            PeerLinkError::NotFound(_) => ErrorKind::NotFound,
            PeerLinkError::Technical(_) => ErrorKind::Technical,
        }
    }

    /// The diagnostic message carried by this error.
    pub fn message(&self) -> &str {
        match self {
            PeerLinkError::Malformed(m)
            | PeerLinkError::Unauthorized(m)
            | PeerLinkError::NotFound(m)
            | PeerLinkError::Technical(m) => m,
        }
    }

    /// Rebuild an error from its kind tag and message (e.g. after crossing the wire).
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::Malformed => PeerLinkError::Malformed(message),
            ErrorKind::Unauthorized => PeerLinkError::Unauthorized(message),
            ErrorKind::NotFound => PeerLinkError::NotFound(message),
            ErrorKind::Technical => PeerLinkError::Technical(message),
        }
    }
}

/// Errors reported by the account, session, and conversation stores.
///
/// Absence is not an error: lookups return `Ok(None)` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The key already exists and the operation does not overwrite.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing store failed.
    #[error("Store failure: {0}")]
    Technical(String),
}

impl From<StoreError> for PeerLinkError {
    fn from(e: StoreError) -> Self {
        PeerLinkError::Technical(e.to_string())
    }
}

/// Alias for Result with PeerLinkError.
pub type PeerLinkResult<T> = Result<T, PeerLinkError>;

/// Alias for Result with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;
