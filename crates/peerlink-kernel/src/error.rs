//! Kernel-specific error types.

use peerlink_types::error::PeerLinkError;
use thiserror::Error;

/// Kernel error type wrapping PeerLinkError with boot context.
#[derive(Error, Debug)]
pub enum KernelError {
    /// A wrapped PeerLinkError.
    #[error(transparent)]
    PeerLink(#[from] PeerLinkError),

    /// A node failed to boot (bind failure, bad seed data).
    #[error("Boot failed: {0}")]
    BootFailed(String),
}

/// Alias for kernel results.
pub type KernelResult<T> = Result<T, KernelError>;
