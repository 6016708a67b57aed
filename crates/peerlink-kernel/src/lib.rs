//! PeerLink kernel: directory and client logic, their inbound routers, and
//! the bootable roles that wire them to the network.
//!
//! - [`directory::DirectoryService`]: authenticates users, stores and resolves sessions
//! - [`front::ClientFront`]: the client's identity state machine and outgoing messages
//! - [`receiver::PeerReceiver`]: records messages arriving from other clients
//! - [`kernel::DirectoryKernel`] / [`kernel::ClientKernel`]: boot and shut down nodes

pub mod config;
pub mod directory;
pub mod error;
pub mod front;
pub mod kernel;
pub mod receiver;
pub mod router;

mod observed;

#[cfg(test)]
mod testing;

pub use error::{KernelError, KernelResult};
pub use kernel::{ClientKernel, DirectoryKernel};
