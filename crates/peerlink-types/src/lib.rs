//! Core types and capability traits for the PeerLink messaging system.
//!
//! This crate defines the data model shared by the directory and clients,
//! the four-kind error taxonomy, and the traits behind which stores and
//! gateways are injected. It contains no business logic.

pub mod account;
pub mod cancel;
pub mod config;
pub mod error;
pub mod gateway;
pub mod message;
pub mod observe;
pub mod session;
pub mod store;
