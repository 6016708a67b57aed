//! PeerLink wire protocol: framed JSON request/response over TCP.
//!
//! Every PeerLink surface (the directory, a client's peer endpoint, and a
//! client's front endpoint for the local application) speaks the same
//! protocol: length-prefixed JSON envelopes, one response per request,
//! any number of requests per connection.
//!
//! The crate also provides the wire-backed [`DirectoryGateway`] and
//! [`PeerGateway`] implementations used by client logic.
//!
//! [`DirectoryGateway`]: peerlink_types::gateway::DirectoryGateway
//! [`PeerGateway`]: peerlink_types::gateway::PeerGateway

pub mod gateway;
pub mod message;
pub mod node;

pub use gateway::{WireDirectoryGateway, WirePeerGateway};
pub use message::{WireMessage, WireMessageKind, WireRequest, WireResponse};
pub use node::{call, NodeConfig, RequestContext, RequestHandler, WireError, WireNode};
