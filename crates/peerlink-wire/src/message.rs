//! Wire protocol message types.
//!
//! All PeerLink traffic (client to directory, client to client, local
//! application to client) uses JSON-framed messages over TCP. Each message is
//! prefixed with a 4-byte big-endian length header.

use peerlink_types::error::{ErrorKind, PeerLinkError};
use peerlink_types::message::Message;
use peerlink_types::session::Session;
use serde::{Deserialize, Serialize};

/// A wire protocol message (envelope).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    /// Unique message ID. A response echoes the ID of its request.
    pub id: String,
    /// Identity of the caller, established by the transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<String>,
    /// Message variant.
    #[serde(flatten)]
    pub kind: WireMessageKind,
}

/// The different kinds of wire messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WireMessageKind {
    /// Request from a caller.
    #[serde(rename = "request")]
    Request(WireRequest),
    /// Response to a request.
    #[serde(rename = "response")]
    Response(WireResponse),
}

/// Request messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum WireRequest {
    /// Liveness check, answered by every node.
    #[serde(rename = "ping")]
    Ping,
    /// Directory: authenticate and announce a reachable address.
    #[serde(rename = "start_session")]
    StartSession {
        login: String,
        password: String,
        /// Falls back to the caller's socket address when absent.
        #[serde(default)]
        address: Option<String>,
    },
    /// Directory: resolve another user's session.
    #[serde(rename = "provide_session")]
    ProvideSession { target: String },
    /// Peer: inbound message authored by the envelope's requester.
    #[serde(rename = "deliver_message")]
    DeliverMessage { content: String },
    /// Front: register this client with the directory.
    #[serde(rename = "register_session")]
    RegisterSession {
        login: String,
        password: String,
        /// Falls back to the client's advertised address when absent.
        #[serde(default)]
        address: Option<String>,
    },
    /// Front: send a message to another user.
    #[serde(rename = "send_message")]
    SendMessage { to: String, content: String },
    /// Front: read the local conversation with a peer.
    #[serde(rename = "get_conversation")]
    GetConversation { with: String },
}

impl WireRequest {
    /// Short method name, for logs.
    pub fn method(&self) -> &'static str {
        match self {
            WireRequest::Ping => "ping",
            WireRequest::StartSession { .. } => "start_session",
            WireRequest::ProvideSession { .. } => "provide_session",
            WireRequest::DeliverMessage { .. } => "deliver_message",
            WireRequest::RegisterSession { .. } => "register_session",
            WireRequest::SendMessage { .. } => "send_message",
            WireRequest::GetConversation { .. } => "get_conversation",
        }
    }
}

/// Response messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum WireResponse {
    /// Pong response.
    #[serde(rename = "pong")]
    Pong {
        /// Uptime in seconds.
        uptime_secs: u64,
    },
    /// Success without payload.
    #[serde(rename = "ok")]
    Ok,
    /// A resolved session.
    #[serde(rename = "session")]
    Session { session: Session },
    /// A conversation, oldest message first.
    #[serde(rename = "conversation")]
    Conversation { messages: Vec<Message> },
    /// Error response.
    #[serde(rename = "error")]
    Error { kind: ErrorKind, message: String },
}

impl From<&PeerLinkError> for WireResponse {
    fn from(e: &PeerLinkError) -> Self {
        WireResponse::Error {
            kind: e.kind(),
            message: e.message().to_string(),
        }
    }
}

impl From<PeerLinkError> for WireResponse {
    fn from(e: PeerLinkError) -> Self {
        WireResponse::from(&e)
    }
}

impl WireResponse {
    /// The carried error, if this is an error response.
    pub fn as_error(&self) -> Option<PeerLinkError> {
        match self {
            WireResponse::Error { kind, message } => {
                Some(PeerLinkError::from_kind(*kind, message.clone()))
            }
            _ => None,
        }
    }
}

impl WireMessage {
    /// Build a request envelope with a fresh ID.
    pub fn request(requester: Option<&str>, request: WireRequest) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            requester: requester.map(|r| r.to_string()),
            kind: WireMessageKind::Request(request),
        }
    }

    /// Build the response envelope answering request `id`.
    pub fn response(id: impl Into<String>, response: WireResponse) -> Self {
        Self {
            id: id.into(),
            requester: None,
            kind: WireMessageKind::Response(response),
        }
    }
}

/// Maximum single message size (16 MB).
pub const MAX_MESSAGE_SIZE: u32 = 16 * 1024 * 1024;

/// Encode a wire message to bytes (4-byte big-endian length + JSON).
pub fn encode_message(msg: &WireMessage) -> Result<Vec<u8>, serde_json::Error> {
    let json = serde_json::to_vec(msg)?;
    let len = json.len() as u32;
    let mut bytes = Vec::with_capacity(4 + json.len());
    bytes.extend_from_slice(&len.to_be_bytes());
    bytes.extend_from_slice(&json);
    Ok(bytes)
}

/// Decode the length prefix from a 4-byte header.
pub fn decode_length(header: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*header)
}

/// Parse a JSON body into a WireMessage.
pub fn decode_message(body: &[u8]) -> Result<WireMessage, serde_json::Error> {
    serde_json::from_slice(body)
}
