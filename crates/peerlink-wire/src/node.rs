//! WireNode: TCP request/response server and client calls for the PeerLink wire protocol.
//!
//! A [`WireNode`] binds a local TCP listener, accepts connections, and
//! answers every framed request through a [`RequestHandler`]. The same node
//! type serves the directory surface, the peer surface, and the front
//! surface; only the handler differs.
//!
//! [`call`] is the outbound side: one connection, one request, one response,
//! abandoned as soon as the caller's [`CancelSignal`] fires.

use crate::message::*;

use async_trait::async_trait;
use peerlink_types::cancel::CancelSignal;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Errors from the wire protocol layer.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: u32, max: u32 },
    #[error("Call cancelled")]
    Cancelled,
    #[error("Unexpected message: {0}")]
    Unexpected(String),
}

/// Per-request information established by the transport.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Identity announced in the request envelope, if any.
    pub requester: Option<String>,
    /// Socket address of the caller.
    pub remote_addr: SocketAddr,
}

impl RequestContext {
    /// The requester, treating an empty string as absent.
    pub fn requester(&self) -> Option<&str> {
        self.requester.as_deref().filter(|r| !r.is_empty())
    }
}

/// Trait for the logic side to answer inbound requests.
///
/// `Ping` never reaches the handler; the node answers it itself.
#[async_trait]
pub trait RequestHandler: Send + Sync + 'static {
    /// Produce the response to one request.
    async fn handle(&self, ctx: &RequestContext, request: WireRequest) -> WireResponse;
}

/// Configuration for a WireNode.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Address to bind the listener on.
    pub listen_addr: String,
    /// Human-readable name used in logs.
    pub name: String,
}

/// A listening endpoint answering framed requests.
pub struct WireNode {
    config: NodeConfig,
    /// Actual bound address (useful when binding to port 0).
    local_addr: SocketAddr,
    start_time: Instant,
    shutdown_tx: watch::Sender<bool>,
}

impl WireNode {
    /// Bind the configured address and start accepting connections.
    pub async fn start(
        config: NodeConfig,
        handler: Arc<dyn RequestHandler>,
    ) -> Result<(Arc<Self>, tokio::task::JoinHandle<()>), WireError> {
        let listener = TcpListener::bind(config.listen_addr.as_str()).await?;
        let local_addr = listener.local_addr()?;

        info!(node = %config.name, "Wire: listening on {}", local_addr);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let node = Arc::new(Self {
            config,
            local_addr,
            start_time: Instant::now(),
            shutdown_tx,
        });

        let node_clone = Arc::clone(&node);
        let accept_handle = tokio::spawn(async move {
            Self::accept_loop(listener, node_clone, handler, shutdown_rx).await;
        });

        Ok((node, accept_handle))
    }

    /// Get the actual bound address.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Get the node name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Seconds since the node started.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Stop accepting new connections and close open ones.
    ///
    /// A request already being handled is answered before its connection
    /// closes; idle connections close immediately.
    pub fn shutdown(&self) {
        info!(node = %self.config.name, "Wire: shutting down");
        let _ = self.shutdown_tx.send(true);
    }

    /// Internal accept loop, run in a spawned task.
    async fn accept_loop(
        listener: TcpListener,
        node: Arc<WireNode>,
        handler: Arc<dyn RequestHandler>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            let accepted = tokio::select! {
                res = listener.accept() => res,
                _ = shutdown.changed() => {
                    debug!(node = %node.config.name, "Wire: accept loop stopped");
                    return;
                }
            };

            match accepted {
                Ok((stream, addr)) => {
                    debug!(node = %node.config.name, "Wire: accepted connection from {}", addr);
                    let node = Arc::clone(&node);
                    let handler = Arc::clone(&handler);
                    let shutdown = shutdown.clone();
                    tokio::spawn(async move {
                        if let Err(e) =
                            connection_loop(stream, addr, &node, &*handler, shutdown).await
                        {
                            debug!(
                                node = %node.config.name,
                                "Wire: connection from {} ended: {}", addr, e
                            );
                        }
                    });
                }
                Err(e) => {
                    error!(node = %node.config.name, "Wire: accept error: {}", e);
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }
    }
}

/// Read/answer loop for one inbound connection.
async fn connection_loop(
    stream: TcpStream,
    addr: SocketAddr,
    node: &WireNode,
    handler: &dyn RequestHandler,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), WireError> {
    let (mut reader, mut writer) = stream.into_split();

    loop {
        // A receiver cloned after shutdown never sees the change; check the value too.
        if *shutdown.borrow() {
            return Ok(());
        }
        let read = tokio::select! {
            res = read_message(&mut reader) => res,
            _ = shutdown.changed() => {
                debug!(node = %node.config.name, "Wire: closing connection from {}", addr);
                return Ok(());
            }
        };
        let msg = match read {
            Ok(m) => m,
            Err(WireError::ConnectionClosed) => return Ok(()),
            Err(e) => return Err(e),
        };

        let response = match msg.kind {
            WireMessageKind::Request(WireRequest::Ping) => WireResponse::Pong {
                uptime_secs: node.uptime_secs(),
            },
            WireMessageKind::Request(request) => {
                let ctx = RequestContext {
                    requester: msg.requester,
                    remote_addr: addr,
                };
                debug!(
                    node = %node.config.name,
                    method = request.method(),
                    requester = ctx.requester().unwrap_or("-"),
                    "Wire: request"
                );
                handler.handle(&ctx, request).await
            }
            // We don't expect to receive responses on a serving connection
            WireMessageKind::Response(_) => {
                warn!(
                    node = %node.config.name,
                    "Wire: unexpected response message from {}: {:?}", addr, msg.id
                );
                continue;
            }
        };

        write_message(&mut writer, &WireMessage::response(msg.id, response)).await?;
    }
}

/// Send one request to `addr` and await its response.
///
/// Opens a fresh connection per call. No retries; if `cancel` fires first the
/// call is abandoned with [`WireError::Cancelled`].
pub async fn call(
    addr: &str,
    requester: Option<&str>,
    request: WireRequest,
    cancel: &CancelSignal,
) -> Result<WireResponse, WireError> {
    if cancel.is_cancelled() {
        return Err(WireError::Cancelled);
    }
    let msg = WireMessage::request(requester, request);

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(WireError::Cancelled),
        res = exchange(addr, &msg) => res,
    }
}

async fn exchange(addr: &str, msg: &WireMessage) -> Result<WireResponse, WireError> {
    let stream = TcpStream::connect(addr).await?;
    let (mut reader, mut writer) = stream.into_split();

    write_message(&mut writer, msg).await?;
    let response = read_message(&mut reader).await?;

    if response.id != msg.id {
        return Err(WireError::Unexpected(format!(
            "response id {} does not match request id {}",
            response.id, msg.id
        )));
    }
    match response.kind {
        WireMessageKind::Response(resp) => Ok(resp),
        WireMessageKind::Request(req) => Err(WireError::Unexpected(format!(
            "got request '{}' where a response was expected",
            req.method()
        ))),
    }
}

/// Write a framed message (4-byte length + JSON) to a stream.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    msg: &WireMessage,
) -> Result<(), WireError> {
    let bytes = encode_message(msg)?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

/// Read a framed message (4-byte length + JSON) from a stream.
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<WireMessage, WireError> {
    let mut header = [0u8; 4];
    match reader.read_exact(&mut header).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(WireError::ConnectionClosed);
        }
        Err(e) => return Err(WireError::Io(e)),
    }

    let len = decode_length(&header);
    if len > MAX_MESSAGE_SIZE {
        return Err(WireError::MessageTooLarge {
            size: len,
            max: MAX_MESSAGE_SIZE,
        });
    }

    let mut body = vec![0u8; len as usize];
    reader.read_exact(&mut body).await?;

    let msg = decode_message(&body)?;
    Ok(msg)
}
