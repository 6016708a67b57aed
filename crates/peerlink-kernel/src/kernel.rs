//! Bootable roles: a directory node and a client node.
//!
//! Booting wires stores, logic, and routers together and starts the wire
//! servers. Each kernel keeps its servers alive until [`shutdown`] is called.
//!
//! [`shutdown`]: DirectoryKernel::shutdown

use crate::directory::DirectoryService;
use crate::error::{KernelError, KernelResult};
use crate::front::ClientFront;
use crate::receiver::PeerReceiver;
use crate::router::{DirectoryRouter, FrontRouter, PeerRouter};

use peerlink_memory::{InMemoryConversationLog, InMemorySessionRegistry, InMemoryUserRegistry};
use peerlink_types::config::{ClientConfig, DirectoryConfig};
use peerlink_types::error::StoreError;
use peerlink_types::observe::TracingObserver;
use peerlink_types::store::{ConversationLog, UserRegistry};
use peerlink_wire::{NodeConfig, WireDirectoryGateway, WireNode, WirePeerGateway};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Whether peers could connect to `addr` as announced.
fn is_dialable(addr: &SocketAddr) -> bool {
    !addr.ip().is_unspecified()
}

async fn start_node(
    listen_addr: &str,
    name: &str,
    handler: Arc<dyn peerlink_wire::RequestHandler>,
) -> KernelResult<(Arc<WireNode>, JoinHandle<()>)> {
    let config = NodeConfig {
        listen_addr: listen_addr.to_string(),
        name: name.to_string(),
    };
    WireNode::start(config, handler)
        .await
        .map_err(|e| KernelError::BootFailed(format!("{name} could not listen on {listen_addr}: {e}")))
}

/// A running directory.
pub struct DirectoryKernel {
    service: Arc<DirectoryService>,
    node: Arc<WireNode>,
    accept_task: JoinHandle<()>,
}

impl DirectoryKernel {
    /// Seed the configured accounts and start serving.
    ///
    /// A login listed twice is a boot failure.
    pub async fn boot(config: &DirectoryConfig) -> KernelResult<Self> {
        let users = Arc::new(InMemoryUserRegistry::new());
        for account in &config.accounts {
            users
                .insert(&account.login, &account.password)
                .await
                .map_err(|e| match e {
                    StoreError::Conflict(msg) => {
                        KernelError::BootFailed(format!("duplicate account in config: {msg}"))
                    }
                    other => KernelError::BootFailed(other.to_string()),
                })?;
        }
        info!(accounts = users.len(), "Directory accounts seeded");

        let service = Arc::new(DirectoryService::new(
            users,
            Arc::new(InMemorySessionRegistry::new()),
            TracingObserver::shared("directory"),
        ));
        let router = Arc::new(DirectoryRouter::new(Arc::clone(&service)));
        let (node, accept_task) = start_node(&config.listen_addr, "directory", router).await?;

        info!(node = node.name(), addr = %node.local_addr(), "Directory booted");
        Ok(Self {
            service,
            node,
            accept_task,
        })
    }

    /// Bound address of the directory.
    pub fn local_addr(&self) -> SocketAddr {
        self.node.local_addr()
    }

    /// The directory logic, for in-process callers.
    pub fn service(&self) -> &Arc<DirectoryService> {
        &self.service
    }

    /// Stop accepting connections and wait for the accept loop to exit.
    pub async fn shutdown(self) {
        self.node.shutdown();
        let _ = self.accept_task.await;
        info!(node = self.node.name(), "Directory stopped");
    }
}

/// A running client: a front endpoint for the local application and a peer
/// endpoint for other clients, sharing one conversation log.
pub struct ClientKernel {
    front: Arc<ClientFront>,
    conversations: Arc<InMemoryConversationLog>,
    front_node: Arc<WireNode>,
    peer_node: Arc<WireNode>,
    tasks: Vec<JoinHandle<()>>,
    advertise_addr: String,
}

impl ClientKernel {
    /// Start the peer endpoint, then the front endpoint.
    pub async fn boot(config: &ClientConfig) -> KernelResult<Self> {
        let conversations = Arc::new(InMemoryConversationLog::new());
        let log: Arc<dyn ConversationLog> = conversations.clone();

        let receiver = Arc::new(PeerReceiver::new(
            Arc::clone(&log),
            TracingObserver::shared("receiver"),
        ));
        let (peer_node, peer_task) =
            start_node(&config.p2p_listen, "peer", Arc::new(PeerRouter::new(receiver))).await?;

        let advertise_addr = match &config.advertise_addr {
            Some(addr) => addr.clone(),
            None => {
                let bound = peer_node.local_addr();
                if !is_dialable(&bound) {
                    warn!(
                        p2p = %bound,
                        "Peer endpoint bound to an unspecified address; other clients cannot \
                         dial it. Set client.advertise_addr"
                    );
                }
                bound.to_string()
            }
        };

        let directory = Arc::new(WireDirectoryGateway::new(config.directory_addr.clone()));
        let front = Arc::new(ClientFront::new(
            log,
            directory.clone(),
            Arc::new(WirePeerGateway::new()),
            TracingObserver::shared("front"),
        ));
        let router = FrontRouter::new(
            Arc::clone(&front),
            directory.clone(),
            advertise_addr.clone(),
            Duration::from_secs(config.call_timeout_secs),
        );

        let (front_node, front_task) =
            match start_node(&config.api_listen, "front", Arc::new(router)).await {
                Ok(started) => started,
                Err(e) => {
                    peer_node.shutdown();
                    return Err(e);
                }
            };

        info!(
            api = %front_node.local_addr(),
            p2p = %peer_node.local_addr(),
            advertise = %advertise_addr,
            directory = directory.directory_addr(),
            "Client booted"
        );
        Ok(Self {
            front,
            conversations,
            front_node,
            peer_node,
            tasks: vec![peer_task, front_task],
            advertise_addr,
        })
    }

    /// Bound address of the front endpoint.
    pub fn api_addr(&self) -> SocketAddr {
        self.front_node.local_addr()
    }

    /// Bound address of the peer endpoint.
    pub fn p2p_addr(&self) -> SocketAddr {
        self.peer_node.local_addr()
    }

    /// Address registered with the directory when none is given.
    pub fn advertise_addr(&self) -> &str {
        &self.advertise_addr
    }

    /// The front logic, for in-process callers.
    pub fn front(&self) -> &Arc<ClientFront> {
        &self.front
    }

    /// Peers this client has exchanged messages with.
    pub fn peers(&self) -> Vec<String> {
        self.conversations.peers()
    }

    /// Stop both endpoints and wait for their accept loops to exit.
    pub async fn shutdown(self) {
        self.front_node.shutdown();
        self.peer_node.shutdown();
        for task in self.tasks {
            let _ = task.await;
        }
        info!(
            front = self.front_node.name(),
            peer = self.peer_node.name(),
            "Client stopped"
        );
    }
}
