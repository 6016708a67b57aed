//! Inbound surfaces: map wire requests onto directory, receiver, and front logic.
//!
//! Each router owns the boundary checks of its surface (empty fields,
//! missing requester) so the logic components only see well-formed input.

use crate::directory::DirectoryService;
use crate::front::ClientFront;
use crate::receiver::PeerReceiver;

use async_trait::async_trait;
use peerlink_types::cancel::CancelSignal;
use peerlink_types::error::{PeerLinkError, PeerLinkResult};
use peerlink_types::gateway::DirectoryGateway;
use peerlink_types::session::Session;
use peerlink_wire::{RequestContext, RequestHandler, WireRequest, WireResponse};
use std::sync::Arc;
use std::time::Duration;

fn require(field: &str, value: &str) -> PeerLinkResult<()> {
    if value.is_empty() {
        return Err(PeerLinkError::Malformed(format!("'{field}' must not be empty")));
    }
    Ok(())
}

fn require_requester(ctx: &RequestContext) -> PeerLinkResult<String> {
    ctx.requester()
        .map(|r| r.to_string())
        .ok_or_else(|| PeerLinkError::Unauthorized("requester identity is missing".to_string()))
}

fn not_served(surface: &str, request: &WireRequest) -> WireResponse {
    PeerLinkError::Malformed(format!(
        "method '{}' is not served by the {surface}",
        request.method()
    ))
    .into()
}

fn respond<T>(result: PeerLinkResult<T>, ok: impl FnOnce(T) -> WireResponse) -> WireResponse {
    match result {
        Ok(value) => ok(value),
        Err(e) => e.into(),
    }
}

/// Directory surface: `StartSession`, `ProvideSession`.
pub struct DirectoryRouter {
    service: Arc<DirectoryService>,
}

impl DirectoryRouter {
    /// Serve `service` on the directory surface.
    pub fn new(service: Arc<DirectoryService>) -> Self {
        Self { service }
    }

    async fn start_session(
        &self,
        ctx: &RequestContext,
        login: &str,
        password: &str,
        address: Option<String>,
    ) -> PeerLinkResult<()> {
        require("login", login)?;
        require("password", password)?;
        let address = address
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| ctx.remote_addr.to_string());
        self.service.start_session(login, password, &address).await
    }

    async fn provide_session(
        &self,
        ctx: &RequestContext,
        target: &str,
    ) -> PeerLinkResult<Session> {
        let requester = require_requester(ctx)?;
        require("target", target)?;
        self.service.provide_user_session(&requester, target).await
    }
}

#[async_trait]
impl RequestHandler for DirectoryRouter {
    async fn handle(&self, ctx: &RequestContext, request: WireRequest) -> WireResponse {
        match request {
            WireRequest::StartSession {
                login,
                password,
                address,
            } => respond(
                self.start_session(ctx, &login, &password, address).await,
                |()| WireResponse::Ok,
            ),
            WireRequest::ProvideSession { target } => respond(
                self.provide_session(ctx, &target).await,
                |session| WireResponse::Session { session },
            ),
            other => not_served("directory", &other),
        }
    }
}

/// Peer surface: `DeliverMessage`.
pub struct PeerRouter {
    receiver: Arc<PeerReceiver>,
}

impl PeerRouter {
    /// Serve `receiver` on the peer surface.
    pub fn new(receiver: Arc<PeerReceiver>) -> Self {
        Self { receiver }
    }

    async fn deliver(&self, ctx: &RequestContext, content: &str) -> PeerLinkResult<()> {
        let author = require_requester(ctx)?;
        require("content", content)?;
        self.receiver.on_message_received(content, &author).await
    }
}

#[async_trait]
impl RequestHandler for PeerRouter {
    async fn handle(&self, ctx: &RequestContext, request: WireRequest) -> WireResponse {
        match request {
            WireRequest::DeliverMessage { content } => {
                respond(self.deliver(ctx, &content).await, |()| WireResponse::Ok)
            }
            other => not_served("peer endpoint", &other),
        }
    }
}

/// Front surface used by the local application.
///
/// Registration is proxied to the directory; the front logic only learns
/// about it once the directory has accepted.
pub struct FrontRouter {
    front: Arc<ClientFront>,
    directory: Arc<dyn DirectoryGateway>,
    advertise_addr: String,
    call_timeout: Duration,
}

impl FrontRouter {
    /// Serve `front`, registering through `directory` and arming
    /// `call_timeout` on every outbound call.
    pub fn new(
        front: Arc<ClientFront>,
        directory: Arc<dyn DirectoryGateway>,
        advertise_addr: impl Into<String>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            front,
            directory,
            advertise_addr: advertise_addr.into(),
            call_timeout,
        }
    }

    async fn register(
        &self,
        login: &str,
        password: &str,
        address: Option<String>,
    ) -> PeerLinkResult<()> {
        require("login", login)?;
        require("password", password)?;
        let address = address
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| self.advertise_addr.clone());

        let cancel = CancelSignal::with_deadline(self.call_timeout);
        self.directory
            .register_session(login, password, &address, &cancel)
            .await?;
        self.front.on_session_registered(login);
        Ok(())
    }

    async fn send(&self, to: &str, content: &str) -> PeerLinkResult<()> {
        require("to", to)?;
        require("content", content)?;
        let cancel = CancelSignal::with_deadline(self.call_timeout);
        self.front.send_message_to_peer(to, content, &cancel).await
    }
}

#[async_trait]
impl RequestHandler for FrontRouter {
    async fn handle(&self, _ctx: &RequestContext, request: WireRequest) -> WireResponse {
        match request {
            WireRequest::RegisterSession {
                login,
                password,
                address,
            } => respond(self.register(&login, &password, address).await, |()| {
                WireResponse::Ok
            }),
            WireRequest::SendMessage { to, content } => {
                respond(self.send(&to, &content).await, |()| WireResponse::Ok)
            }
            WireRequest::GetConversation { with } => {
                let result = match require("with", &with) {
                    Ok(()) => self.front.get_conversation_with(&with).await,
                    Err(e) => Err(e),
                };
                respond(result, |messages| WireResponse::Conversation { messages })
            }
            other => not_served("client front", &other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingObserver, RecordingPeers, ScriptedDirectory};
    use peerlink_memory::{InMemoryConversationLog, InMemorySessionRegistry, InMemoryUserRegistry};
    use peerlink_types::error::ErrorKind;
    use peerlink_types::message::Message;
    use peerlink_types::store::{ConversationLog, SessionRegistry, UserRegistry};

    fn ctx(requester: Option<&str>) -> RequestContext {
        RequestContext {
            requester: requester.map(|r| r.to_string()),
            remote_addr: "10.0.0.7:5555".parse().unwrap(),
        }
    }

    fn error_kind(resp: &WireResponse) -> Option<ErrorKind> {
        resp.as_error().map(|e| e.kind())
    }

    async fn directory_router() -> (DirectoryRouter, Arc<InMemorySessionRegistry>) {
        let users = Arc::new(InMemoryUserRegistry::new());
        users.insert("alice", "pw1").await.unwrap();
        let sessions = Arc::new(InMemorySessionRegistry::new());
        let service = DirectoryService::new(
            users,
            sessions.clone(),
            Arc::new(RecordingObserver::default()),
        );
        (DirectoryRouter::new(Arc::new(service)), sessions)
    }

    #[tokio::test]
    async fn test_start_session_address_falls_back_to_socket() {
        let (router, sessions) = directory_router().await;
        let resp = router
            .handle(
                &ctx(None),
                WireRequest::StartSession {
                    login: "alice".to_string(),
                    password: "pw1".to_string(),
                    address: None,
                },
            )
            .await;
        assert_eq!(resp, WireResponse::Ok);
        let session = sessions.get("alice").await.unwrap().unwrap();
        assert_eq!(session.address, "10.0.0.7:5555");
    }

    #[tokio::test]
    async fn test_start_session_empty_login_malformed() {
        let (router, _) = directory_router().await;
        let resp = router
            .handle(
                &ctx(None),
                WireRequest::StartSession {
                    login: String::new(),
                    password: "pw1".to_string(),
                    address: Some("a:1".to_string()),
                },
            )
            .await;
        assert_eq!(error_kind(&resp), Some(ErrorKind::Malformed));
    }

    #[tokio::test]
    async fn test_provide_session_requires_requester() {
        let (router, _) = directory_router().await;
        for requester in [None, Some("")] {
            let resp = router
                .handle(
                    &ctx(requester),
                    WireRequest::ProvideSession {
                        target: "alice".to_string(),
                    },
                )
                .await;
            assert_eq!(error_kind(&resp), Some(ErrorKind::Unauthorized));
        }
    }

    #[tokio::test]
    async fn test_directory_rejects_front_methods() {
        let (router, _) = directory_router().await;
        let resp = router
            .handle(
                &ctx(Some("alice")),
                WireRequest::GetConversation {
                    with: "bob".to_string(),
                },
            )
            .await;
        assert_eq!(error_kind(&resp), Some(ErrorKind::Malformed));
    }

    #[tokio::test]
    async fn test_peer_router_checks_boundary() {
        let log = Arc::new(InMemoryConversationLog::new());
        let receiver = PeerReceiver::new(log.clone(), Arc::new(RecordingObserver::default()));
        let router = PeerRouter::new(Arc::new(receiver));

        let anon = router
            .handle(
                &ctx(None),
                WireRequest::DeliverMessage {
                    content: "hi".to_string(),
                },
            )
            .await;
        assert_eq!(error_kind(&anon), Some(ErrorKind::Unauthorized));

        let empty = router
            .handle(
                &ctx(Some("alice")),
                WireRequest::DeliverMessage {
                    content: String::new(),
                },
            )
            .await;
        assert_eq!(error_kind(&empty), Some(ErrorKind::Malformed));

        let ok = router
            .handle(
                &ctx(Some("alice")),
                WireRequest::DeliverMessage {
                    content: "hi".to_string(),
                },
            )
            .await;
        assert_eq!(ok, WireResponse::Ok);
        assert_eq!(log.read("alice").await.unwrap(), vec![Message::new("alice", "hi")]);
    }

    fn front_router(directory: Arc<ScriptedDirectory>) -> (FrontRouter, Arc<ClientFront>) {
        let front = Arc::new(ClientFront::new(
            Arc::new(InMemoryConversationLog::new()),
            directory.clone(),
            Arc::new(RecordingPeers::default()),
            Arc::new(RecordingObserver::default()),
        ));
        let router = FrontRouter::new(
            front.clone(),
            directory,
            "me.local:4000",
            Duration::from_secs(5),
        );
        (router, front)
    }

    #[tokio::test]
    async fn test_register_proxies_then_authenticates() {
        let directory = Arc::new(ScriptedDirectory::answering(Ok(Session::new("bob", "b:1"))));
        let (router, front) = front_router(directory.clone());

        let resp = router
            .handle(
                &ctx(None),
                WireRequest::RegisterSession {
                    login: "alice".to_string(),
                    password: "pw1".to_string(),
                    address: None,
                },
            )
            .await;
        assert_eq!(resp, WireResponse::Ok);
        assert_eq!(front.identity().as_deref(), Some("alice"));
        assert_eq!(
            directory.registered.lock().unwrap()[0],
            (
                "alice".to_string(),
                "pw1".to_string(),
                "me.local:4000".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_rejected_registration_leaves_front_unauthenticated() {
        let directory = Arc::new(ScriptedDirectory::answering(Ok(Session::new("bob", "b:1"))));
        let (router, front) = front_router(directory);

        let resp = router
            .handle(
                &ctx(None),
                WireRequest::RegisterSession {
                    login: "alice".to_string(),
                    password: "wrong".to_string(),
                    address: Some("a:1111".to_string()),
                },
            )
            .await;
        assert_eq!(error_kind(&resp), Some(ErrorKind::Unauthorized));
        assert!(front.identity().is_none());
    }

    #[tokio::test]
    async fn test_front_send_and_read() {
        let directory = Arc::new(ScriptedDirectory::answering(Ok(Session::new("bob", "b:1"))));
        let (router, front) = front_router(directory);
        front.on_session_registered("alice");

        let empty = router
            .handle(
                &ctx(None),
                WireRequest::SendMessage {
                    to: "bob".to_string(),
                    content: String::new(),
                },
            )
            .await;
        assert_eq!(error_kind(&empty), Some(ErrorKind::Malformed));

        let sent = router
            .handle(
                &ctx(None),
                WireRequest::SendMessage {
                    to: "bob".to_string(),
                    content: "hi".to_string(),
                },
            )
            .await;
        assert_eq!(sent, WireResponse::Ok);

        let read = router
            .handle(
                &ctx(None),
                WireRequest::GetConversation {
                    with: "bob".to_string(),
                },
            )
            .await;
        assert_eq!(
            read,
            WireResponse::Conversation {
                messages: vec![Message::new("alice", "hi")]
            }
        );
    }
}
