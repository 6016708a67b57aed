//! Client front: the part of a client facing its own local application.
//!
//! Holds the client's identity once a registration has succeeded, resolves
//! peers through the directory, keeps the local conversation log, and hands
//! outgoing messages to the peer gateway.

use crate::observed::observed;

use peerlink_types::cancel::CancelSignal;
use peerlink_types::error::{PeerLinkError, PeerLinkResult};
use peerlink_types::gateway::{DirectoryGateway, PeerGateway};
use peerlink_types::message::Message;
use peerlink_types::observe::Observer;
use peerlink_types::store::ConversationLog;
use std::sync::{Arc, RwLock};

/// Authentication state of a client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FrontState {
    /// No registration has succeeded yet.
    #[default]
    Unauthenticated,
    /// Registered with the directory as `identity`.
    Authenticated { identity: String },
}

/// Client front logic.
pub struct ClientFront {
    state: RwLock<FrontState>,
    conversations: Arc<dyn ConversationLog>,
    directory: Arc<dyn DirectoryGateway>,
    peers: Arc<dyn PeerGateway>,
    observer: Arc<dyn Observer>,
}

impl ClientFront {
    /// Create an unauthenticated front over the given log and gateways.
    pub fn new(
        conversations: Arc<dyn ConversationLog>,
        directory: Arc<dyn DirectoryGateway>,
        peers: Arc<dyn PeerGateway>,
        observer: Arc<dyn Observer>,
    ) -> Self {
        Self {
            state: RwLock::new(FrontState::Unauthenticated),
            conversations,
            directory,
            peers,
            observer,
        }
    }

    /// Current state.
    pub fn state(&self) -> FrontState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The registered identity, if any.
    pub fn identity(&self) -> Option<String> {
        match self.state() {
            FrontState::Authenticated { identity } => Some(identity),
            FrontState::Unauthenticated => None,
        }
    }

    /// Record that `username` has registered with the directory.
    ///
    /// A later registration replaces the identity; there is no way back to
    /// `Unauthenticated`.
    pub fn on_session_registered(&self, username: &str) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = FrontState::Authenticated {
            identity: username.to_string(),
        };
        self.observer.event(
            "on_session_registered",
            &format!("registered as '{username}'"),
        );
    }

    /// Send `content` to `to`.
    ///
    /// Order: resolve the peer, append to the local log, deliver. A log
    /// failure does not prevent delivery but still fails the call.
    pub async fn send_message_to_peer(
        &self,
        to: &str,
        content: &str,
        cancel: &CancelSignal,
    ) -> PeerLinkResult<()> {
        observed(
            &*self.observer,
            "send_message_to_peer",
            self.send(to, content, cancel),
        )
        .await
    }

    /// The conversation with `peer`, oldest first.
    pub async fn get_conversation_with(&self, peer: &str) -> PeerLinkResult<Vec<Message>> {
        let read = async move {
            self.conversations
                .read(peer)
                .await
                .map_err(PeerLinkError::from)
        };
        observed(&*self.observer, "get_conversation_with", read).await
    }

    async fn send(&self, to: &str, content: &str, cancel: &CancelSignal) -> PeerLinkResult<()> {
        let Some(identity) = self.identity() else {
            return Err(PeerLinkError::Unauthorized(
                "no session registered on this client".to_string(),
            ));
        };

        // Inputs were validated at the router; a malformed verdict is the directory's fault.
        let session = self
            .directory
            .ask_session(&identity, to, cancel)
            .await
            .map_err(|e| match e {
                PeerLinkError::Malformed(m) => PeerLinkError::Technical(format!(
                    "directory rejected lookup for '{to}': {m}"
                )),
                other => other,
            })?;

        let logged: PeerLinkResult<()> = self
            .conversations
            .append(to, &identity, content)
            .await
            .map_err(PeerLinkError::from);
        if let Err(e) = &logged {
            self.observer.failure("log_outgoing", e);
        }

        let message = Message::new(identity.as_str(), content);
        self.peers
            .deliver(&session.address, &message, &identity, cancel)
            .await
            .map_err(|e| {
                PeerLinkError::Technical(format!(
                    "delivery to '{to}' at {} failed: {}",
                    session.address,
                    e.message()
                ))
            })?;

        self.observer.event(
            "send_message_to_peer",
            &format!("'{identity}' delivered to '{to}' at {}", session.address),
        );
        logged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        ambient_output, block_on, FailingLog, RecordingObserver, RecordingPeers,
        ScriptedDirectory,
    };
    use peerlink_memory::InMemoryConversationLog;
    use peerlink_types::error::ErrorKind;
    use peerlink_types::session::Session;

    struct Fixture {
        front: ClientFront,
        log: Arc<InMemoryConversationLog>,
        directory: Arc<ScriptedDirectory>,
        peers: Arc<RecordingPeers>,
        observer: Arc<RecordingObserver>,
    }

    fn fixture(answer: PeerLinkResult<Session>, peers: RecordingPeers) -> Fixture {
        let log = Arc::new(InMemoryConversationLog::new());
        let directory = Arc::new(ScriptedDirectory::answering(answer));
        let peers = Arc::new(peers);
        let observer = Arc::new(RecordingObserver::default());
        Fixture {
            front: ClientFront::new(
                log.clone(),
                directory.clone(),
                peers.clone(),
                observer.clone(),
            ),
            log,
            directory,
            peers,
            observer,
        }
    }

    fn bob_at(addr: &str) -> PeerLinkResult<Session> {
        Ok(Session::new("bob", addr))
    }

    #[tokio::test]
    async fn test_unauthenticated_send_makes_no_calls() {
        let f = fixture(bob_at("b:2222"), RecordingPeers::default());
        assert_eq!(f.front.state(), FrontState::Unauthenticated);

        let err = f
            .front
            .send_message_to_peer("bob", "hi", &CancelSignal::never())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(f.directory.asked.lock().unwrap().is_empty());
        assert!(f.peers.delivered.lock().unwrap().is_empty());
        assert!(f.log.read("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_logs_and_delivers() {
        let f = fixture(bob_at("b:2222"), RecordingPeers::default());
        f.front.on_session_registered("alice");

        f.front
            .send_message_to_peer("bob", "hi", &CancelSignal::never())
            .await
            .unwrap();

        assert_eq!(
            f.directory.asked.lock().unwrap()[0],
            ("alice".to_string(), "bob".to_string())
        );
        let delivered = f.peers.delivered.lock().unwrap();
        assert_eq!(delivered[0].0, "b:2222");
        assert_eq!(delivered[0].1, Message::new("alice", "hi"));
        assert_eq!(delivered[0].2, "alice");
        drop(delivered);

        let history = f.front.get_conversation_with("bob").await.unwrap();
        assert_eq!(history, vec![Message::new("alice", "hi")]);
    }

    #[tokio::test]
    async fn test_directory_error_kind_propagates() {
        for kind in [
            ErrorKind::NotFound,
            ErrorKind::Unauthorized,
            ErrorKind::Technical,
        ] {
            let f = fixture(
                Err(PeerLinkError::from_kind(kind, "directory said no")),
                RecordingPeers::default(),
            );
            f.front.on_session_registered("alice");

            let err = f
                .front
                .send_message_to_peer("bob", "hi", &CancelSignal::never())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), kind);
            assert!(f.peers.delivered.lock().unwrap().is_empty());
            assert!(f.log.read("bob").await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_directory_malformed_becomes_technical() {
        let f = fixture(
            Err(PeerLinkError::Malformed("bad login".to_string())),
            RecordingPeers::default(),
        );
        f.front.on_session_registered("alice");

        let err = f
            .front
            .send_message_to_peer("bob", "hi", &CancelSignal::never())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Technical);
        assert!(err.message().contains("bad login"));
        assert!(f.peers.delivered.lock().unwrap().is_empty());
        assert!(f.log.read("bob").await.unwrap().is_empty());
        assert_eq!(f.observer.ops(), vec!["send_message_to_peer"]);
    }

    #[test]
    fn test_success_reported_through_observer_only() {
        let f = fixture(bob_at("b:2222"), RecordingPeers::default());
        let printed = ambient_output(|| {
            f.front.on_session_registered("alice");
            block_on(f.front.send_message_to_peer("bob", "hi", &CancelSignal::never())).unwrap();
        });

        assert!(printed.is_empty(), "unexpected ambient output: {printed}");
        assert_eq!(
            f.observer.event_ops(),
            vec!["on_session_registered", "send_message_to_peer"]
        );
        let events = f.observer.events.lock().unwrap();
        assert!(events[1].1.contains("b:2222"));
    }

    #[tokio::test]
    async fn test_delivery_failure_is_technical_but_logged() {
        let f = fixture(
            bob_at("b:2222"),
            RecordingPeers {
                fail: true,
                ..Default::default()
            },
        );
        f.front.on_session_registered("alice");

        let err = f
            .front
            .send_message_to_peer("bob", "hi", &CancelSignal::never())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Technical);
        assert_eq!(f.log.read("bob").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_log_failure_still_delivers() {
        let directory = Arc::new(ScriptedDirectory::answering(bob_at("b:2222")));
        let peers = Arc::new(RecordingPeers::default());
        let observer = Arc::new(RecordingObserver::default());
        let front = ClientFront::new(
            Arc::new(FailingLog),
            directory,
            peers.clone(),
            observer.clone(),
        );
        front.on_session_registered("alice");

        let err = front
            .send_message_to_peer("bob", "hi", &CancelSignal::never())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Technical);
        assert_eq!(peers.delivered.lock().unwrap().len(), 1);
        assert_eq!(observer.ops(), vec!["log_outgoing", "send_message_to_peer"]);

        let err = front.get_conversation_with("bob").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Technical);
    }

    #[tokio::test]
    async fn test_reregistration_replaces_identity() {
        let f = fixture(bob_at("b:2222"), RecordingPeers::default());
        f.front.on_session_registered("alice");
        f.front.on_session_registered("carol");
        assert_eq!(f.front.identity().as_deref(), Some("carol"));

        f.front
            .send_message_to_peer("bob", "yo", &CancelSignal::never())
            .await
            .unwrap();
        assert_eq!(f.peers.delivered.lock().unwrap()[0].2, "carol");
        assert!(f.observer.ops().is_empty());
    }

    #[tokio::test]
    async fn test_resend_duplicates_entry() {
        let f = fixture(bob_at("b:2222"), RecordingPeers::default());
        f.front.on_session_registered("alice");
        for _ in 0..2 {
            f.front
                .send_message_to_peer("bob", "hi", &CancelSignal::never())
                .await
                .unwrap();
        }
        assert_eq!(f.front.get_conversation_with("bob").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_peer_conversation_is_empty() {
        let f = fixture(bob_at("b:2222"), RecordingPeers::default());
        assert!(f.front.get_conversation_with("zed").await.unwrap().is_empty());
    }
}
