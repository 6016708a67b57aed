//! Test doubles shared by the kernel's unit tests.

use async_trait::async_trait;
use peerlink_types::account::Account;
use peerlink_types::cancel::CancelSignal;
use peerlink_types::error::{PeerLinkError, PeerLinkResult, StoreError, StoreResult};
use peerlink_types::gateway::{DirectoryGateway, PeerGateway};
use peerlink_types::message::Message;
use peerlink_types::observe::Observer;
use peerlink_types::session::Session;
use peerlink_types::store::{ConversationLog, SessionRegistry, UserRegistry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::Span;

/// Observer remembering every event and failure it was told about.
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<(&'static str, String)>>,
    pub failures: Mutex<Vec<(&'static str, PeerLinkError)>>,
}

impl RecordingObserver {
    /// Operations that reported a failure, in order.
    pub fn ops(&self) -> Vec<&'static str> {
        self.failures.lock().unwrap().iter().map(|(op, _)| *op).collect()
    }

    /// Operations that reported an event, in order.
    pub fn event_ops(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|(op, _)| *op).collect()
    }
}

impl Observer for RecordingObserver {
    fn span(&self, _op: &'static str) -> Span {
        Span::none()
    }

    fn event(&self, op: &'static str, detail: &str) {
        self.events.lock().unwrap().push((op, detail.to_string()));
    }

    fn failure(&self, op: &'static str, err: &PeerLinkError) {
        self.failures.lock().unwrap().push((op, err.clone()));
    }
}

/// User registry whose every call fails, counting calls.
#[derive(Default)]
pub struct FailingUsers {
    pub calls: AtomicUsize,
}

#[async_trait]
impl UserRegistry for FailingUsers {
    async fn insert(&self, _login: &str, _password: &str) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Technical("users down".to_string()))
    }

    async fn find_by_login_password(&self, _l: &str, _p: &str) -> StoreResult<Option<Account>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Technical("users down".to_string()))
    }

    async fn find_by_login(&self, _login: &str) -> StoreResult<Option<Account>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Technical("users down".to_string()))
    }
}

/// Session registry whose every call fails.
pub struct FailingSessions;

#[async_trait]
impl SessionRegistry for FailingSessions {
    async fn insert(&self, _login: &str, _address: &str) -> StoreResult<()> {
        Err(StoreError::Technical("sessions down".to_string()))
    }

    async fn get(&self, _login: &str) -> StoreResult<Option<Session>> {
        Err(StoreError::Technical("sessions down".to_string()))
    }
}

/// Conversation log whose every call fails.
pub struct FailingLog;

#[async_trait]
impl ConversationLog for FailingLog {
    async fn append(&self, _peer: &str, _author: &str, _content: &str) -> StoreResult<()> {
        Err(StoreError::Technical("log down".to_string()))
    }

    async fn read(&self, _peer: &str) -> StoreResult<Vec<Message>> {
        Err(StoreError::Technical("log down".to_string()))
    }
}

/// Captures everything the process-wide `tracing` dispatcher would print
/// while `f` runs on the current thread.
pub fn ambient_output<F: FnOnce()>(f: F) -> String {
    use std::io;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Run a future to completion on a single-threaded runtime owned by the caller.
pub fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(fut)
}

/// Directory gateway answering from a fixed script.
pub struct ScriptedDirectory {
    pub answer: PeerLinkResult<Session>,
    pub asked: Mutex<Vec<(String, String)>>,
    pub registered: Mutex<Vec<(String, String, String)>>,
}

impl ScriptedDirectory {
    pub fn answering(answer: PeerLinkResult<Session>) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
            registered: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DirectoryGateway for ScriptedDirectory {
    async fn register_session(
        &self,
        login: &str,
        password: &str,
        address: &str,
        _cancel: &CancelSignal,
    ) -> PeerLinkResult<()> {
        self.registered.lock().unwrap().push((
            login.to_string(),
            password.to_string(),
            address.to_string(),
        ));
        if password == "wrong" {
            return Err(PeerLinkError::Unauthorized("bad credentials".to_string()));
        }
        Ok(())
    }

    async fn ask_session(
        &self,
        requester: &str,
        target: &str,
        _cancel: &CancelSignal,
    ) -> PeerLinkResult<Session> {
        self.asked
            .lock()
            .unwrap()
            .push((requester.to_string(), target.to_string()));
        self.answer.clone()
    }
}

/// Peer gateway recording deliveries, optionally failing them.
#[derive(Default)]
pub struct RecordingPeers {
    pub fail: bool,
    pub delivered: Mutex<Vec<(String, Message, String)>>,
}

#[async_trait]
impl PeerGateway for RecordingPeers {
    async fn deliver(
        &self,
        address: &str,
        message: &Message,
        from: &str,
        _cancel: &CancelSignal,
    ) -> PeerLinkResult<()> {
        self.delivered
            .lock()
            .unwrap()
            .push((address.to_string(), message.clone(), from.to_string()));
        if self.fail {
            return Err(PeerLinkError::NotFound("peer went away".to_string()));
        }
        Ok(())
    }
}
