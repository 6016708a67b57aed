//! Cancellation signal plumbed through every outbound call.

use std::time::Duration;
use tokio::sync::watch;

/// Trigger side of a cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Receive side of a cancellation signal (clonable).
///
/// `rx == None` is the signal that never fires.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelHandle {
    /// Create a new handle together with its signal.
    pub fn new() -> (Self, CancelSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, CancelSignal { rx: Some(rx) })
    }

    /// Fire the signal.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// Another receiver for the same signal.
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: Some(self.tx.subscribe()),
        }
    }

    /// Fire the signal once `deadline` has elapsed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn cancel_after(self, deadline: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(deadline) => self.cancel(),
                _ = self.tx.closed() => {}
            }
        })
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::never()
    }
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        Self { rx: None }
    }

    /// A signal that fires after `deadline`. Must be called inside a tokio runtime.
    pub fn with_deadline(deadline: Duration) -> Self {
        let (handle, signal) = CancelHandle::new();
        handle.cancel_after(deadline);
        signal
    }

    /// Whether the signal has fired.
    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolve once the signal fires. Pends forever if it never does.
    pub async fn cancelled(&self) {
        let Some(mut rx) = self.rx.clone() else {
            return std::future::pending().await;
        };
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // Sender dropped without firing: never resolves.
                std::future::pending::<()>().await;
            }
        }
    }
}
