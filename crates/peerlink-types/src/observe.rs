//! Observability handle injected into every logic component.
//!
//! Components never open spans or emit log events through ambient state of
//! their own; they are handed an [`Observer`] at construction and report
//! through it. [`TracingObserver`] forwards to `tracing`.

use crate::error::PeerLinkError;
use std::sync::Arc;
use tracing::{debug_span, info, warn, Span};

/// Observability capability handed to logic components.
pub trait Observer: Send + Sync {
    /// Open a span for one operation.
    fn span(&self, op: &'static str) -> Span;

    /// Record a notable outcome of an operation (session started, message delivered).
    fn event(&self, op: &'static str, detail: &str);

    /// Record a failure returned (or swallowed) by an operation.
    fn failure(&self, op: &'static str, err: &PeerLinkError);
}

/// [`Observer`] backed by the process `tracing` subscriber.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    component: &'static str,
}

impl TracingObserver {
    /// Create an observer tagging every span with `component`.
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    /// Convenience constructor returning a shared handle.
    pub fn shared(component: &'static str) -> Arc<dyn Observer> {
        Arc::new(Self::new(component))
    }
}

impl Observer for TracingObserver {
    fn span(&self, op: &'static str) -> Span {
        debug_span!("uc", component = self.component, op)
    }

    fn event(&self, op: &'static str, detail: &str) {
        info!(component = self.component, op, "{}", detail);
    }

    fn failure(&self, op: &'static str, err: &PeerLinkError) {
        warn!(
            component = self.component,
            op,
            kind = %err.kind(),
            error = %err,
            "Operation failed"
        );
    }
}
