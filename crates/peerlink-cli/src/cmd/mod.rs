//! Command implementations: long-running nodes and one-shot client requests.

pub mod client;
pub mod node;

/// Build a runtime for one command, exiting on failure.
pub(crate) fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new()
        .unwrap_or_else(|e| crate::ui::fail(&format!("Failed to start async runtime: {e}")))
}
