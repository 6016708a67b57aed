//! Runs a logic operation inside its observer span and reports failures.

use peerlink_types::error::PeerLinkResult;
use peerlink_types::observe::Observer;
use std::future::Future;
use tracing::Instrument;

pub(crate) async fn observed<T, F>(
    observer: &dyn Observer,
    op: &'static str,
    fut: F,
) -> PeerLinkResult<T>
where
    F: Future<Output = PeerLinkResult<T>>,
{
    let result = fut.instrument(observer.span(op)).await;
    if let Err(e) = &result {
        observer.failure(op, e);
    }
    result
}
