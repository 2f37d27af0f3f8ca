//! Per-request tracing.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{Instrument, info, info_span};

use crate::response::Response;

/// Runs `fut` inside a `request` span and logs the outcome once it resolves.
pub(crate) async fn instrument<F>(method: &http::Method, path: &str, fut: F) -> Response
where
    F: Future<Output = Response>,
{
    let span = info_span!("request", method = %method, path = %path);
    let started = Instant::now();
    async move {
        let res = fut.await;
        info!(
            status = res.status_code(),
            latency_ms = millis(started.elapsed()),
            "request completed"
        );
        res
    }
    .instrument(span)
    .await
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
