//! Middleware layer.
//!
//! Middleware is the place for cross-cutting concerns that run around every
//! handler: admission control and per-request tracing.
//!
//! A [`Middleware`] inspects the request before routing hands it to a
//! handler and may short-circuit with its own response. Guards attached with
//! [`Router::layer`](crate::Router::layer) run on every route except those
//! registered with [`Router::public`](crate::Router::public), and on
//! unmatched paths before the `404` is produced.
//!
//! Built-in middleware:
//! - [`auth::Gatekeeper`] — shared-secret `x-api-key` check
//! - `trace` — per-request span with method, path, status, latency

pub mod auth;
pub(crate) mod trace;

use crate::request::Request;
use crate::response::Response;

/// A pre-handler guard.
pub trait Middleware: Send + Sync + 'static {
    /// Returns `Some(response)` to reject the request, `None` to let it through.
    fn before(&self, req: &Request) -> Option<Response>;
}
