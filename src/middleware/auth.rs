//! Shared-secret admission control.

use tracing::debug;

use crate::error::Error;
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// Header carrying the caller's shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Admits a request only when its `x-api-key` header equals the configured
/// secret exactly.
///
/// Fails closed: with no configured secret (absent or empty) every request
/// is denied, including those that send no header at all.
pub struct Gatekeeper {
    secret: Option<String>,
}

impl Gatekeeper {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret: secret.filter(|s| !s.is_empty()) }
    }

    /// `true` when `presented` matches the configured secret.
    pub fn admits(&self, presented: Option<&str>) -> bool {
        match (&self.secret, presented) {
            (Some(secret), Some(key)) => secret == key,
            _ => false,
        }
    }
}

impl Middleware for Gatekeeper {
    fn before(&self, req: &Request) -> Option<Response> {
        if self.admits(req.header(API_KEY_HEADER)) {
            return None;
        }
        debug!(path = req.path(), "rejected: missing or wrong api key");
        Some(Error::Forbidden.into_response())
    }
}
