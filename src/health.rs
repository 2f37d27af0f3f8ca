//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the pod serve traffic? Failure → pulled from load-balancer. |
//!
//! Both are registered as public routes: they answer without an `x-api-key`
//! and never contact the CMS.

use serde_json::json;

use crate::{Request, Response};

/// Always `200 {"status":"ok"}`.
pub async fn liveness(_req: Request) -> Response {
    Response::json_value(&json!({ "status": "ok" }))
}

/// Always `200 {"status":"ready"}`. The gateway holds no connections that
/// need warming, so ready means listening.
pub async fn readiness(_req: Request) -> Response {
    Response::json_value(&json!({ "status": "ready" }))
}
