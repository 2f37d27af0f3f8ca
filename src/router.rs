//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Guards registered with
//! [`Router::layer`] run before every non-public handler.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

#[derive(Clone)]
struct Route {
    handler: BoxedHandler,
    public: bool,
}

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Route>>,
    guards: Vec<Arc<dyn Middleware>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), guards: Vec::new() }
    }

    /// Register a guarded handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use wpgate::{Method, Request, Response, Router};
    /// # async fn get_post(_: Request) -> Response { Response::text("") }
    /// # async fn create_post(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get,  "/wp/posts/{id}", get_post)
    ///     .on(Method::Post, "/wp/posts",      create_post);
    /// ```
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, handler, false)
    }

    /// Register a handler that bypasses every guard (health probes).
    pub fn public(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, handler, true)
    }

    /// Attach a guard. Guards run in registration order; the first rejection wins.
    pub fn layer(mut self, guard: impl Middleware) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    fn add(mut self, method: Method, path: &str, handler: impl Handler, public: bool) -> Self {
        let route = Route { handler: handler.into_boxed_handler(), public };
        self.routes
            .entry(method)
            .or_default()
            .insert(path, route)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    fn lookup(&self, method: Method, path: &str) -> Option<(Route, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((matched.value.clone(), params))
    }

    fn guard(&self, req: &Request) -> Option<Response> {
        self.guards.iter().find_map(|g| g.before(req))
    }

    /// Routes one request and produces one response.
    pub(crate) async fn dispatch(&self, mut req: Request) -> Response {
        match self.lookup(req.method(), req.path()) {
            Some((route, params)) => {
                if !route.public {
                    if let Some(rejection) = self.guard(&req) {
                        return rejection;
                    }
                }
                req.params = params;
                route.handler.call(req).await
            }
            None => self
                .guard(&req)
                .unwrap_or_else(|| Response::error(Status::NotFound, Status::NotFound.reason())),
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::HeaderMap;

    use super::*;

    struct DenyAll;

    impl Middleware for DenyAll {
        fn before(&self, _req: &Request) -> Option<Response> {
            Some(Response::status(Status::Forbidden))
        }
    }

    async fn echo_id(req: Request) -> Response {
        Response::text(req.param("id").unwrap_or("none").to_owned())
    }

    fn request(method: Method, path: &str) -> Request {
        let uri: http::Uri = path.parse().unwrap();
        Request::new(method, &uri, HeaderMap::new(), Bytes::new())
    }

    #[tokio::test]
    async fn captures_path_params() {
        let router = Router::new().on(Method::Get, "/wp/posts/{id}", echo_id);
        let res = router.dispatch(request(Method::Get, "/wp/posts/42")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"42");
    }

    #[tokio::test]
    async fn method_mismatch_is_not_found() {
        let router = Router::new().on(Method::Get, "/wp/posts/{id}", echo_id);
        let res = router.dispatch(request(Method::Post, "/wp/posts/42")).await;
        assert_eq!(res.status_code(), 404);
    }

    #[tokio::test]
    async fn guards_skip_public_routes_only() {
        let router = Router::new()
            .layer(DenyAll)
            .public(Method::Get, "/healthz", echo_id)
            .on(Method::Get, "/wp/posts/{id}", echo_id);

        assert_eq!(router.dispatch(request(Method::Get, "/healthz")).await.status_code(), 200);
        assert_eq!(router.dispatch(request(Method::Get, "/wp/posts/1")).await.status_code(), 403);
        // unmatched paths are guarded before the 404
        assert_eq!(router.dispatch(request(Method::Get, "/nope")).await.status_code(), 403);
    }
}
