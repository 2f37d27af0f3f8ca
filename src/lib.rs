//! # wpgate
//!
//! An authenticated HTTP gateway in front of a WordPress REST API.
//!
//! Callers present a shared secret in `x-api-key` and name one of a fixed
//! set of content operations (list/get/create/update/delete posts,
//! list/create categories, upload media). wpgate turns each into exactly one
//! call against `{WP_BASEURL}/wp-json/wp/v2/...` (two for uploads, which
//! first download the file) and relays the CMS answer back.
//!
//! ## The contract
//!
//! Like the framework underneath it, wpgate sits behind a reverse proxy and
//! leaves TLS termination, rate limiting, and body-size limits there. It does
//! not retry, queue, or cache. Upstream bodies are relayed as opaque JSON
//! (or raw bytes); the CMS owns their schema.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wpgate::{Config, Gateway, Server, gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), wpgate::Error> {
//!     let config = Config::from_env()?;
//!     let gw = Arc::new(Gateway::from_config(&config)?);
//!     let app = gateway::router(gw, config.api_key.clone());
//!
//!     Server::bind(&config.listen_addr())?.serve(app).await
//! }
//! ```

mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod action;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handler;
pub mod health;
pub mod middleware;
pub mod tools;
pub mod translator;
pub mod upstream;

pub use action::{Action, ActionKind, Plan};
pub use config::{Config, StatusPolicy};
pub use error::Error;
pub use gateway::Gateway;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use translator::Translator;
