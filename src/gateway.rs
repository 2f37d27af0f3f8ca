//! Route table and handlers for the three inbound surfaces.
//!
//! | Surface | Routes |
//! |---|---|
//! | action dispatch | `POST /mcp` with `{action, params}` |
//! | tool call | `GET /mcp/tools`, `POST /mcp/call` with `{tool, args}` |
//! | resources | `/wp/posts`, `/wp/posts/{id}`, `/wp/categories`, `/wp/media` |
//!
//! All of them end in [`Translator::execute`]; they differ only in how the
//! action and its parameters are read off the request.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::action::{Action, ActionKind};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::handler::with_state;
use crate::health;
use crate::method::Method;
use crate::middleware::auth::Gatekeeper;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::tools;
use crate::translator::{Relay, Translator};

/// Shared, read-only state behind every handler.
pub struct Gateway {
    translator: Translator,
}

impl Gateway {
    pub fn new(translator: Translator) -> Self {
        Self { translator }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Translator::from_config(config)?))
    }

    async fn run(&self, action: Action) -> Result<Relay> {
        self.translator.execute(action).await
    }
}

/// Builds the full route table, guarded by a [`Gatekeeper`] on `api_key`.
pub fn router(gateway: Arc<Gateway>, api_key: Option<String>) -> Router {
    let gw = || Arc::clone(&gateway);
    Router::new()
        .layer(Gatekeeper::new(api_key))
        .public(Method::Get, "/healthz", health::liveness)
        .public(Method::Get, "/readyz", health::readiness)
        .on(Method::Post, "/mcp", with_state(gw(), dispatch_action))
        .on(Method::Get, "/mcp/tools", list_tools)
        .on(Method::Post, "/mcp/call", with_state(gw(), call_tool))
        .on(Method::Get, "/wp/posts", with_state(gw(), list_posts))
        .on(Method::Post, "/wp/posts", with_state(gw(), create_post))
        .on(Method::Get, "/wp/posts/{id}", with_state(gw(), get_post))
        .on(Method::Put, "/wp/posts/{id}", with_state(gw(), update_post))
        .on(Method::Delete, "/wp/posts/{id}", with_state(gw(), delete_post))
        .on(Method::Get, "/wp/categories", with_state(gw(), list_categories))
        .on(Method::Post, "/wp/categories", with_state(gw(), create_category))
        .on(Method::Post, "/wp/media", with_state(gw(), upload_media))
}

// ── Action dispatch and tool call ─────────────────────────────────────────────

#[derive(Deserialize)]
struct ActionCall {
    #[serde(default)]
    action: Value,
    #[serde(default)]
    params: Value,
}

#[derive(Deserialize)]
struct ToolCall {
    #[serde(default)]
    tool: Value,
    #[serde(default)]
    args: Value,
}

async fn dispatch_action(gw: Arc<Gateway>, req: Request) -> Result<Relay> {
    let call: ActionCall = req.json()?;
    let kind = kind_of(&call.action).ok_or(Error::UnknownAction)?;
    gw.run(Action::from_params(kind, call.params)?).await
}

async fn call_tool(gw: Arc<Gateway>, req: Request) -> Result<Relay> {
    let call: ToolCall = req.json()?;
    let kind = kind_of(&call.tool).ok_or(Error::UnknownTool)?;
    gw.run(Action::from_params(kind, call.args)?).await
}

/// Anything but a known name, including a missing or non-string one, is unknown.
fn kind_of(name: &Value) -> Option<ActionKind> {
    name.as_str()?.parse().ok()
}

async fn list_tools(_req: Request) -> Response {
    Response::json_value(&tools::manifest())
}

// ── Resource routes ───────────────────────────────────────────────────────────

/// `GET /wp/posts`, or `GET /wp/posts?exclude={id}` for the excluding list.
async fn list_posts(gw: Arc<Gateway>, req: Request) -> Result<Relay> {
    let action = match req.query_param("exclude") {
        Some(id) => Action::from_params(ActionKind::GetPostsExcluding, json!({ "excludeId": id }))?,
        None => Action::GetRecentPosts,
    };
    gw.run(action).await
}

async fn create_post(gw: Arc<Gateway>, req: Request) -> Result<Relay> {
    gw.run(Action::from_params(ActionKind::CreatePost, req.json()?)?).await
}

async fn get_post(gw: Arc<Gateway>, req: Request) -> Result<Relay> {
    gw.run(Action::from_params(ActionKind::GetPost, id_param(&req))?).await
}

/// The path id wins over any `id` in the body.
async fn update_post(gw: Arc<Gateway>, req: Request) -> Result<Relay> {
    let mut params: Value = req.json()?;
    if params.is_null() {
        params = json!({});
    }
    if let Value::Object(fields) = &mut params {
        fields.insert("id".to_owned(), Value::from(req.param("id").unwrap_or_default()));
    }
    gw.run(Action::from_params(ActionKind::UpdatePost, params)?).await
}

async fn delete_post(gw: Arc<Gateway>, req: Request) -> Result<Relay> {
    gw.run(Action::from_params(ActionKind::DeletePost, id_param(&req))?).await
}

async fn list_categories(gw: Arc<Gateway>, _req: Request) -> Result<Relay> {
    gw.run(Action::GetCategories).await
}

async fn create_category(gw: Arc<Gateway>, req: Request) -> Result<Relay> {
    gw.run(Action::from_params(ActionKind::CreateCategory, req.json()?)?).await
}

/// Body: `{"url": "...", "filename": "..."}`.
async fn upload_media(gw: Arc<Gateway>, req: Request) -> Result<Relay> {
    gw.run(Action::from_params(ActionKind::UploadMedia, req.json()?)?).await
}

fn id_param(req: &Request) -> Value {
    json!({ "id": req.param("id") })
}
