//! HTTP client for the WordPress REST API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use http::HeaderValue;
use http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use tracing::debug;

use crate::action::Plan;
use crate::config::Config;
use crate::error::{Error, Result};

/// REST namespace every CMS path is relative to.
pub const REST_ROOT: &str = "/wp-json/wp/v2";

/// A body that is ready to send.
#[derive(Debug)]
pub enum Payload {
    Empty,
    Json(Bytes),
    Media { bytes: Bytes, filename: String, content_type: String },
}

/// What came back from a call, before relay policy is applied.
#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Client for the CMS.
///
/// The Basic credential is encoded once here and reused for every call.
/// Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct Upstream {
    http: reqwest::Client,
    api_root: String,
    authorization: HeaderValue,
}

impl Upstream {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("wpgate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Client)?;
        Self::with_client(http, config)
    }

    pub fn with_client(http: reqwest::Client, config: &Config) -> Result<Self> {
        let authorization = basic_auth(&config.wp_user, &config.wp_app_password)?;
        Ok(Self {
            http,
            api_root: format!("{}{REST_ROOT}", config.wp_base_url),
            authorization,
        })
    }

    /// `{base}/wp-json/wp/v2{path}?{query}` for `plan`.
    pub fn url(&self, plan: &Plan) -> String {
        format!("{}{}", self.api_root, plan.path_and_query())
    }

    /// Issues `plan` with `payload` and buffers the reply.
    pub async fn send(&self, plan: &Plan, payload: Payload) -> Result<Reply> {
        let url = self.url(plan);
        debug!(method = %plan.method, %url, "calling upstream");

        let mut req = self.http
            .request(plan.method.into(), &url)
            .header(AUTHORIZATION, self.authorization.clone());

        req = match payload {
            Payload::Empty => req,
            Payload::Json(body) => req.header(CONTENT_TYPE, "application/json").body(body),
            Payload::Media { bytes, filename, content_type } => req
                .header(CONTENT_TYPE, content_type)
                .header(CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\""))
                .body(bytes),
        };

        let res = req.send().await?;
        read_reply(res).await
    }

    /// Downloads a media source in full. Sent without the CMS credential.
    pub async fn fetch(&self, url: &str) -> Result<Reply> {
        debug!(%url, "fetching media source");
        let res = self.http.get(url).send().await?;
        read_reply(res).await
    }
}

async fn read_reply(res: reqwest::Response) -> Result<Reply> {
    let status = res.status().as_u16();
    let content_type = res.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = res.bytes().await?;
    Ok(Reply { status, content_type, body })
}

/// `Basic base64(user:password)`, marked sensitive so it stays out of debug output.
fn basic_auth(user: &str, password: &str) -> Result<HeaderValue> {
    let encoded = STANDARD.encode(format!("{user}:{password}"));
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}")).map_err(|e| Error::Config {
        message: format!("upstream credential is not a valid header value: {e}"),
    })?;
    value.set_sensitive(true);
    Ok(value)
}
