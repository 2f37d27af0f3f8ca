//! Action → upstream call → relayed response.

use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, warn};

use crate::action::{Action, OutboundBody, Plan};
use crate::config::{Config, StatusPolicy};
use crate::error::{Error, Result};
use crate::response::{ContentType, IntoResponse, Response};
use crate::status::Status;
use crate::upstream::{Payload, Reply, Upstream};

/// An upstream body on its way back to the caller.
#[derive(Debug, PartialEq)]
pub enum RelayBody {
    Json(Value),
    /// Not JSON; relayed byte-for-byte with the upstream content type.
    Raw { content_type: Option<String>, bytes: Bytes },
}

#[derive(Debug, PartialEq)]
pub struct Relay {
    pub status: u16,
    pub body: RelayBody,
}

impl IntoResponse for Relay {
    fn into_response(self) -> Response {
        let builder = Response::builder().status(self.status);
        match self.body {
            RelayBody::Json(value) => builder.json_value(&value),
            RelayBody::Raw { content_type: Some(ct), bytes } => {
                builder.bytes(ContentType::Other(ct), bytes)
            }
            RelayBody::Raw { content_type: None, bytes } => {
                builder.bytes(ContentType::OctetStream, bytes)
            }
        }
    }
}

/// Turns actions into CMS calls. Holds no per-request state.
pub struct Translator {
    upstream: Upstream,
    status_policy: StatusPolicy,
}

impl Translator {
    pub fn new(upstream: Upstream, status_policy: StatusPolicy) -> Self {
        Self { upstream, status_policy }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Upstream::new(config)?, config.status_policy))
    }

    /// Runs one action: one upstream call, or two for a media upload.
    pub async fn execute(&self, action: Action) -> Result<Relay> {
        let plan = action.plan();
        debug!(action = %action.kind(), target = %plan.path_and_query(), "translating");

        let payload = self.payload(&plan).await?;
        let reply = self.upstream.send(&plan, payload).await.inspect_err(|e| {
            warn!(action = %action.kind(), "upstream call failed: {e}");
        })?;

        if !(200..300).contains(&reply.status) {
            debug!(action = %action.kind(), status = reply.status, "upstream returned an error status");
        }
        Ok(self.relay(reply))
    }

    async fn payload(&self, plan: &Plan) -> Result<Payload> {
        Ok(match &plan.body {
            OutboundBody::Empty => Payload::Empty,
            OutboundBody::Json(fields) => {
                Payload::Json(Bytes::from(serde_json::to_vec(fields).map_err(Error::InvalidBody)?))
            }
            OutboundBody::Fetch { source, filename } => {
                let fetched = self.upstream.fetch(source).await.inspect_err(|e| {
                    warn!(%source, "media source fetch failed: {e}");
                })?;
                if !(200..300).contains(&fetched.status) {
                    warn!(%source, status = fetched.status, "media source returned an error status");
                    return Err(Error::SourceFetch { url: source.clone(), status: fetched.status });
                }
                Payload::Media {
                    bytes: fetched.body,
                    filename: filename.clone(),
                    content_type: media_type(filename),
                }
            }
        })
    }

    fn relay(&self, reply: Reply) -> Relay {
        let status = match self.status_policy {
            StatusPolicy::AlwaysOk => Status::Ok.into(),
            StatusPolicy::Passthrough => reply.status,
        };
        let body = match serde_json::from_slice(&reply.body) {
            Ok(value) => RelayBody::Json(value),
            Err(_) => RelayBody::Raw { content_type: reply.content_type, bytes: reply.body },
        };
        Relay { status, body }
    }
}

/// Content type for an upload, guessed from its filename.
fn media_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn translator(policy: StatusPolicy) -> Translator {
        let config = Config { wp_base_url: "http://cms.invalid".into(), ..Config::default() };
        Translator::new(Upstream::new(&config).unwrap(), policy)
    }

    fn reply(status: u16, content_type: Option<&str>, body: &'static [u8]) -> Reply {
        Reply {
            status,
            content_type: content_type.map(str::to_owned),
            body: Bytes::from_static(body),
        }
    }

    #[test]
    fn media_type_follows_the_filename() {
        assert_eq!(media_type("upload.jpg"), "image/jpeg");
        assert_eq!(media_type("chart.png"), "image/png");
        assert_eq!(media_type("blob"), "application/octet-stream");
    }

    #[test]
    fn error_statuses_are_relayed_as_success_by_default() {
        let relay = translator(StatusPolicy::AlwaysOk)
            .relay(reply(404, Some("application/json"), br#"{"code":"rest_post_invalid_id"}"#));
        assert_eq!(relay.status, 200);
        assert_eq!(relay.body, RelayBody::Json(json!({"code": "rest_post_invalid_id"})));
    }

    #[test]
    fn passthrough_keeps_the_upstream_status() {
        let relay = translator(StatusPolicy::Passthrough).relay(reply(401, None, b"{}"));
        assert_eq!(relay.status, 401);
    }

    #[test]
    fn non_json_bodies_pass_through() {
        let relay = translator(StatusPolicy::AlwaysOk)
            .relay(reply(502, Some("text/html"), b"<h1>Bad Gateway</h1>"));
        let res = relay.into_response();
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.header("content-type"), Some("text/html"));
        assert_eq!(res.body(), b"<h1>Bad Gateway</h1>");
    }
}
