//! Unified error type.

use crate::response::{IntoResponse, Response};
use crate::status::Status;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the gateway.
///
/// Infrastructure failures (`Io`, `Config`, `Client`) stop the process at
/// startup. Every other variant is a per-request failure and converts into
/// a `{"error": message}` response through [`IntoResponse`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Forbidden")]
    Forbidden,

    #[error("Unknown action")]
    UnknownAction,

    #[error("Unknown tool")]
    UnknownTool,

    #[error("Missing required parameter `{0}`")]
    MissingParam(&'static str),

    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    #[error("Invalid JSON body: {0}")]
    InvalidBody(#[source] serde_json::Error),

    /// Transport-level failure talking to the CMS: DNS, refused
    /// connection, broken body.
    #[error("{0}")]
    Upstream(#[from] reqwest::Error),

    /// The media source answered, but not with a success status.
    #[error("media source {url} returned {status}")]
    SourceFetch { url: String, status: u16 },
}

impl Error {
    pub fn status(&self) -> Status {
        match self {
            Self::Forbidden => Status::Forbidden,
            Self::UnknownAction
            | Self::UnknownTool
            | Self::MissingParam(_)
            | Self::InvalidParam { .. }
            | Self::InvalidBody(_) => Status::BadRequest,
            Self::Io(_)
            | Self::Config { .. }
            | Self::Client(_)
            | Self::Upstream(_)
            | Self::SourceFetch { .. } => Status::InternalServerError,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        Response::error(self.status(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_messages_match_the_wire_contract() {
        assert_eq!(Error::Forbidden.to_string(), "Forbidden");
        assert_eq!(Error::UnknownAction.to_string(), "Unknown action");
        assert_eq!(Error::UnknownTool.to_string(), "Unknown tool");
    }

    #[test]
    fn request_errors_map_to_client_statuses() {
        assert_eq!(Error::Forbidden.into_response().status_code(), 403);
        assert_eq!(Error::UnknownAction.into_response().status_code(), 400);
        assert_eq!(Error::MissingParam("id").into_response().status_code(), 400);
        let fetch = Error::SourceFetch { url: "http://x/a.jpg".into(), status: 404 };
        assert_eq!(fetch.into_response().status_code(), 500);
    }
}
