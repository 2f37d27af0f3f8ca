//! The closed set of gateway actions and their outbound plans.
//!
//! Wire names arrive as free-form strings; [`ActionKind::from_str`] is the
//! only place an unknown name can appear. Past that point every action is a
//! variant of [`Action`], and [`Action::plan`] maps each one, exhaustively,
//! to the single CMS call it stands for. Planning does no I/O.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::method::Method;

/// Filename used for uploads that do not name one.
pub const DEFAULT_UPLOAD_FILENAME: &str = "upload.jpg";

/// A JSON object of caller-supplied CMS fields, relayed untouched.
pub type Fields = Map<String, Value>;

// ── ActionKind ────────────────────────────────────────────────────────────────

/// Every operation the gateway knows how to relay.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ActionKind {
    GetRecentPosts,
    GetPost,
    GetPostsExcluding,
    CreatePost,
    UpdatePost,
    DeletePost,
    GetCategories,
    CreateCategory,
    UploadMedia,
}

/// JSON type of an action parameter, as advertised in the tool manifest.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Integer,
    String,
    Object,
}

/// One advertised action parameter.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: ParamType,
    pub required: bool,
    pub description: &'static str,
}

const fn param(
    name: &'static str,
    kind: ParamType,
    required: bool,
    description: &'static str,
) -> ParamSpec {
    ParamSpec { name, kind, required, description }
}

const ID: ParamSpec = param("id", ParamType::Integer, true, "Post id");
const EXCLUDE_ID: ParamSpec = param("excludeId", ParamType::Integer, true, "Post id to leave out");
const POST_FIELDS: ParamSpec = param(
    "fields",
    ParamType::Object,
    false,
    "Post fields (title, content, status, categories, ...) passed through to the CMS; \
     may also be given as top-level params",
);
const CATEGORY_FIELDS: ParamSpec = param(
    "fields",
    ParamType::Object,
    false,
    "Category fields (name, slug, description, parent) passed through to the CMS; \
     may also be given as top-level params",
);
const SOURCE_URL: ParamSpec = param("url", ParamType::String, true, "Where to fetch the file from");
const FILENAME: ParamSpec = param(
    "filename",
    ParamType::String,
    false,
    "Name to store the file under (default upload.jpg)",
);

impl ActionKind {
    pub const ALL: [ActionKind; 9] = [
        Self::GetRecentPosts,
        Self::GetPost,
        Self::GetPostsExcluding,
        Self::CreatePost,
        Self::UpdatePost,
        Self::DeletePost,
        Self::GetCategories,
        Self::CreateCategory,
        Self::UploadMedia,
    ];

    /// The wire name used by `/mcp` and `/mcp/call`.
    pub fn name(self) -> &'static str {
        match self {
            Self::GetRecentPosts    => "getRecentPosts",
            Self::GetPost           => "getPost",
            Self::GetPostsExcluding => "getPostsExcluding",
            Self::CreatePost        => "createPost",
            Self::UpdatePost        => "updatePost",
            Self::DeletePost        => "deletePost",
            Self::GetCategories     => "getCategories",
            Self::CreateCategory    => "createCategory",
            Self::UploadMedia       => "uploadMedia",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::GetRecentPosts    => "List the 10 most recent posts",
            Self::GetPost           => "Fetch a single post by id",
            Self::GetPostsExcluding => "List up to 100 posts, leaving one out",
            Self::CreatePost        => "Create a post from the supplied fields",
            Self::UpdatePost        => "Change fields of an existing post",
            Self::DeletePost        => "Permanently delete a post, bypassing the trash",
            Self::GetCategories     => "List post categories",
            Self::CreateCategory    => "Create a category from the supplied fields",
            Self::UploadMedia       => "Fetch a file from a URL and upload it to the media library",
        }
    }

    pub fn params(self) -> &'static [ParamSpec] {
        match self {
            Self::GetRecentPosts | Self::GetCategories => &[],
            Self::GetPost | Self::DeletePost => &[ID],
            Self::GetPostsExcluding => &[EXCLUDE_ID],
            Self::CreatePost => &[POST_FIELDS],
            Self::UpdatePost => &[ID, POST_FIELDS],
            Self::CreateCategory => &[CATEGORY_FIELDS],
            Self::UploadMedia => &[SOURCE_URL, FILENAME],
        }
    }
}

impl FromStr for ActionKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|k| k.name() == s).ok_or(())
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Action ────────────────────────────────────────────────────────────────────

/// A fully parsed request for one CMS operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    GetRecentPosts,
    GetPost { id: u64 },
    GetPostsExcluding { exclude_id: u64 },
    CreatePost { fields: Fields },
    UpdatePost { id: u64, fields: Fields },
    DeletePost { id: u64 },
    GetCategories,
    CreateCategory { fields: Fields },
    UploadMedia { url: String, filename: String },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::GetRecentPosts           => ActionKind::GetRecentPosts,
            Self::GetPost { .. }           => ActionKind::GetPost,
            Self::GetPostsExcluding { .. } => ActionKind::GetPostsExcluding,
            Self::CreatePost { .. }        => ActionKind::CreatePost,
            Self::UpdatePost { .. }        => ActionKind::UpdatePost,
            Self::DeletePost { .. }        => ActionKind::DeletePost,
            Self::GetCategories            => ActionKind::GetCategories,
            Self::CreateCategory { .. }    => ActionKind::CreateCategory,
            Self::UploadMedia { .. }       => ActionKind::UploadMedia,
        }
    }

    /// Builds an action from its kind and a wire-level params value.
    ///
    /// `null` params read as `{}`. CMS fields may be nested under `fields`
    /// or given at the top level; top-level keys win. Only what the outbound
    /// call needs is checked: ids must be positive integers, upload URLs
    /// present, and upload filenames safe to put in a header.
    pub fn from_params(kind: ActionKind, params: Value) -> Result<Self> {
        let mut params = match params {
            Value::Null => Fields::new(),
            Value::Object(map) => map,
            other => {
                return Err(Error::InvalidParam {
                    name: "params",
                    reason: format!("expected an object, got {}", json_type(&other)),
                });
            }
        };

        Ok(match kind {
            ActionKind::GetRecentPosts => Self::GetRecentPosts,
            ActionKind::GetPost => Self::GetPost { id: take_id(&mut params, "id")? },
            ActionKind::GetPostsExcluding => Self::GetPostsExcluding {
                exclude_id: take_id(&mut params, "excludeId")?,
            },
            ActionKind::CreatePost => Self::CreatePost { fields: take_fields(params)? },
            ActionKind::UpdatePost => {
                let mut fields = take_fields(params)?;
                let id = take_id(&mut fields, "id")?;
                Self::UpdatePost { id, fields }
            }
            ActionKind::DeletePost => Self::DeletePost { id: take_id(&mut params, "id")? },
            ActionKind::GetCategories => Self::GetCategories,
            ActionKind::CreateCategory => Self::CreateCategory { fields: take_fields(params)? },
            ActionKind::UploadMedia => {
                let url = match params.remove("url") {
                    Some(Value::String(url)) if !url.trim().is_empty() => url,
                    Some(Value::String(_)) | None | Some(Value::Null) => {
                        return Err(Error::MissingParam("url"));
                    }
                    Some(other) => {
                        return Err(Error::InvalidParam {
                            name: "url",
                            reason: format!("expected a string, got {}", json_type(&other)),
                        });
                    }
                };
                let filename = match params.remove("filename") {
                    Some(Value::String(name)) if !name.is_empty() => checked_filename(name)?,
                    Some(Value::String(_)) | None | Some(Value::Null) => {
                        DEFAULT_UPLOAD_FILENAME.to_owned()
                    }
                    Some(other) => {
                        return Err(Error::InvalidParam {
                            name: "filename",
                            reason: format!("expected a string, got {}", json_type(&other)),
                        });
                    }
                };
                Self::UploadMedia { url, filename }
            }
        })
    }

    /// Parses a wire-level action name plus params.
    pub fn from_wire(name: &str, params: Value) -> Result<Self> {
        let kind = name.parse().map_err(|()| Error::UnknownAction)?;
        Self::from_params(kind, params)
    }

    /// The outbound call this action stands for.
    pub fn plan(&self) -> Plan {
        match self {
            Self::GetRecentPosts => Plan::new(Method::Get, "/posts")
                .query("per_page", "10"),
            Self::GetPost { id } => Plan::new(Method::Get, format!("/posts/{id}")),
            Self::GetPostsExcluding { exclude_id } => Plan::new(Method::Get, "/posts")
                .query("exclude", exclude_id.to_string())
                .query("per_page", "100"),
            Self::CreatePost { fields } => Plan::new(Method::Post, "/posts")
                .json(fields.clone()),
            Self::UpdatePost { id, fields } => Plan::new(Method::Put, format!("/posts/{id}"))
                .json(fields.clone()),
            Self::DeletePost { id } => Plan::new(Method::Delete, format!("/posts/{id}"))
                .query("force", "true"),
            Self::GetCategories => Plan::new(Method::Get, "/categories"),
            Self::CreateCategory { fields } => Plan::new(Method::Post, "/categories")
                .json(fields.clone()),
            Self::UploadMedia { url, filename } => Plan {
                body: OutboundBody::Fetch { source: url.clone(), filename: filename.clone() },
                ..Plan::new(Method::Post, "/media")
            },
        }
    }
}

fn take_id(params: &mut Fields, name: &'static str) -> Result<u64> {
    let invalid = |reason: String| Error::InvalidParam { name, reason };
    let id = match params.remove(name) {
        None | Some(Value::Null) => return Err(Error::MissingParam(name)),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| invalid(format!("{n} is not a non-negative integer")))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid(format!("`{s}` is not an integer")))?,
        Some(other) => return Err(invalid(format!("expected an integer, got {}", json_type(&other)))),
    };
    if id == 0 {
        return Err(invalid("must be positive".to_owned()));
    }
    Ok(id)
}

/// Flattens a nested `fields` object into the top-level params.
fn take_fields(mut params: Fields) -> Result<Fields> {
    match params.remove("fields") {
        None | Some(Value::Null) => Ok(params),
        Some(Value::Object(mut nested)) => {
            nested.extend(params);
            Ok(nested)
        }
        Some(other) => Err(Error::InvalidParam {
            name: "fields",
            reason: format!("expected an object, got {}", json_type(&other)),
        }),
    }
}

fn checked_filename(name: String) -> Result<String> {
    let safe = name.chars().all(|c| c.is_ascii_graphic() || c == ' ')
        && !name.contains(['"', '\\', '/']);
    if safe {
        Ok(name)
    } else {
        Err(Error::InvalidParam {
            name: "filename",
            reason: "only printable ASCII without quotes or path separators is allowed".to_owned(),
        })
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null      => "null",
        Value::Bool(_)   => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_)  => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Plan ──────────────────────────────────────────────────────────────────────

/// What goes out on the wire for one action, relative to the CMS REST root.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: OutboundBody,
}

/// Outbound body. `Fetch` becomes raw bytes once the source is downloaded.
#[derive(Clone, Debug, PartialEq)]
pub enum OutboundBody {
    Empty,
    Json(Fields),
    Fetch { source: String, filename: String },
}

impl Plan {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: OutboundBody::Empty }
    }

    fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    fn json(mut self, fields: Fields) -> Self {
        self.body = OutboundBody::Json(fields);
        self
    }

    /// `path?k=v&…`, as it appears after the REST root.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self.query.iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn plan(name: &str, params: Value) -> Plan {
        Action::from_wire(name, params).unwrap().plan()
    }

    #[test]
    fn every_kind_round_trips_its_wire_name() {
        for kind in ActionKind::ALL {
            assert_eq!(kind.name().parse::<ActionKind>(), Ok(kind));
        }
        assert!("frobnicate".parse::<ActionKind>().is_err());
        assert!("GETRECENTPOSTS".parse::<ActionKind>().is_err());
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(matches!(Action::from_wire("frobnicate", json!({})), Err(Error::UnknownAction)));
    }

    #[test]
    fn plans_match_the_cms_routes() {
        let cases = [
            ("getRecentPosts", json!({}), Method::Get, "/posts?per_page=10"),
            ("getPost", json!({"id": 3}), Method::Get, "/posts/3"),
            ("getPostsExcluding", json!({"excludeId": 9}), Method::Get, "/posts?exclude=9&per_page=100"),
            ("createPost", json!({"title": "t"}), Method::Post, "/posts"),
            ("updatePost", json!({"id": 42, "title": "x"}), Method::Put, "/posts/42"),
            ("deletePost", json!({"id": 7}), Method::Delete, "/posts/7?force=true"),
            ("getCategories", json!(null), Method::Get, "/categories"),
            ("createCategory", json!({"name": "News"}), Method::Post, "/categories"),
            ("uploadMedia", json!({"url": "http://img/a.png"}), Method::Post, "/media"),
        ];
        for (name, params, method, target) in cases {
            let plan = plan(name, params);
            assert_eq!(plan.method, method, "{name}");
            assert_eq!(plan.path_and_query(), target, "{name}");
        }
    }

    #[test]
    fn update_excludes_id_from_body() {
        let plan = plan("updatePost", json!({"id": 42, "title": "x"}));
        let OutboundBody::Json(fields) = plan.body else { panic!("expected JSON body") };
        assert_eq!(Value::Object(fields), json!({"title": "x"}));
    }

    #[test]
    fn create_relays_all_fields() {
        let fields = json!({"title": "Hello", "status": "draft", "categories": [3]});
        let plan = plan("createPost", fields.clone());
        assert_eq!(plan.body, OutboundBody::Json(fields.as_object().unwrap().clone()));
    }

    #[test]
    fn nested_fields_are_flattened_into_the_body() {
        let created = plan("createPost", json!({"fields": {"title": "x", "status": "draft"}}));
        let OutboundBody::Json(fields) = created.body else { panic!("expected JSON body") };
        assert_eq!(Value::Object(fields), json!({"title": "x", "status": "draft"}));

        let plan = plan("updatePost", json!({"id": 42, "fields": {"title": "y"}}));
        assert_eq!(plan.path_and_query(), "/posts/42");
        let OutboundBody::Json(fields) = plan.body else { panic!("expected JSON body") };
        assert_eq!(Value::Object(fields), json!({"title": "y"}));
    }

    #[test]
    fn top_level_fields_win_over_nested_ones() {
        let plan = plan("updatePost", json!({"id": 5, "title": "top", "fields": {"id": 9, "title": "nested", "slug": "s"}}));
        assert_eq!(plan.path_and_query(), "/posts/5");
        let OutboundBody::Json(fields) = plan.body else { panic!("expected JSON body") };
        assert_eq!(Value::Object(fields), json!({"title": "top", "slug": "s"}));
    }

    #[test]
    fn non_object_fields_are_rejected() {
        assert!(matches!(
            Action::from_wire("createCategory", json!({"fields": "News"})),
            Err(Error::InvalidParam { name: "fields", .. })
        ));
    }

    #[test]
    fn ids_accept_numbers_and_digit_strings() {
        assert_eq!(Action::from_wire("getPost", json!({"id": "15"})).unwrap(), Action::GetPost { id: 15 });
        assert!(matches!(
            Action::from_wire("deletePost", json!({})),
            Err(Error::MissingParam("id"))
        ));
        for bad in [json!({"id": "abc"}), json!({"id": -1}), json!({"id": 1.5}), json!({"id": 0}), json!({"id": [1]})] {
            assert!(
                matches!(Action::from_wire("deletePost", bad.clone()), Err(Error::InvalidParam { name: "id", .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn upload_defaults_filename() {
        let action = Action::from_wire("uploadMedia", json!({"url": "http://img/a"})).unwrap();
        assert_eq!(
            action.plan().body,
            OutboundBody::Fetch { source: "http://img/a".into(), filename: "upload.jpg".into() }
        );
    }

    #[test]
    fn upload_requires_url_and_a_header_safe_filename() {
        assert!(matches!(Action::from_wire("uploadMedia", json!({})), Err(Error::MissingParam("url"))));
        assert!(matches!(
            Action::from_wire("uploadMedia", json!({"url": "http://x", "filename": "a\"b.jpg"})),
            Err(Error::InvalidParam { name: "filename", .. })
        ));
        assert!(matches!(
            Action::from_wire("uploadMedia", json!({"url": "http://x", "filename": "../etc/passwd"})),
            Err(Error::InvalidParam { name: "filename", .. })
        ));
    }

    #[test]
    fn non_object_params_are_rejected() {
        assert!(matches!(
            Action::from_wire("createPost", json!([1, 2])),
            Err(Error::InvalidParam { name: "params", .. })
        ));
    }
}
