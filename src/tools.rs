//! The static tool manifest served at `GET /mcp/tools`.

use serde::Serialize;

use crate::action::{ActionKind, ParamSpec};

/// One callable tool as advertised to clients.
#[derive(Debug, Serialize)]
pub struct Tool {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

#[derive(Debug, Serialize)]
pub struct Manifest {
    pub tools: Vec<Tool>,
}

/// Describes every action; needs no upstream contact.
pub fn manifest() -> Manifest {
    let tools = ActionKind::ALL
        .into_iter()
        .map(|kind| Tool { name: kind.name(), description: kind.description(), params: kind.params() })
        .collect();
    Manifest { tools }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::*;
    use crate::action::{Action, OutboundBody, ParamType};

    #[test]
    fn lists_every_action_once() {
        let names: Vec<_> = manifest().tools.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), ActionKind::ALL.len());
        for kind in ActionKind::ALL {
            assert_eq!(names.iter().filter(|n| **n == kind.name()).count(), 1);
        }
    }

    #[test]
    fn params_serialise_with_json_types() {
        let doc = serde_json::to_value(manifest()).unwrap();
        let upload = doc["tools"]
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["name"] == "uploadMedia")
            .unwrap();
        assert_eq!(upload["params"][0]["name"], "url");
        assert_eq!(upload["params"][0]["type"], "string");
        assert_eq!(upload["params"][0]["required"], Value::Bool(true));
        assert_eq!(upload["params"][1], json!({
            "name": "filename",
            "type": "string",
            "required": false,
            "description": "Name to store the file under (default upload.jpg)",
        }));
    }

    fn sample(spec: &ParamSpec) -> Value {
        match (spec.kind, spec.name) {
            (ParamType::Integer, _) => json!(7),
            (ParamType::String, "url") => json!("http://img.example/cat.png"),
            (ParamType::String, _) => json!("cat.png"),
            (ParamType::Object, _) => json!({ "title": "x" }),
        }
    }

    #[test]
    fn advertised_params_build_the_expected_plan() {
        for tool in manifest().tools {
            let args: Map<String, Value> =
                tool.params.iter().map(|p| (p.name.to_owned(), sample(p))).collect();
            let kind: ActionKind = tool.name.parse().unwrap();
            let plan = Action::from_params(kind, Value::Object(args))
                .unwrap_or_else(|e| panic!("{}: {e}", tool.name))
                .plan();

            let (target, body) = match kind {
                ActionKind::GetRecentPosts => ("/posts?per_page=10", OutboundBody::Empty),
                ActionKind::GetPost => ("/posts/7", OutboundBody::Empty),
                ActionKind::GetPostsExcluding => ("/posts?exclude=7&per_page=100", OutboundBody::Empty),
                ActionKind::CreatePost | ActionKind::UpdatePost => {
                    let target = if kind == ActionKind::UpdatePost { "/posts/7" } else { "/posts" };
                    (target, OutboundBody::Json(json!({ "title": "x" }).as_object().unwrap().clone()))
                }
                ActionKind::DeletePost => ("/posts/7?force=true", OutboundBody::Empty),
                ActionKind::GetCategories => ("/categories", OutboundBody::Empty),
                ActionKind::CreateCategory => (
                    "/categories",
                    OutboundBody::Json(json!({ "title": "x" }).as_object().unwrap().clone()),
                ),
                ActionKind::UploadMedia => ("/media", OutboundBody::Fetch {
                    source: "http://img.example/cat.png".into(),
                    filename: "cat.png".into(),
                }),
            };
            assert_eq!(plan.path_and_query(), target, "{}", tool.name);
            assert_eq!(plan.body, body, "{}", tool.name);
        }
    }
}
