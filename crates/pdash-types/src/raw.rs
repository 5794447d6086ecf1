//! Untrusted persisted shapes.
//!
//! Whatever a backend holds was written by an older version, edited by
//! hand, or synced from another machine. [`RawGroup`] and [`RawProject`]
//! accept any of that: every field is optional and `null` entries are kept
//! as `None` so the sanitizer can drop them. Nothing outside the sanitizer
//! should read a raw forest.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::group::Group;
use crate::project::Project;

/// Top-level persisted value: an ordered list of possibly-null groups.
pub type RawForest = Vec<Option<RawGroup>>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProject {
    pub id: Option<String>,
    pub name: Option<String>,
    pub path: Option<String>,
    pub color: Option<String>,
    pub is_git_repo: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGroup {
    pub id: Option<String>,
    pub group_name: Option<String>,
    pub collapsed: Option<bool>,
    pub projects: Option<Vec<Option<RawProject>>>,
    pub children: Option<Vec<Option<RawGroup>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl From<Project> for RawProject {
    fn from(p: Project) -> Self {
        Self {
            id: Some(p.id),
            name: Some(p.name),
            path: Some(p.path),
            color: Some(p.color),
            is_git_repo: Some(p.is_git_repo),
        }
    }
}

impl From<Group> for RawGroup {
    fn from(g: Group) -> Self {
        Self {
            id: Some(g.id),
            group_name: g.group_name,
            collapsed: Some(g.collapsed),
            projects: Some(g.projects.into_iter().map(|p| Some(p.into())).collect()),
            children: Some(g.children.into_iter().map(|c| Some(c.into())).collect()),
            parent_id: g.parent_id,
        }
    }
}

/// Convert a typed forest back to its persisted shape.
pub fn to_raw_forest(groups: &[Group]) -> RawForest {
    groups.iter().cloned().map(|g| Some(g.into())).collect()
}

/// Decode an arbitrary JSON value into a raw forest.
///
/// A value that is not an array decodes as an empty forest. Array entries
/// that are not group-shaped decode as `None`, the same as an explicit
/// `null`. Nested entries are decoded the same way.
pub fn decode_forest(value: Value) -> RawForest {
    match value {
        Value::Array(items) => items.into_iter().map(decode_group).collect(),
        _ => Vec::new(),
    }
}

fn decode_group(value: Value) -> Option<RawGroup> {
    let Value::Object(mut map) = value else {
        return None;
    };
    let projects = map.remove("projects").map(|v| match v {
        Value::Array(items) => items.into_iter().map(decode_project).collect(),
        _ => Vec::new(),
    });
    let children = map.remove("children").map(|v| match v {
        Value::Array(items) => items.into_iter().map(decode_group).collect(),
        _ => Vec::new(),
    });
    Some(RawGroup {
        id: string_field(map.get("id")),
        group_name: string_field(map.get("groupName")),
        collapsed: map.get("collapsed").and_then(Value::as_bool),
        projects,
        children,
        parent_id: string_field(map.get("parentId")),
    })
}

fn decode_project(value: Value) -> Option<RawProject> {
    let Value::Object(map) = value else {
        return None;
    };
    Some(RawProject {
        id: string_field(map.get("id")),
        name: string_field(map.get("name")),
        path: string_field(map.get("path")),
        color: string_field(map.get("color")),
        is_git_repo: map.get("isGitRepo").and_then(Value::as_bool),
    })
}

fn string_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}
