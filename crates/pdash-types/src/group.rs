use serde::{Deserialize, Serialize};

use crate::id::generate_id;
use crate::project::Project;

/// An ordered container of projects and nested subgroups.
///
/// A group exclusively owns its `projects` and `children`; the tree edge is
/// the structural parent. `parent_id` is informational only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub group_name: Option<String>,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub children: Vec<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Group {
    /// Create a group with a fresh ID seeded from its name.
    pub fn new(
        group_name: Option<&str>,
        projects: Vec<Project>,
        parent_id: Option<String>,
    ) -> Self {
        Self {
            id: generate_id(group_name),
            group_name: group_name.map(str::to_string),
            collapsed: false,
            projects,
            children: Vec::new(),
            parent_id,
        }
    }

    /// The anonymous group created when a project is added to an empty
    /// forest.
    pub fn unnamed() -> Self {
        Self::new(None, Vec::new(), None)
    }

    /// Returns `true` if the group owns no projects of its own.
    pub fn has_no_projects(&self) -> bool {
        self.projects.is_empty()
    }

    /// Name for display, falling back to a placeholder for unnamed groups.
    pub fn display_name(&self) -> &str {
        match self.group_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "Unnamed Group",
        }
    }

    /// Number of groups in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Group::subtree_len).sum::<usize>()
    }
}

/// Partial update for a [`Group`].
///
/// `id` is accepted for payload compatibility but never applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupPatch {
    pub id: Option<String>,
    pub group_name: Option<String>,
    pub collapsed: Option<bool>,
    pub projects: Option<Vec<Project>>,
    pub parent_id: Option<String>,
}

impl GroupPatch {
    /// Merge the patch into `group`, leaving its `id` and children untouched.
    pub fn apply_to(&self, group: &mut Group) {
        if let Some(name) = &self.group_name {
            group.group_name = Some(name.clone());
        }
        if let Some(collapsed) = self.collapsed {
            group.collapsed = collapsed;
        }
        if let Some(projects) = &self.projects {
            group.projects = projects.clone();
        }
        if let Some(parent_id) = &self.parent_id {
            group.parent_id = Some(parent_id.clone());
        }
    }
}
