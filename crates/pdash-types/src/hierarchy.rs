use serde::{Deserialize, Serialize};

/// ID-only snapshot of one group in the forest, as laid out on screen.
///
/// Produced by the drag-and-drop layer after every drop and sent to the
/// host as the authoritative structure. IDs may be stale: the receiver
/// must resolve them against what it actually holds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupHierarchy {
    pub group_id: String,
    #[serde(default)]
    pub project_ids: Vec<String>,
    #[serde(default)]
    pub children: Vec<GroupHierarchy>,
    /// Nesting depth, 0 for top-level groups.
    #[serde(default)]
    pub level: u32,
}

impl GroupHierarchy {
    pub fn new(group_id: impl Into<String>, project_ids: Vec<String>, level: u32) -> Self {
        Self {
            group_id: group_id.into(),
            project_ids,
            children: Vec::new(),
            level,
        }
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: GroupHierarchy) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(GroupHierarchy::node_count).sum::<usize>()
    }

    /// Number of project IDs referenced anywhere in this subtree.
    pub fn project_count(&self) -> usize {
        self.project_ids.len()
            + self
                .children
                .iter()
                .map(GroupHierarchy::project_count)
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_camel_case() {
        let h = GroupHierarchy::new("g1", vec!["p1".into()], 0)
            .with_child(GroupHierarchy::new("g2", vec![], 1));
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["groupId"], "g1");
        assert_eq!(json["projectIds"][0], "p1");
        assert_eq!(json["children"][0]["level"], 1);
    }

    #[test]
    fn counts_include_nested_nodes() {
        let h = GroupHierarchy::new("g1", vec!["p1".into()], 0).with_child(
            GroupHierarchy::new("g2", vec!["p2".into(), "p3".into()], 1)
                .with_child(GroupHierarchy::new("g3", vec![], 2)),
        );
        assert_eq!(h.node_count(), 3);
        assert_eq!(h.project_count(), 3);
    }

    #[test]
    fn missing_lists_default_empty() {
        let h: GroupHierarchy = serde_json::from_str(r#"{"groupId":"g1"}"#).unwrap();
        assert!(h.project_ids.is_empty());
        assert!(h.children.is_empty());
        assert_eq!(h.level, 0);
    }
}
