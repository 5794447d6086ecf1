use pdash_types::GroupHierarchy;
use serde::{Deserialize, Serialize};

/// Largest accepted encoded message.
pub const MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

/// Deepest accepted group nesting in a hierarchy snapshot.
pub const MAX_HIERARCHY_DEPTH: usize = 32;

/// Messages posted from the dashboard view to the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HostMessage {
    /// Full layout after a drop, replacing the stored structure.
    #[serde(rename_all = "camelCase")]
    ReorderedProjects { group_hierarchy: Vec<GroupHierarchy> },
}

impl HostMessage {
    /// Every `type` value this host understands.
    pub const TYPES: &'static [&'static str] = &["reordered-projects"];

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ReorderedProjects { .. } => "reordered-projects",
        }
    }

    /// Deepest nesting level in the message, 1 for a flat hierarchy and 0
    /// for none.
    pub fn depth(&self) -> usize {
        match self {
            Self::ReorderedProjects { group_hierarchy } => forest_depth(group_hierarchy),
        }
    }
}

fn forest_depth(nodes: &[GroupHierarchy]) -> usize {
    nodes
        .iter()
        .map(|n| 1 + forest_depth(&n.children))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_format_matches_view_script() {
        let msg = HostMessage::ReorderedProjects {
            group_hierarchy: vec![GroupHierarchy::new("g1", vec!["p1".into()], 0)],
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "reordered-projects",
                "groupHierarchy": [
                    {"groupId": "g1", "projectIds": ["p1"], "children": [], "level": 0}
                ]
            })
        );
    }

    #[test]
    fn type_name_is_listed() {
        let msg = HostMessage::ReorderedProjects { group_hierarchy: vec![] };
        assert!(HostMessage::TYPES.contains(&msg.type_name()));
    }

    #[test]
    fn depth_of_nested_hierarchy() {
        let msg = HostMessage::ReorderedProjects {
            group_hierarchy: vec![
                GroupHierarchy::new("a", vec![], 0)
                    .with_child(GroupHierarchy::new("b", vec![], 1)
                        .with_child(GroupHierarchy::new("c", vec![], 2))),
                GroupHierarchy::new("d", vec![], 0),
            ],
        };
        assert_eq!(msg.depth(), 3);
        let empty = HostMessage::ReorderedProjects { group_hierarchy: vec![] };
        assert_eq!(empty.depth(), 0);
    }
}
