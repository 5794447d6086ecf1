//! Derive a [`GroupHierarchy`] forest from the live element tree.
//!
//! Markup conventions:
//!
//! ```text
//! .groups-wrapper
//!   .group[data-group-id]
//!     .group-list
//!       .project[data-id]                       (bare card)
//!       .project-container > .project[data-id]  (wrapped card)
//!     .subgroups
//!       .group[data-group-id] ...
//! #tempGroup                                    (staging group)
//! ```

use pdash_types::{temp_group_id, GroupHierarchy};
use tracing::debug;

use crate::dom::{Document, ElementId};
use crate::error::DndResult;

pub const GROUPS_CONTAINER_CLASS: &str = "groups-wrapper";
pub const PROJECTS_CONTAINER_CLASS: &str = "group-list";
pub const GROUP_CLASS: &str = "group";
pub const SUBGROUPS_CLASS: &str = "subgroups";
pub const PROJECT_CLASS: &str = "project";
pub const PROJECT_WRAPPER_CLASS: &str = "project-container";
pub const GROUP_ID_ATTR: &str = "data-group-id";
pub const PROJECT_ID_ATTR: &str = "data-id";
pub const TEMP_GROUP_DOM_ID: &str = "tempGroup";

fn is_group(doc: &Document, id: ElementId) -> bool {
    doc.has_class(id, GROUP_CLASS) && doc.has_attribute(id, GROUP_ID_ATTR)
}

fn project_id(doc: &Document, id: ElementId) -> Option<&str> {
    if !doc.has_class(id, PROJECT_CLASS) {
        return None;
    }
    doc.attribute(id, PROJECT_ID_ATTR).filter(|v| !v.is_empty())
}

/// Snapshot of one group element and its subgroups.
///
/// Only projects owned at this level are collected; nested groups'
/// projects belong to their own nodes.
pub fn build_group_hierarchy(doc: &Document, element: ElementId, level: u32) -> GroupHierarchy {
    let group_id = doc.attribute(element, GROUP_ID_ATTR).unwrap_or_default();

    let mut project_ids = Vec::new();
    for list in doc.children_with_class(element, PROJECTS_CONTAINER_CLASS) {
        for &child in doc.children(list) {
            if let Some(id) = project_id(doc, child) {
                project_ids.push(id.to_string());
            } else if doc.has_class(child, PROJECT_WRAPPER_CLASS) {
                project_ids.extend(
                    doc.children(child)
                        .iter()
                        .filter_map(|&card| project_id(doc, card))
                        .map(str::to_string),
                );
            }
        }
    }

    let children = doc
        .child_with_class(element, SUBGROUPS_CLASS)
        .map(|subgroups| {
            doc.children(subgroups)
                .iter()
                .filter(|&&g| is_group(doc, g))
                .map(|&g| build_group_hierarchy(doc, g, level + 1))
                .collect()
        })
        .unwrap_or_default();

    GroupHierarchy {
        group_id: group_id.to_string(),
        project_ids,
        children,
        level,
    }
}

/// Top-level group elements, in document order.
pub fn top_level_groups(doc: &Document) -> Vec<ElementId> {
    doc.query_class(GROUPS_CONTAINER_CLASS)
        .into_iter()
        .flat_map(|wrapper| doc.children(wrapper).to_vec())
        .filter(|&g| is_group(doc, g))
        .collect()
}

/// Snapshot the whole dashboard.
///
/// The staging group is appended only if some element inside it carries a
/// project ID. A staging group without an ID is stamped with a temporary
/// one derived from `now_ms`, so later snapshots in the same session reuse
/// it.
pub fn collect_hierarchy(doc: &mut Document, now_ms: u64) -> DndResult<Vec<GroupHierarchy>> {
    let mut roots = top_level_groups(doc);

    if let Some(staging) = doc.get_element_by_id(TEMP_GROUP_DOM_ID) {
        let holds_projects = doc
            .descendants(staging)
            .into_iter()
            .any(|d| doc.has_attribute(d, PROJECT_ID_ATTR));
        if holds_projects {
            if doc.attribute(staging, GROUP_ID_ATTR).map_or(true, str::is_empty) {
                let id = temp_group_id(now_ms);
                debug!(group_id = %id, "stamped staging group");
                doc.set_attribute(staging, GROUP_ID_ATTR, &id)?;
            }
            if !roots.contains(&staging) {
                roots.push(staging);
            }
        }
    }

    Ok(roots
        .into_iter()
        .map(|g| build_group_hierarchy(doc, g, 0))
        .collect())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Builds dashboard markup for tests.
    pub struct Markup {
        pub doc: Document,
        pub wrapper: ElementId,
    }

    impl Markup {
        pub fn new() -> Self {
            let mut doc = Document::new();
            let wrapper = doc.create("div", &[GROUPS_CONTAINER_CLASS], &[]);
            doc.append_child(doc.body(), wrapper).unwrap();
            Self { doc, wrapper }
        }

        /// Append a group with bare project cards; returns (group, list).
        pub fn group(&mut self, parent: ElementId, id: &str, projects: &[&str]) -> (ElementId, ElementId) {
            let group = self.doc.create("div", &[GROUP_CLASS], &[(GROUP_ID_ATTR, id)]);
            let list = self.doc.create("div", &[PROJECTS_CONTAINER_CLASS], &[]);
            self.doc.append_child(parent, group).unwrap();
            self.doc.append_child(group, list).unwrap();
            for p in projects {
                self.project(list, p);
            }
            (group, list)
        }

        pub fn project(&mut self, list: ElementId, id: &str) -> ElementId {
            let card = self.doc.create("div", &[PROJECT_CLASS], &[(PROJECT_ID_ATTR, id)]);
            self.doc.append_child(list, card).unwrap();
            card
        }

        /// The `.subgroups` container of `group`, created on demand.
        pub fn subgroups(&mut self, group: ElementId) -> ElementId {
            if let Some(s) = self.doc.child_with_class(group, SUBGROUPS_CLASS) {
                return s;
            }
            let s = self.doc.create("div", &[SUBGROUPS_CLASS], &[]);
            self.doc.append_child(group, s).unwrap();
            s
        }

        /// A staging group outside the wrapper; returns (group, list).
        pub fn staging(&mut self) -> (ElementId, ElementId) {
            let group = self.doc.create("div", &[GROUP_CLASS], &[]);
            self.doc.set_dom_id(group, TEMP_GROUP_DOM_ID).unwrap();
            let list = self.doc.create("div", &[PROJECTS_CONTAINER_CLASS], &[]);
            self.doc.append_child(self.doc.body(), group).unwrap();
            self.doc.append_child(group, list).unwrap();
            (group, list)
        }
    }
}
