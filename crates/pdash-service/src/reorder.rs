//! Rebuild a forest from a drag-and-drop hierarchy snapshot.
//!
//! The snapshot is authoritative for structure and order, but it only
//! carries IDs and may be stale. Every ID is resolved against the current
//! forest; entities are relocated, never invented, with one exception: an
//! unknown group ID (the staging group's temporary ID) becomes a new
//! unnamed group if it ends up owning something.

use std::collections::{HashMap, HashSet};

use pdash_types::{generate_id, Group, GroupHierarchy, Project};

/// Result of applying a hierarchy snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReorderOutcome {
    /// The rebuilt forest, not yet sanitized or persisted.
    pub forest: Vec<Group>,
    /// IDs of groups minted for unknown, non-empty snapshot nodes.
    pub created_groups: Vec<String>,
    /// Existing groups the snapshot no longer mentions.
    pub dropped_groups: Vec<String>,
    /// Existing projects the snapshot no longer mentions.
    pub dropped_projects: Vec<String>,
    /// Snapshot IDs that resolved to nothing or were repeated.
    pub skipped_ids: Vec<String>,
}

impl ReorderOutcome {
    /// Returns `true` if the rebuild discarded anything the caller had.
    pub fn lost_entities(&self) -> bool {
        !self.dropped_groups.is_empty() || !self.dropped_projects.is_empty()
    }
}

/// Rebuild `current` to match `hierarchy`.
pub fn apply_reorder(current: Vec<Group>, hierarchy: &[GroupHierarchy]) -> ReorderOutcome {
    let mut pool = Pool::default();
    pool.absorb(current);

    let mut outcome = ReorderOutcome::default();
    let mut used_groups = HashSet::new();
    let forest: Vec<Group> = hierarchy
        .iter()
        .filter_map(|node| build(node, None, &mut pool, &mut used_groups, &mut outcome))
        .collect();
    outcome.forest = forest;

    outcome.dropped_groups = pool
        .group_order
        .into_iter()
        .filter(|id| pool.groups.contains_key(id))
        .collect();
    outcome.dropped_projects = pool
        .project_order
        .into_iter()
        .filter(|id| pool.projects.contains_key(id))
        .collect();
    outcome
}

/// Current entities keyed by ID, detached from their old positions.
#[derive(Default)]
struct Pool {
    groups: HashMap<String, Group>,
    projects: HashMap<String, Project>,
    group_order: Vec<String>,
    project_order: Vec<String>,
}

impl Pool {
    fn absorb(&mut self, groups: Vec<Group>) {
        for mut group in groups {
            let children = std::mem::take(&mut group.children);
            for project in std::mem::take(&mut group.projects) {
                self.project_order.push(project.id.clone());
                self.projects.entry(project.id.clone()).or_insert(project);
            }
            self.group_order.push(group.id.clone());
            self.groups.entry(group.id.clone()).or_insert(group);
            self.absorb(children);
        }
    }
}

fn build(
    node: &GroupHierarchy,
    parent_id: Option<&str>,
    pool: &mut Pool,
    used_groups: &mut HashSet<String>,
    outcome: &mut ReorderOutcome,
) -> Option<Group> {
    if !node.group_id.is_empty() && !used_groups.insert(node.group_id.clone()) {
        outcome.skipped_ids.push(node.group_id.clone());
        return None;
    }

    let existing = pool.groups.remove(&node.group_id);
    let id = match &existing {
        Some(group) => group.id.clone(),
        None if node.group_id.is_empty() => generate_id(None),
        None => node.group_id.clone(),
    };

    let mut projects = Vec::with_capacity(node.project_ids.len());
    for project_id in &node.project_ids {
        match pool.projects.remove(project_id) {
            Some(project) => projects.push(project),
            None => outcome.skipped_ids.push(project_id.clone()),
        }
    }
    let children: Vec<Group> = node
        .children
        .iter()
        .filter_map(|child| build(child, Some(id.as_str()), pool, used_groups, outcome))
        .collect();

    let parent_id = parent_id.map(str::to_string);
    match existing {
        Some(mut group) => {
            group.projects = projects;
            group.children = children;
            group.parent_id = parent_id;
            Some(group)
        }
        None if projects.is_empty() && children.is_empty() => {
            if !node.group_id.is_empty() {
                outcome.skipped_ids.push(node.group_id.clone());
            }
            None
        }
        None => {
            outcome.created_groups.push(id.clone());
            Some(Group {
                id,
                group_name: None,
                collapsed: false,
                projects,
                children,
                parent_id,
            })
        }
    }
}
