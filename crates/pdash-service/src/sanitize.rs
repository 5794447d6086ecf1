//! Repair pass turning untrusted persisted data into a typed forest.
//!
//! - `null` groups and `null` projects are dropped.
//! - Missing `projects`/`children` become empty lists.
//! - A missing or empty ID is regenerated; so is any ID already claimed
//!   earlier in pre-order, so IDs stay unique across the whole forest.
//! - Order inside every list is preserved.
//!
//! The pass is idempotent: its output contains nothing it would repair.

use std::collections::HashSet;

use pdash_types::{generate_id, to_raw_forest, Group, Project, RawForest, RawGroup, RawProject};
use tracing::debug;

/// Decode and repair a raw forest.
pub fn sanitize_forest(raw: RawForest) -> Vec<Group> {
    let mut sanitizer = Sanitizer::default();
    let groups = sanitizer.groups(raw);
    if sanitizer.repaired > 0 {
        debug!(repaired = sanitizer.repaired, "sanitized forest");
    }
    groups
}

/// Repair an already-typed forest (e.g. one built from user input).
pub fn sanitize_groups(groups: &[Group]) -> Vec<Group> {
    sanitize_forest(to_raw_forest(groups))
}

#[derive(Default)]
struct Sanitizer {
    seen: HashSet<String>,
    repaired: usize,
}

impl Sanitizer {
    fn groups(&mut self, raw: Vec<Option<RawGroup>>) -> Vec<Group> {
        let before = raw.len();
        let groups: Vec<Group> = raw.into_iter().flatten().map(|g| self.group(g)).collect();
        self.repaired += before - groups.len();
        groups
    }

    fn group(&mut self, raw: RawGroup) -> Group {
        let id = self.claim(raw.id);
        if raw.projects.is_none() || raw.children.is_none() {
            self.repaired += 1;
        }
        let projects = raw
            .projects
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(|p| self.project(p))
            .collect();
        let children = self.groups(raw.children.unwrap_or_default());
        Group {
            id,
            group_name: raw.group_name,
            collapsed: raw.collapsed.unwrap_or(false),
            projects,
            children,
            parent_id: raw.parent_id,
        }
    }

    fn project(&mut self, raw: RawProject) -> Project {
        Project {
            id: self.claim(raw.id),
            name: raw.name.unwrap_or_default(),
            path: raw.path.unwrap_or_default(),
            color: raw.color.unwrap_or_default(),
            is_git_repo: raw.is_git_repo.unwrap_or(false),
        }
    }

    /// Keep `id` if it is non-empty and unclaimed, otherwise mint a new one.
    fn claim(&mut self, id: Option<String>) -> String {
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            if self.seen.insert(id.clone()) {
                return id;
            }
        }
        self.repaired += 1;
        loop {
            let fresh = generate_id(None);
            if self.seen.insert(fresh.clone()) {
                return fresh;
            }
        }
    }
}
