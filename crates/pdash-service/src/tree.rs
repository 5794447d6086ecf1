//! Pure lookups and edits over a forest of groups.
//!
//! Nothing here touches storage. Lookups walk the forest in pre-order
//! (group, then its children recursively), which is also the order of the
//! flattened view. Edits either take `&mut` to a located node or consume a
//! forest and return a new one.

use std::collections::HashSet;

use pdash_types::{generate_id, Group, Project};

/// Pre-order linearization of the forest.
pub fn flatten(groups: &[Group]) -> Vec<&Group> {
    let mut flat = Vec::new();
    push_pre_order(groups, &mut flat);
    flat
}

fn push_pre_order<'a>(groups: &'a [Group], flat: &mut Vec<&'a Group>) {
    for group in groups {
        flat.push(group);
        push_pre_order(&group.children, flat);
    }
}

/// Every project, in flattened group order.
pub fn projects_flat(groups: &[Group]) -> Vec<&Project> {
    flatten(groups)
        .into_iter()
        .flat_map(|g| g.projects.iter())
        .collect()
}

/// Every group and project ID in pre-order (group ID before its projects).
pub fn all_ids(groups: &[Group]) -> Vec<String> {
    flatten(groups)
        .into_iter()
        .flat_map(|g| {
            std::iter::once(g.id.clone()).chain(g.projects.iter().map(|p| p.id.clone()))
        })
        .collect()
}

/// Give every project in `incoming` whose ID is empty or already in
/// `taken` a fresh one, then record it as taken. Stored IDs never change,
/// so a collision is always resolved on the incoming side.
///
/// Returns the number of projects re-keyed.
pub fn rekey_colliding(taken: &mut HashSet<String>, incoming: &mut [Project]) -> usize {
    let mut rekeyed = 0;
    for project in incoming {
        if !project.id.is_empty() && taken.insert(project.id.clone()) {
            continue;
        }
        loop {
            let fresh = generate_id(Some(&project.name));
            if taken.insert(fresh.clone()) {
                project.id = fresh;
                break;
            }
        }
        rekeyed += 1;
    }
    rekeyed
}

/// Depth-first search for a group by ID.
pub fn find_in_tree<'a>(groups: &'a [Group], id: &str) -> Option<&'a Group> {
    for group in groups {
        if group.id == id {
            return Some(group);
        }
        if let Some(found) = find_in_tree(&group.children, id) {
            return Some(found);
        }
    }
    None
}

/// Mutable depth-first search for a group by ID.
pub fn find_in_tree_mut<'a>(groups: &'a mut [Group], id: &str) -> Option<&'a mut Group> {
    for group in groups {
        if group.id == id {
            return Some(group);
        }
        if let Some(found) = find_in_tree_mut(&mut group.children, id) {
            return Some(found);
        }
    }
    None
}

/// The first project with `id` and the group that owns it.
pub fn find_project_and_group<'a>(
    groups: &'a [Group],
    id: &str,
) -> Option<(&'a Project, &'a Group)> {
    flatten(groups).into_iter().find_map(|g| {
        g.projects
            .iter()
            .find(|p| p.id == id)
            .map(|p| (p, g))
    })
}

/// Mutable access to the first project with `id`, at any depth.
pub fn find_project_mut<'a>(groups: &'a mut [Group], id: &str) -> Option<&'a mut Project> {
    for group in groups {
        if let Some(project) = group.projects.iter_mut().find(|p| p.id == id) {
            return Some(project);
        }
        if let Some(found) = find_project_mut(&mut group.children, id) {
            return Some(found);
        }
    }
    None
}

/// Remove the group with `id` wherever it sits.
///
/// With `only_if_empty`, a match that still owns projects is kept. A kept
/// group's children are filtered the same way, so nested matches go too.
pub fn remove_group(groups: Vec<Group>, id: &str, only_if_empty: bool) -> Vec<Group> {
    groups
        .into_iter()
        .filter_map(|mut g| {
            if g.id == id && (!only_if_empty || g.projects.is_empty()) {
                return None;
            }
            if !g.children.is_empty() {
                g.children = remove_group(std::mem::take(&mut g.children), id, only_if_empty);
            }
            Some(g)
        })
        .collect()
}

/// Remove the first project with `id` from the root groups' own lists.
///
/// Nested groups are not searched. Returns the removed project.
pub fn remove_root_project(groups: &mut [Group], id: &str) -> Option<Project> {
    groups.iter_mut().find_map(|g| {
        g.projects
            .iter()
            .position(|p| p.id == id)
            .map(|index| g.projects.remove(index))
    })
}
