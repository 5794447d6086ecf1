use std::collections::HashSet;
use std::sync::Arc;

use pdash_protocol::HostMessage;
use pdash_store::StoreAdapter;
use pdash_types::{
    to_raw_forest, Group, GroupHierarchy, GroupPatch, Project, ProjectPatch, RawForest,
};
use tracing::{debug, info, warn};

use crate::colors::{BestEffort, RecentColors};
use crate::config::ServiceConfig;
use crate::error::ServiceResult;
use crate::reorder::{self, ReorderOutcome};
use crate::sanitize::{sanitize_forest, sanitize_groups};
use crate::tree;

const RECENT_COLOR: BestEffort = BestEffort::new("recent-color");

/// What [`HierarchyService::startup`] found and did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartupReport {
    /// The active backend was virgin and got filled from the other one.
    pub migrated: bool,
    /// The inactive backend still holds groups (divergent state).
    pub other_backend_has_data: bool,
}

/// The authoritative owner of the group/project forest.
///
/// Every mutation is read, edit, sanitize, write of the whole forest.
/// Mutating methods take `&mut self`: concurrent mutations would race on
/// the read and the later write would silently win, so exclusive access is
/// required to issue one.
pub struct HierarchyService {
    store: StoreAdapter,
    colors: Arc<dyn RecentColors>,
    config: ServiceConfig,
}

impl HierarchyService {
    pub fn new(store: StoreAdapter, colors: Arc<dyn RecentColors>, config: ServiceConfig) -> Self {
        Self {
            store,
            colors,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn store(&self) -> &StoreAdapter {
        &self.store
    }

    /// Migrate into a virgin active backend and report divergent state.
    pub async fn startup(&self) -> ServiceResult<StartupReport> {
        let migrated = self.store.migrate_if_needed().await?;
        let other_backend_has_data = self.store.other_backend_has_data().await?;
        if other_backend_has_data {
            warn!(active = %self.store.active_backend(), "inactive backend also holds projects");
        }
        Ok(StartupReport {
            migrated,
            other_backend_has_data,
        })
    }

    // ---- Reads ----

    /// The sanitized forest from the active backend.
    pub async fn list(&self) -> ServiceResult<Vec<Group>> {
        Ok(sanitize_forest(self.store.read_active().await?))
    }

    /// The forest exactly as stored, without the repair pass.
    pub async fn list_unsanitized(&self) -> ServiceResult<RawForest> {
        Ok(self.store.read_active().await?)
    }

    /// All groups in pre-order.
    pub async fn flatten(&self) -> ServiceResult<Vec<Group>> {
        let groups = self.list().await?;
        Ok(tree::flatten(&groups).into_iter().cloned().collect())
    }

    /// All projects in flattened group order.
    pub async fn projects_flat(&self) -> ServiceResult<Vec<Project>> {
        let groups = self.list().await?;
        Ok(tree::projects_flat(&groups).into_iter().cloned().collect())
    }

    pub async fn find_group(&self, id: &str) -> ServiceResult<Option<Group>> {
        let groups = self.list().await?;
        Ok(tree::find_in_tree(&groups, id).cloned())
    }

    pub async fn find_project(&self, id: &str) -> ServiceResult<Option<Project>> {
        Ok(self.find_project_and_group(id).await?.0)
    }

    /// The project with `id` and its owning group, or `(None, None)`.
    pub async fn find_project_and_group(
        &self,
        id: &str,
    ) -> ServiceResult<(Option<Project>, Option<Group>)> {
        if id.is_empty() {
            return Ok((None, None));
        }
        let groups = self.list().await?;
        Ok(match tree::find_project_and_group(&groups, id) {
            Some((project, group)) => (Some(project.clone()), Some(group.clone())),
            None => (None, None),
        })
    }

    // ---- Mutations ----

    /// Create a group, as the last child of `parent_id` if that resolves,
    /// otherwise as the last root group.
    pub async fn add_group(
        &mut self,
        name: Option<&str>,
        mut projects: Vec<Project>,
        parent_id: Option<&str>,
    ) -> ServiceResult<Group> {
        let mut groups = self.list().await?;
        let mut taken: HashSet<String> = tree::all_ids(&groups).into_iter().collect();
        let rekeyed = tree::rekey_colliding(&mut taken, &mut projects);
        if rekeyed > 0 {
            debug!(rekeyed, "re-keyed incoming projects with taken IDs");
        }

        let parent = parent_id.and_then(|id| tree::find_in_tree_mut(&mut groups, id));
        let group = match parent {
            Some(parent) => {
                let group = Group::new(name, projects, Some(parent.id.clone()));
                parent.children.push(group.clone());
                group
            }
            None => {
                if let Some(id) = parent_id {
                    debug!(parent_id = id, "parent group not found, adding at root");
                }
                let group = Group::new(name, projects, None);
                groups.push(group.clone());
                group
            }
        };

        let saved = self.save(&groups).await?;
        info!(group_id = %group.id, "added group");
        Ok(tree::find_in_tree(&saved, &group.id).cloned().unwrap_or(group))
    }

    /// Add `project` to the group `group_id`.
    ///
    /// Falls back to the first group in flattened order, or to a new
    /// unnamed group if there are none.
    pub async fn add_project(
        &mut self,
        mut project: Project,
        group_id: Option<&str>,
    ) -> ServiceResult<Vec<Group>> {
        let mut groups = self.list().await?;
        let mut taken: HashSet<String> = tree::all_ids(&groups).into_iter().collect();
        if tree::rekey_colliding(&mut taken, std::slice::from_mut(&mut project)) > 0 {
            debug!(new_id = %project.id, "incoming project ID was taken, re-keyed");
        }
        let color = project.color.clone();
        let project_id = project.id.clone();

        let resolved = group_id.filter(|id| tree::find_in_tree(&groups, id).is_some());
        if resolved.is_none() && groups.is_empty() {
            groups.push(Group::unnamed());
        }
        let target = match resolved {
            Some(id) => tree::find_in_tree_mut(&mut groups, id),
            None => groups.first_mut(),
        };
        if let Some(target) = target {
            debug!(group_id = %target.id, project_id = %project_id, "adding project");
            if self.config.add_new_project_to_front {
                target.projects.insert(0, project);
            } else {
                target.projects.push(project);
            }
        }

        RECENT_COLOR.run(self.colors.add_recent_color(&color)).await;

        let saved = self.save(&groups).await?;
        info!(project_id = %project_id, "added project");
        Ok(saved)
    }

    /// Merge `patch` into the project `id`; the ID itself never changes.
    ///
    /// An empty `id` is a no-op. Returns `true` if the project was found.
    pub async fn update_project(&mut self, id: &str, patch: &ProjectPatch) -> ServiceResult<bool> {
        if id.is_empty() {
            return Ok(false);
        }
        let mut groups = self.list().await?;
        let found = match tree::find_project_mut(&mut groups, id) {
            Some(project) => {
                patch.apply_to(project);
                true
            }
            None => false,
        };

        if let Some(color) = &patch.color {
            RECENT_COLOR.run(self.colors.add_recent_color(color)).await;
        }

        self.save(&groups).await?;
        debug!(project_id = id, found, "updated project");
        Ok(found)
    }

    /// Merge `patch` into the group `id`; the ID itself never changes.
    ///
    /// An empty `id` is a no-op. Returns `true` if the group was found.
    pub async fn update_group(&mut self, id: &str, patch: &GroupPatch) -> ServiceResult<bool> {
        if id.is_empty() {
            return Ok(false);
        }
        let mut groups = self.list().await?;
        let found = match tree::find_in_tree_mut(&mut groups, id) {
            Some(group) => {
                patch.apply_to(group);
                true
            }
            None => false,
        };

        self.save(&groups).await?;
        debug!(group_id = id, found, "updated group");
        Ok(found)
    }

    /// Remove the first project `id` found in a root group's own list.
    ///
    /// Nested groups are not searched. The forest is written back even if
    /// nothing was removed.
    pub async fn remove_project(&mut self, id: &str) -> ServiceResult<Vec<Group>> {
        let mut groups = self.list().await?;
        let removed = tree::remove_root_project(&mut groups, id);
        debug!(project_id = id, removed = removed.is_some(), "remove project");
        self.save(&groups).await
    }

    /// Remove the group `id` at any depth; with `only_if_empty`, only when
    /// it owns no projects.
    pub async fn remove_group(&mut self, id: &str, only_if_empty: bool) -> ServiceResult<Vec<Group>> {
        let groups = self.list().await?;
        let before = groups.iter().map(Group::subtree_len).sum::<usize>();
        let groups = tree::remove_group(groups, id, only_if_empty);
        let after = groups.iter().map(Group::subtree_len).sum::<usize>();
        debug!(group_id = id, only_if_empty, removed = before - after, "remove group");
        self.save(&groups).await
    }

    /// Replace the forest's structure with a drag-and-drop snapshot.
    pub async fn apply_reorder(
        &mut self,
        hierarchy: &[GroupHierarchy],
    ) -> ServiceResult<ReorderOutcome> {
        let current = self.list().await?;
        let mut outcome = reorder::apply_reorder(current, hierarchy);
        if outcome.lost_entities() {
            warn!(
                dropped_groups = ?outcome.dropped_groups,
                dropped_projects = ?outcome.dropped_projects,
                "reorder snapshot omitted existing entries"
            );
        }
        if !outcome.skipped_ids.is_empty() {
            debug!(skipped = ?outcome.skipped_ids, "reorder snapshot referenced unknown ids");
        }
        outcome.forest = self.save(&outcome.forest).await?;
        info!(groups = outcome.forest.len(), "applied reorder");
        Ok(outcome)
    }

    /// Dispatch a message from the dashboard view.
    pub async fn handle_message(&mut self, msg: HostMessage) -> ServiceResult<ReorderOutcome> {
        match msg {
            HostMessage::ReorderedProjects { group_hierarchy } => {
                self.apply_reorder(&group_hierarchy).await
            }
        }
    }

    /// Sanitize and persist `groups` to the active backend.
    ///
    /// Every mutation ends here; nothing unsanitized is ever written.
    /// Returns the forest as written.
    pub async fn save(&mut self, groups: &[Group]) -> ServiceResult<Vec<Group>> {
        let sanitized = sanitize_groups(groups);
        self.store.write_active(&to_raw_forest(&sanitized)).await?;
        Ok(sanitized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::InMemoryRecentColors;
    use crate::error::ServiceError;
    use async_trait::async_trait;
    use pdash_store::{HierarchyBackend, InMemoryBackend};
    use pdash_types::decode_forest;
    use serde_json::json;

    struct FailingColors;

    #[async_trait]
    impl RecentColors for FailingColors {
        async fn add_recent_color(&self, _color: &str) -> ServiceResult<()> {
            Err(ServiceError::RecentColors("offline".into()))
        }
    }

    struct Fixture {
        service: HierarchyService,
        active: Arc<InMemoryBackend>,
        colors: Arc<InMemoryRecentColors>,
    }

    fn fixture_with(forest: Option<serde_json::Value>, config: ServiceConfig) -> Fixture {
        let active = Arc::new(match forest {
            Some(v) => InMemoryBackend::with_forest(decode_forest(v)),
            None => InMemoryBackend::new(),
        });
        let other = Arc::new(InMemoryBackend::new());
        let store = StoreAdapter::new(other, active.clone(), false);
        let colors = Arc::new(InMemoryRecentColors::new(5));
        let service = HierarchyService::new(store, colors.clone(), config);
        Fixture {
            service,
            active,
            colors,
        }
    }

    fn fixture(forest: serde_json::Value) -> Fixture {
        fixture_with(Some(forest), ServiceConfig::default())
    }

    fn sample() -> serde_json::Value {
        json!([
            {"id": "g1", "groupName": "Work", "projects": [
                {"id": "p1", "name": "Api", "path": "/api", "color": "red"}
            ], "children": [
                {"id": "g2", "groupName": "Nested", "projects": [
                    {"id": "p2", "name": "Web", "path": "/web"}
                ], "children": []}
            ]},
            {"id": "g3", "groupName": "Play", "projects": [], "children": []}
        ])
    }

    fn ids(groups: &[Group]) -> Vec<String> {
        tree::all_ids(groups)
    }

    #[tokio::test]
    async fn list_sanitizes_stored_data() {
        let f = fixture(json!([null, {"groupName": "x"}]));
        let groups = f.service.list().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert!(!groups[0].id.is_empty());
        let raw = f.service.list_unsanitized().await.unwrap();
        assert_eq!(raw.len(), 2);
    }

    #[tokio::test]
    async fn list_of_virgin_backend_is_empty() {
        let f = fixture_with(None, ServiceConfig::default());
        assert!(f.service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn flatten_and_lookups() {
        let f = fixture(sample());
        let flat: Vec<_> = f.service.flatten().await.unwrap().into_iter().map(|g| g.id).collect();
        assert_eq!(flat, ["g1", "g2", "g3"]);
        let projects: Vec<_> = f
            .service
            .projects_flat()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(projects, ["p1", "p2"]);
        assert_eq!(f.service.find_group("g2").await.unwrap().unwrap().id, "g2");
        assert!(f.service.find_group("zz").await.unwrap().is_none());
        assert_eq!(f.service.find_project("p2").await.unwrap().unwrap().name, "Web");
    }

    #[tokio::test]
    async fn find_project_and_group_not_found_is_pair_of_none() {
        let f = fixture(sample());
        let (p, g) = f.service.find_project_and_group("p2").await.unwrap();
        assert_eq!(p.unwrap().id, "p2");
        assert_eq!(g.unwrap().id, "g2");
        assert_eq!(f.service.find_project_and_group("nope").await.unwrap(), (None, None));
        assert_eq!(f.service.find_project_and_group("").await.unwrap(), (None, None));
    }

    #[tokio::test]
    async fn add_group_under_parent() {
        let mut f = fixture(sample());
        let g = f.service.add_group(Some("Child"), vec![], Some("g2")).await.unwrap();
        assert_eq!(g.parent_id.as_deref(), Some("g2"));
        let groups = f.service.list().await.unwrap();
        let parent = tree::find_in_tree(&groups, "g2").unwrap();
        assert_eq!(parent.children.last().unwrap().id, g.id);
    }

    #[tokio::test]
    async fn add_group_with_unknown_parent_goes_to_root() {
        let mut f = fixture(sample());
        let g = f.service.add_group(Some("Orphan"), vec![], Some("missing")).await.unwrap();
        let groups = f.service.list().await.unwrap();
        assert_eq!(groups.last().unwrap().id, g.id);
        assert!(g.parent_id.is_none());
    }

    #[tokio::test]
    async fn add_group_keeps_ids_unique() {
        let mut f = fixture(sample());
        f.service.add_group(Some("Work"), vec![Project::new("a", "/a")], None).await.unwrap();
        f.service.add_group(Some("Work"), vec![], Some("g1")).await.unwrap();
        let all = ids(&f.service.list().await.unwrap());
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[tokio::test]
    async fn add_project_with_taken_id_keeps_stored_project() {
        let mut f = fixture(sample());
        let mut p = Project::new("New", "/new");
        p.id = "p2".into();
        let groups = f.service.add_project(p, Some("g1")).await.unwrap();

        let g2 = tree::find_in_tree(&groups, "g2").unwrap();
        assert_eq!(g2.projects[0].id, "p2");
        assert_eq!(g2.projects[0].name, "Web");
        let (found, group) = f.service.find_project_and_group("p2").await.unwrap();
        assert_eq!(found.unwrap().name, "Web");
        assert_eq!(group.unwrap().id, "g2");

        let g1 = tree::find_in_tree(&groups, "g1").unwrap();
        let added = g1.projects.iter().find(|p| p.name == "New").unwrap();
        assert_ne!(added.id, "p2");
        let all = ids(&groups);
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[tokio::test]
    async fn add_group_with_taken_project_id_keeps_stored_project() {
        let mut f = fixture(sample());
        let mut p = Project::new("Dup", "/dup");
        p.id = "p1".into();
        let g = f.service.add_group(Some("Fresh"), vec![p], None).await.unwrap();
        assert_ne!(g.projects[0].id, "p1");
        let groups = f.service.list().await.unwrap();
        assert_eq!(tree::find_in_tree(&groups, "g1").unwrap().projects[0].id, "p1");
    }

    #[tokio::test]
    async fn add_project_to_named_nested_group() {
        let mut f = fixture(sample());
        let p = Project::new("New", "/new").with_color("green");
        let groups = f.service.add_project(p.clone(), Some("g2")).await.unwrap();
        let g2 = tree::find_in_tree(&groups, "g2").unwrap();
        assert_eq!(g2.projects.last().unwrap().id, p.id);
        assert_eq!(f.colors.colors(), vec!["green"]);
    }

    #[tokio::test]
    async fn add_project_front_insertion() {
        let config = ServiceConfig {
            add_new_project_to_front: true,
            ..Default::default()
        };
        let mut f = fixture_with(Some(sample()), config);
        let p = Project::new("New", "/new");
        let groups = f.service.add_project(p.clone(), Some("g1")).await.unwrap();
        assert_eq!(groups[0].projects[0].id, p.id);
        assert_eq!(groups[0].projects[1].id, "p1");
    }

    #[tokio::test]
    async fn add_project_unknown_group_falls_back_to_first() {
        let mut f = fixture(sample());
        let p = Project::new("New", "/new");
        let groups = f.service.add_project(p.clone(), Some("nonexistent-id")).await.unwrap();
        assert_eq!(groups[0].id, "g1");
        assert!(groups[0].projects.iter().any(|x| x.id == p.id));
        assert_eq!(groups.len(), 2);
    }

    #[tokio::test]
    async fn add_project_without_groups_creates_exactly_one() {
        let mut f = fixture_with(None, ServiceConfig::default());
        let p = Project::new("New", "/new");
        let groups = f.service.add_project(p.clone(), Some("nonexistent-id")).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].group_name.is_none());
        assert_eq!(groups[0].projects, vec![p]);
    }

    #[tokio::test]
    async fn add_project_survives_color_failure() {
        let active = Arc::new(InMemoryBackend::new());
        let store = StoreAdapter::new(Arc::new(InMemoryBackend::new()), active.clone(), false);
        let mut service =
            HierarchyService::new(store, Arc::new(FailingColors), ServiceConfig::default());
        let p = Project::new("New", "/new").with_color("red");
        let groups = service.add_project(p, None).await.unwrap();
        assert_eq!(groups[0].projects.len(), 1);
        assert_eq!(active.write_count(), 1);
    }

    #[tokio::test]
    async fn update_project_never_changes_id() {
        let mut f = fixture(sample());
        let patch = ProjectPatch {
            id: Some("hacked".into()),
            name: Some("New".into()),
            ..Default::default()
        };
        assert!(f.service.update_project("p1", &patch).await.unwrap());
        let p = f.service.find_project("p1").await.unwrap().unwrap();
        assert_eq!(p.id, "p1");
        assert_eq!(p.name, "New");
        assert_eq!(p.color, "red");
        assert!(f.service.find_project("hacked").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_project_reaches_nested_and_records_color() {
        let mut f = fixture(sample());
        let patch = ProjectPatch {
            color: Some("purple".into()),
            ..Default::default()
        };
        assert!(f.service.update_project("p2", &patch).await.unwrap());
        assert_eq!(f.service.find_project("p2").await.unwrap().unwrap().color, "purple");
        assert_eq!(f.colors.colors(), vec!["purple"]);
    }

    #[tokio::test]
    async fn update_project_with_empty_id_does_not_write() {
        let mut f = fixture(sample());
        assert!(!f.service.update_project("", &ProjectPatch::default()).await.unwrap());
        assert_eq!(f.active.write_count(), 0);
    }

    #[tokio::test]
    async fn update_unknown_project_changes_nothing() {
        let mut f = fixture(sample());
        let before = f.service.list().await.unwrap();
        let patch = ProjectPatch {
            name: Some("x".into()),
            ..Default::default()
        };
        assert!(!f.service.update_project("ghost", &patch).await.unwrap());
        assert_eq!(f.service.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn update_group_merges_fields() {
        let mut f = fixture(sample());
        let patch = GroupPatch {
            id: Some("other".into()),
            group_name: Some("Renamed".into()),
            collapsed: Some(true),
            ..Default::default()
        };
        assert!(f.service.update_group("g2", &patch).await.unwrap());
        let g = f.service.find_group("g2").await.unwrap().unwrap();
        assert_eq!(g.group_name.as_deref(), Some("Renamed"));
        assert!(g.collapsed);
        assert_eq!(g.projects.len(), 1);
        assert!(!f.service.update_group("missing", &patch).await.unwrap());
    }

    #[tokio::test]
    async fn remove_project_searches_root_groups_only() {
        let mut f = fixture(sample());
        let groups = f.service.remove_project("p2").await.unwrap();
        assert!(tree::find_project_and_group(&groups, "p2").is_some());
        assert_eq!(f.active.write_count(), 1);

        let groups = f.service.remove_project("p1").await.unwrap();
        assert!(groups[0].projects.is_empty());
        assert_eq!(f.active.write_count(), 2);
    }

    #[tokio::test]
    async fn remove_group_only_if_empty() {
        let mut f = fixture(json!([
            {"id": "g1", "groupName": "Work", "projects": [{"id": "p1"}], "children": []}
        ]));
        let groups = f.service.remove_group("g1", true).await.unwrap();
        assert_eq!(groups.len(), 1);

        let mut f = fixture(json!([
            {"id": "g1", "groupName": "Work", "projects": [], "children": []}
        ]));
        let groups = f.service.remove_group("g1", true).await.unwrap();
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn remove_nested_group() {
        let mut f = fixture(sample());
        let groups = f.service.remove_group("g2", false).await.unwrap();
        assert!(groups[0].children.is_empty());
        assert_eq!(groups.len(), 2);
    }

    #[tokio::test]
    async fn save_then_list_roundtrips_sanitized_input() {
        let mut f = fixture_with(None, ServiceConfig::default());
        let mut g = Group::new(Some("Work"), vec![Project::new("a", "/a")], None);
        g.children.push(Group::new(Some("Sub"), vec![], Some(g.id.clone())));
        let input = vec![g];
        let saved = f.service.save(&input).await.unwrap();
        assert_eq!(saved, sanitize_groups(&input));
        assert_eq!(f.service.list().await.unwrap(), saved);
    }

    #[tokio::test]
    async fn reorder_message_rewrites_order_exactly() {
        let mut f = fixture(json!([
            {"id": "g1", "projects": [
                {"id": "p1", "name": "A", "path": "/a"},
                {"id": "p2", "name": "B", "path": "/b"},
                {"id": "p3", "name": "C", "path": "/c"}
            ]}
        ]));
        let before = f.service.projects_flat().await.unwrap();
        let msg = HostMessage::ReorderedProjects {
            group_hierarchy: vec![GroupHierarchy::new(
                "g1",
                vec!["p3".into(), "p1".into(), "p2".into()],
                0,
            )],
        };
        let outcome = f.service.handle_message(msg).await.unwrap();
        assert!(!outcome.lost_entities());

        let after = f.service.projects_flat().await.unwrap();
        let order: Vec<_> = after.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, ["p3", "p1", "p2"]);
        for p in &after {
            assert!(before.contains(p));
        }
    }

    #[tokio::test]
    async fn reorder_materializes_staging_group() {
        let mut f = fixture(sample());
        let outcome = f
            .service
            .apply_reorder(&[
                GroupHierarchy::new("g1", vec![], 0)
                    .with_child(GroupHierarchy::new("g2", vec!["p2".into()], 1)),
                GroupHierarchy::new("g3", vec![], 0),
                GroupHierarchy::new("temp-42", vec!["p1".into()], 0),
            ])
            .await
            .unwrap();
        assert_eq!(outcome.created_groups, ["temp-42"]);
        let groups = f.service.list().await.unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[2].id, "temp-42");
        assert_eq!(groups[2].projects[0].id, "p1");
    }

    #[tokio::test]
    async fn storage_failure_propagates() {
        let mut f = fixture(sample());
        f.active.set_fail_writes(true);
        let err = f.service.remove_group("g3", false).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
    }

    #[tokio::test]
    async fn startup_migrates_and_reports() {
        let settings = Arc::new(InMemoryBackend::new());
        let global = Arc::new(InMemoryBackend::with_forest(decode_forest(sample())));
        let store = StoreAdapter::new(settings.clone(), global, true);
        let service = HierarchyService::new(
            store,
            Arc::new(InMemoryRecentColors::new(3)),
            ServiceConfig::default(),
        );
        let report = service.startup().await.unwrap();
        assert!(report.migrated);
        assert!(report.other_backend_has_data);
        assert_eq!(settings.read().await.unwrap().unwrap().len(), 2);
        assert_eq!(service.list().await.unwrap().len(), 2);
    }
}
