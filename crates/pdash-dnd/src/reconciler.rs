//! Keeps the drag engines in sync with the element tree and reports every
//! drop to the host as a full hierarchy snapshot.

use std::time::{Duration, Instant};

use pdash_protocol::{HostMessage, JsonCodec};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::autoscroll::{AutoScroll, Pointer, ScrollDelta, Viewport};
use crate::dom::{Document, ElementId, MutationRecord};
use crate::drake::{DragEngine, DragEvent, MovesRule};
use crate::error::{DndError, DndResult};
use crate::extract::{
    collect_hierarchy, GROUPS_CONTAINER_CLASS, GROUP_CLASS, PROJECTS_CONTAINER_CLASS,
};

/// Delay before the one-shot container refresh that follows `start`.
pub const INIT_REFRESH_DELAY: Duration = Duration::from_millis(100);

pub const PRELOAD_CLASS: &str = "preload";
pub const PROJECT_DRAGGING_CLASS: &str = "project-dragging";
pub const NO_DRAG_ATTR: &str = "data-nodrag";
pub const DRAG_HANDLE_ATTR: &str = "data-drag-group";

/// Where snapshots go. Delivery is fire-and-forget.
pub trait MessageSink {
    fn send(&mut self, msg: HostMessage) -> DndResult<()>;
}

impl MessageSink for Vec<HostMessage> {
    fn send(&mut self, msg: HostMessage) -> DndResult<()> {
        self.push(msg);
        Ok(())
    }
}

/// Never blocks, so the view side needs no runtime of its own.
impl MessageSink for UnboundedSender<HostMessage> {
    fn send(&mut self, msg: HostMessage) -> DndResult<()> {
        UnboundedSender::send(self, msg).map_err(|_| DndError::SinkClosed)
    }
}

/// The two draggable domains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domain {
    /// Project cards within and between `.group-list` containers.
    Projects,
    /// Whole groups within `.groups-wrapper`, grabbed by their handle.
    Groups,
}

pub struct Reconciler<S> {
    doc: Document,
    sink: S,
    projects: DragEngine,
    groups: DragEngine,
    autoscroll: AutoScroll,
    started: bool,
    refresh_at: Option<Instant>,
}

impl<S: MessageSink> Reconciler<S> {
    pub fn new(doc: Document, sink: S) -> Self {
        Self {
            doc,
            sink,
            projects: DragEngine::new(
                "projects",
                Vec::new(),
                MovesRule::ExcludeAttribute(NO_DRAG_ATTR),
            ),
            groups: DragEngine::new(
                "groups",
                Vec::new(),
                MovesRule::HandleAttribute(DRAG_HANDLE_ATTR),
            ),
            autoscroll: AutoScroll::default(),
            started: false,
            refresh_at: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access for rendering. Changes are seen on the next
    /// [`pump_mutations`](Self::pump_mutations).
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn engine(&self, domain: Domain) -> &DragEngine {
        match domain {
            Domain::Projects => &self.projects,
            Domain::Groups => &self.groups,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Register the current containers, start observing and schedule the
    /// deferred refresh at `now + INIT_REFRESH_DELAY`.
    pub fn start(&mut self, now: Instant) -> DndResult<()> {
        if self.started {
            return Err(DndError::AlreadyStarted);
        }
        let body = self.doc.body();
        self.doc.remove_class(body, PRELOAD_CLASS)?;

        for list in self.doc.query_class(PROJECTS_CONTAINER_CLASS) {
            self.projects.add_container(list);
        }
        for wrapper in self.doc.query_class(GROUPS_CONTAINER_CLASS) {
            self.groups.add_container(wrapper);
        }
        self.doc.take_mutations();
        self.refresh_at = Some(now + INIT_REFRESH_DELAY);
        self.started = true;
        info!(
            project_containers = self.projects.containers().len(),
            group_containers = self.groups.containers().len(),
            "drag-and-drop started"
        );
        Ok(())
    }

    /// Stop observing, revert any drag in progress and forget containers.
    pub fn stop(&mut self) -> DndResult<()> {
        if !self.started {
            return Ok(());
        }
        self.cancel_all()?;
        self.projects.clear_containers();
        self.groups.clear_containers();
        self.refresh_at = None;
        self.started = false;
        debug!("drag-and-drop stopped");
        Ok(())
    }

    /// Bring the project containers in line with the document: register new
    /// `.group-list` elements and drop detached ones. Safe to call
    /// redundantly. Returns `(added, removed)`.
    pub fn update_containers(&mut self) -> (usize, usize) {
        let mut added = 0;
        for list in self.doc.query_class(PROJECTS_CONTAINER_CLASS) {
            if self.projects.add_container(list) {
                added += 1;
            }
        }
        let doc = &self.doc;
        let removed = self.projects.retain_containers(|&c| doc.contains(c));
        if added > 0 || removed > 0 {
            debug!(added, removed, "project containers updated");
        }
        (added, removed)
    }

    /// React to a batch of mutations. Containers are refreshed once per
    /// batch, and only if an added or removed element is or holds a group.
    pub fn handle_mutations(&mut self, batch: &[MutationRecord]) -> bool {
        if !self.started {
            return false;
        }
        let relevant = batch
            .iter()
            .flat_map(|m| m.added.iter().chain(m.removed.iter()))
            .any(|&el| {
                self.doc.has_class(el, GROUP_CLASS)
                    || self.doc.has_descendant_with_class(el, GROUP_CLASS)
            });
        if relevant {
            self.update_containers();
        }
        relevant
    }

    /// Drain the document's queued mutations and handle them as one batch.
    pub fn pump_mutations(&mut self) -> bool {
        let batch = self.doc.take_mutations();
        if batch.is_empty() {
            return false;
        }
        self.handle_mutations(&batch)
    }

    /// Run the deferred refresh once it is due. Returns `true` if it ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.refresh_at {
            Some(at) if now >= at => {
                self.refresh_at = None;
                self.update_containers();
                true
            }
            _ => false,
        }
    }

    /// Global key handler. Escape reverts any drag on both engines.
    pub fn handle_key(&mut self, key: &str) -> DndResult<bool> {
        if key != "Escape" {
            return Ok(false);
        }
        self.cancel_all()
    }

    fn cancel_all(&mut self) -> DndResult<bool> {
        let mut events = self.projects.cancel(&mut self.doc, true)?;
        let cancelled_project = !events.is_empty();
        self.after_events(Domain::Projects, &events)?;
        events = self.groups.cancel(&mut self.doc, true)?;
        let cancelled_group = !events.is_empty();
        self.after_events(Domain::Groups, &events)?;
        Ok(cancelled_project || cancelled_group)
    }

    pub fn start_drag(&mut self, domain: Domain, item: ElementId, handle: ElementId) -> DndResult<()> {
        let (engine, doc) = self.split(domain);
        let event = engine.start_drag(doc, item, handle)?;
        self.after_events(domain, &[event])?;
        Ok(())
    }

    pub fn drag_over(&mut self, domain: Domain, container: ElementId, index: usize) -> DndResult<()> {
        let (engine, doc) = self.split(domain);
        engine.drag_over(doc, container, index)
    }

    /// Release the dragged item. Returns the snapshot sent to the host, if
    /// the drop moved anything.
    pub fn drop_into(
        &mut self,
        domain: Domain,
        container: ElementId,
        index: usize,
    ) -> DndResult<Option<HostMessage>> {
        let (engine, doc) = self.split(domain);
        let events = engine.drop_into(doc, container, index)?;
        self.after_events(domain, &events)
    }

    fn split(&mut self, domain: Domain) -> (&mut DragEngine, &mut Document) {
        match domain {
            Domain::Projects => (&mut self.projects, &mut self.doc),
            Domain::Groups => (&mut self.groups, &mut self.doc),
        }
    }

    fn after_events(&mut self, domain: Domain, events: &[DragEvent]) -> DndResult<Option<HostMessage>> {
        let body = self.doc.body();
        let mut sent = None;
        for event in events {
            match event {
                DragEvent::Drag { .. } if domain == Domain::Projects => {
                    self.doc.add_class(body, PROJECT_DRAGGING_CLASS)?;
                }
                DragEvent::DragEnd { .. } if domain == Domain::Projects => {
                    self.doc.remove_class(body, PROJECT_DRAGGING_CLASS)?;
                }
                DragEvent::Drop { .. } => sent = Some(self.on_reordered()?),
                _ => {}
            }
        }
        Ok(sent)
    }

    /// Snapshot the hierarchy and send it to the host.
    ///
    /// A snapshot that fails the codec's limits is an error and is not
    /// sent. A failed send is logged and dropped; the view does not wait on
    /// the host.
    pub fn on_reordered(&mut self) -> DndResult<HostMessage> {
        let now_ms = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
        let group_hierarchy = collect_hierarchy(&mut self.doc, now_ms)?;
        let msg = HostMessage::ReorderedProjects { group_hierarchy };
        let size = JsonCodec::encode(&msg)?.len();
        debug!(size, "reorder snapshot encoded");
        if let Err(e) = self.sink.send(msg.clone()) {
            warn!(error = %e, "failed to send reorder snapshot");
        }
        Ok(msg)
    }

    /// Auto-scroll step for the current pointer.
    pub fn scroll_delta(&self, viewport: Viewport, pointer: Pointer) -> ScrollDelta {
        let dragging = self.projects.dragging() || self.groups.dragging();
        self.autoscroll.scroll_delta(viewport, pointer, dragging)
    }
}
