//! A drag engine over registered containers.
//!
//! While a drag is in progress the item is moved live between containers
//! (the "shadow"). Dropping keeps the current position; cancelling with
//! `revert` puts the item back where the drag began.

use tracing::debug;

use crate::dom::{Document, ElementId};
use crate::error::{DndError, DndResult};

/// Which elements a drag may start from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovesRule {
    /// Any item without this attribute may be dragged.
    ExcludeAttribute(&'static str),
    /// Only a grab on a handle carrying this attribute starts a drag.
    HandleAttribute(&'static str),
}

/// Events emitted by a [`DragEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEvent {
    Drag {
        item: ElementId,
        source: ElementId,
    },
    Drop {
        item: ElementId,
        target: ElementId,
        source: ElementId,
    },
    Cancel {
        item: ElementId,
        container: ElementId,
    },
    DragEnd {
        item: ElementId,
    },
}

#[derive(Clone, Copy, Debug)]
struct DragState {
    item: ElementId,
    source: ElementId,
    original_index: usize,
}

#[derive(Clone, Debug)]
pub struct DragEngine {
    name: &'static str,
    containers: Vec<ElementId>,
    rule: MovesRule,
    drag: Option<DragState>,
}

impl DragEngine {
    pub fn new(name: &'static str, containers: Vec<ElementId>, rule: MovesRule) -> Self {
        Self {
            name,
            containers,
            rule,
            drag: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn containers(&self) -> &[ElementId] {
        &self.containers
    }

    pub fn is_container(&self, id: ElementId) -> bool {
        self.containers.contains(&id)
    }

    /// Register `id` unless it already is. Returns `true` if added.
    pub fn add_container(&mut self, id: ElementId) -> bool {
        if self.is_container(id) {
            return false;
        }
        self.containers.push(id);
        true
    }

    /// Keep only containers for which `keep` holds. Returns how many went.
    pub fn retain_containers(&mut self, keep: impl FnMut(&ElementId) -> bool) -> usize {
        let before = self.containers.len();
        self.containers.retain(keep);
        before - self.containers.len()
    }

    pub fn clear_containers(&mut self) {
        self.containers.clear();
    }

    pub fn dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The item being dragged, if any.
    pub fn item(&self) -> Option<ElementId> {
        self.drag.map(|d| d.item)
    }

    /// Whether grabbing `item` by `handle` may start a drag.
    pub fn moves(&self, doc: &Document, item: ElementId, handle: ElementId) -> bool {
        let Some(source) = doc.parent(item) else {
            return false;
        };
        if !self.is_container(source) || !doc.is_inclusive_ancestor(item, handle) {
            return false;
        }
        match self.rule {
            MovesRule::ExcludeAttribute(attr) => !doc.has_attribute(item, attr),
            MovesRule::HandleAttribute(attr) => doc.has_attribute(handle, attr),
        }
    }

    /// Begin dragging `item`, grabbed by `handle`.
    pub fn start_drag(
        &mut self,
        doc: &Document,
        item: ElementId,
        handle: ElementId,
    ) -> DndResult<DragEvent> {
        if self.dragging() || !self.moves(doc, item, handle) {
            return Err(DndError::DragRejected(item));
        }
        let source = doc.parent(item).ok_or(DndError::DragRejected(item))?;
        let original_index = doc.index_in_parent(item).unwrap_or(0);
        self.drag = Some(DragState {
            item,
            source,
            original_index,
        });
        debug!(engine = self.name, %item, %source, "drag started");
        Ok(DragEvent::Drag { item, source })
    }

    /// Move the dragged item's shadow to `index` within `container`.
    pub fn drag_over(&mut self, doc: &mut Document, container: ElementId, index: usize) -> DndResult<()> {
        let state = self.drag.ok_or(DndError::NoDragInProgress)?;
        if !self.is_container(container) || !doc.contains(container) {
            return Err(DndError::NotAContainer(container));
        }
        doc.insert_child(container, index, state.item)
    }

    /// Release the item at `index` within `container`.
    ///
    /// Releasing it exactly where it started is a cancel, not a drop.
    pub fn drop_into(
        &mut self,
        doc: &mut Document,
        container: ElementId,
        index: usize,
    ) -> DndResult<Vec<DragEvent>> {
        self.drag_over(doc, container, index)?;
        let state = self.drag.take().ok_or(DndError::NoDragInProgress)?;
        Ok(self.finish(doc, state))
    }

    /// Abandon the current drag. With `revert`, the item goes back to its
    /// original position; without, it stays where the shadow was.
    pub fn cancel(&mut self, doc: &mut Document, revert: bool) -> DndResult<Vec<DragEvent>> {
        let Some(state) = self.drag.take() else {
            return Ok(Vec::new());
        };
        if revert {
            doc.insert_child(state.source, state.original_index, state.item)?;
        }
        debug!(engine = self.name, item = %state.item, revert, "drag cancelled");
        Ok(self.finish(doc, state))
    }

    fn finish(&self, doc: &Document, state: DragState) -> Vec<DragEvent> {
        let item = state.item;
        let target = doc.parent(item).unwrap_or(state.source);
        let unmoved =
            target == state.source && doc.index_in_parent(item) == Some(state.original_index);
        let first = if unmoved {
            DragEvent::Cancel {
                item,
                container: target,
            }
        } else {
            DragEvent::Drop {
                item,
                target,
                source: state.source,
            }
        };
        vec![first, DragEvent::DragEnd { item }]
    }
}
