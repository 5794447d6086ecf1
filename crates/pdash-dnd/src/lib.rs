//! Drag-and-drop reconciliation for the dashboard view.
//!
//! Two drag engines run side by side: one for project cards inside
//! `.group-list` containers, one for whole groups inside `.groups-wrapper`.
//! The [`Reconciler`] keeps the project containers in step with the element
//! tree as groups come and go, and after every drop snapshots the full
//! [`GroupHierarchy`](pdash_types::GroupHierarchy) and sends it to the host.
//! That snapshot is the only path from the view into persistence.
//!
//! # Modules
//!
//! - [`dom`] -- Arena element tree with mutation records
//! - [`drake`] -- Container-based drag engine with revertible cancel
//! - [`autoscroll`] -- Edge scrolling while dragging
//! - [`extract`] -- Element tree to `GroupHierarchy` snapshot
//! - [`reconciler`] -- Lifecycle, container upkeep and host messaging

pub mod autoscroll;
pub mod dom;
pub mod drake;
pub mod error;
pub mod extract;
pub mod reconciler;

pub use autoscroll::{AutoScroll, Pointer, ScrollDelta, Viewport};
pub use dom::{Document, ElementId, MutationRecord};
pub use drake::{DragEngine, DragEvent, MovesRule};
pub use error::{DndError, DndResult};
pub use extract::{build_group_hierarchy, collect_hierarchy};
pub use reconciler::{Domain, MessageSink, Reconciler, INIT_REFRESH_DELAY};
