use thiserror::Error;

use crate::dom::ElementId;

/// Errors from element tree edits and drag handling.
#[derive(Debug, Error)]
pub enum DndError {
    /// The handle does not name an element of this document.
    #[error("unknown element: {0}")]
    UnknownElement(ElementId),

    /// An insert would make an element its own ancestor.
    #[error("cannot move {child} under its own descendant {parent}")]
    HierarchyCycle { parent: ElementId, child: ElementId },

    /// The drop target is not a registered, attached container.
    #[error("element {0} is not a registered container")]
    NotAContainer(ElementId),

    /// The item may not be dragged with that handle.
    #[error("drag of {0} rejected")]
    DragRejected(ElementId),

    #[error("no drag in progress")]
    NoDragInProgress,

    #[error("reconciler already started")]
    AlreadyStarted,

    /// The host end of the message channel is gone.
    #[error("message sink closed")]
    SinkClosed,

    /// An outgoing snapshot failed the wire checks.
    #[error("protocol error: {0}")]
    Protocol(#[from] pdash_protocol::ProtocolError),
}

pub type DndResult<T> = Result<T, DndError>;
