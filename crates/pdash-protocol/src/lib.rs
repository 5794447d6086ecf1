//! Dashboard view to host messages.
//!
//! The drag-and-drop layer reports every drop as a single
//! `reordered-projects` message carrying the full hierarchy snapshot. This
//! is the only path from the view into persistence, so the host decodes it
//! as untrusted input: size- and depth-limited, with unknown message types
//! rejected.

pub mod codec;
pub mod error;
pub mod message;

pub use codec::JsonCodec;
pub use error::{ProtocolError, ProtocolResult};
pub use message::{HostMessage, MAX_HIERARCHY_DEPTH, MAX_MESSAGE_SIZE};
