//! Persistence backends for the pdash project hierarchy.
//!
//! The whole forest lives under a single key in one of two interchangeable
//! stores. Which one is active is a user setting; the other may still hold
//! data from before the setting changed.
//!
//! # Contract
//!
//! Every backend implements [`HierarchyBackend`]:
//!
//! - `read()` returns `Ok(None)` only when the backend has never been
//!   written. An explicitly emptied backend returns `Ok(Some(vec![]))`.
//! - `write()` overwrites the whole forest. There is no partial update.
//! - Backend failures are returned as [`StoreError`] and never swallowed.
//!
//! # Backends
//!
//! - [`InMemoryBackend`] -- lock-protected slot for tests and embedding
//! - [`JsonFileBackend`] -- one key inside a JSON object file on disk
//!
//! [`StoreAdapter`] pairs the two backends, routes reads and writes to the
//! active one, and migrates data between them.

pub mod adapter;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use adapter::StoreAdapter;
pub use error::{StoreError, StoreResult};
pub use file::JsonFileBackend;
pub use memory::InMemoryBackend;
pub use traits::{has_data, HierarchyBackend};
