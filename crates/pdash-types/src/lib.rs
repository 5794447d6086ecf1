//! Foundation types for the pdash project hierarchy.
//!
//! This crate provides the entity model shared by every other pdash crate:
//! projects, groups, the raw persisted shapes they are decoded from, and the
//! hierarchy snapshot the drag-and-drop layer sends back to the host.
//!
//! # Key Types
//!
//! - [`Project`] -- A folder, workspace file, or remote URI shown on the dashboard
//! - [`Group`] -- An ordered container of projects and nested subgroups
//! - [`RawGroup`] / [`RawProject`] -- Untrusted persisted shapes (every field optional)
//! - [`GroupHierarchy`] -- ID-only tree snapshot produced after a reorder
//! - [`StorageOption`] -- The two interchangeable persistence backends
//! - [`generate_id`] -- Short opaque identifiers with an optional readable prefix

pub mod error;
pub mod group;
pub mod hierarchy;
pub mod id;
pub mod project;
pub mod raw;
pub mod storage;

pub use error::TypeError;
pub use group::{Group, GroupPatch};
pub use hierarchy::GroupHierarchy;
pub use id::{generate_id, temp_group_id, TEMP_GROUP_PREFIX};
pub use project::{
    classify_remote, sanitize_name, Project, ProjectPatch, ProjectPathType, RemoteType,
};
pub use raw::{decode_forest, to_raw_forest, RawForest, RawGroup, RawProject};
pub use storage::StorageOption;
