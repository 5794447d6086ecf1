//! The pdash hierarchy service.
//!
//! Owns every mutation of the group/project forest. Each mutating call
//! re-reads the active backend, edits the typed tree, sanitizes it, and
//! writes the whole forest back. There is no diffing and no partial
//! persistence.
//!
//! # Modules
//!
//! - [`sanitize`] -- Raw-to-typed decode that repairs IDs and missing lists
//! - [`tree`] -- Pure lookups and edits over a forest
//! - [`reorder`] -- Rebuild a forest from a drag-and-drop hierarchy snapshot
//! - [`colors`] -- Recent-colors collaborator and the [`BestEffort`] policy
//! - [`config`] -- [`ServiceConfig`] loaded from TOML
//! - [`service`] -- [`HierarchyService`], the single write path

pub mod colors;
pub mod config;
pub mod error;
pub mod reorder;
pub mod sanitize;
pub mod service;
pub mod tree;

pub use colors::{BestEffort, InMemoryRecentColors, RecentColors};
pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use reorder::{apply_reorder, ReorderOutcome};
pub use sanitize::{sanitize_forest, sanitize_groups};
pub use service::{HierarchyService, StartupReport};
