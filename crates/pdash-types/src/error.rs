//! Error types for the shared model.

use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// A storage option name that matches neither backend.
    #[error("unknown storage option: {0}")]
    UnknownStorageOption(String),
}
