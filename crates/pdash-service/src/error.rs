//! Error types for the hierarchy service.

use thiserror::Error;

/// Errors produced by service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The active or inactive backend failed.
    #[error("store error: {0}")]
    Store(#[from] pdash_store::StoreError),

    /// The config file parsed but holds values the service cannot use.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reading the config file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The recent-colors collaborator rejected an update.
    #[error("recent colors unavailable: {0}")]
    RecentColors(String),
}

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
