/// Errors from hierarchy backend operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The stored document could not be parsed or produced.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document exists but is not a JSON object.
    #[error("corrupt store document {path}: {reason}")]
    CorruptDocument { path: String, reason: String },

    /// The backend rejected the operation.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
