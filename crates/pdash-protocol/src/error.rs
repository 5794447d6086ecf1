use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error("message has no type")]
    MissingType,

    #[error("unknown message type: {0}")]
    UnknownMessageType(String),

    #[error("hierarchy too deep: {depth} levels (max {max})")]
    HierarchyTooDeep { depth: usize, max: usize },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
