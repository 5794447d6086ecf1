use serde_json::Value;
use tracing::debug;

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{HostMessage, MAX_HIERARCHY_DEPTH, MAX_MESSAGE_SIZE};

/// JSON codec for [`HostMessage`].
pub struct JsonCodec;

impl JsonCodec {
    /// Encode an outgoing message, applying the same limits as `decode`.
    pub fn encode(msg: &HostMessage) -> ProtocolResult<Vec<u8>> {
        check_depth(msg.depth())?;
        let bytes =
            serde_json::to_vec(msg).map_err(|e| ProtocolError::Serialization(e.to_string()))?;
        if bytes.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: bytes.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        Ok(bytes)
    }

    /// Decode untrusted bytes from the view.
    pub fn decode(data: &[u8]) -> ProtocolResult<HostMessage> {
        if data.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: data.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        let value: Value = serde_json::from_slice(data)
            .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;
        Self::decode_value(value)
    }

    /// Decode an already-parsed JSON value.
    pub fn decode_value(value: Value) -> ProtocolResult<HostMessage> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingType)?;
        if !HostMessage::TYPES.contains(&kind) {
            return Err(ProtocolError::UnknownMessageType(kind.to_string()));
        }

        let msg: HostMessage = serde_json::from_value(value)
            .map_err(|e| ProtocolError::Deserialization(e.to_string()))?;
        let depth = msg.depth();
        check_depth(depth)?;
        debug!(message = msg.type_name(), depth, "decoded host message");
        Ok(msg)
    }
}

fn check_depth(depth: usize) -> ProtocolResult<()> {
    if depth > MAX_HIERARCHY_DEPTH {
        return Err(ProtocolError::HierarchyTooDeep {
            depth,
            max: MAX_HIERARCHY_DEPTH,
        });
    }
    Ok(())
}
