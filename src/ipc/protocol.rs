//! Wire codec for operation frames.
//!
//! One mailbox frame carries exactly one bincode-encoded operation record.
//! Decoding failures are surfaced to the listener, which logs and drops the
//! frame; convergence never depends on any single delivery.

use thiserror::Error;

use crate::sync::Operation;

/// Codec errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("failed to encode operation frame: {0}")]
    Encode(String),
    #[error("failed to decode operation frame: {0}")]
    Decode(String),
}

/// Serializes an operation to its wire frame.
pub fn encode_op(op: &Operation) -> Result<Vec<u8>, ProtocolError> {
    bincode::serde::encode_to_vec(op, bincode::config::standard())
        .map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Deserializes an operation from a wire frame.
pub fn decode_op(bytes: &[u8]) -> Result<Operation, ProtocolError> {
    let (op, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())
        .map_err(|e| ProtocolError::Decode(e.to_string()))?;
    Ok(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::OpKind;

    #[test]
    fn test_roundtrip() {
        let op = Operation {
            kind: OpKind::Replace,
            line: 3,
            col_start: 6,
            col_end: 10,
            old_text: "World".to_string(),
            new_text: "Mars".to_string(),
            author: "alice".to_string(),
            timestamp_ms: 1_700_000_000_000,
            sequence: 42,
        };

        let frame = encode_op(&op).unwrap();
        let decoded = decode_op(&frame).unwrap();
        assert_eq!(decoded, op);
        assert_eq!(decoded.fingerprint(), op.fingerprint());
    }

    #[test]
    fn test_garbage_frame_is_an_error() {
        assert!(matches!(
            decode_op(&[0xff, 0xff, 0xff, 0xff]),
            Err(ProtocolError::Decode(_))
        ));
    }
}
