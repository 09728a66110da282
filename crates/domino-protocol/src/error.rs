//! Error types for the protocol layer.
//!
//! When you see a `ProtocolError`, the problem is in turning messages into
//! bytes or back, not in networking or game rules.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields, or an
    /// unknown `cmd`/`type` discriminant.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message decoded fine but is not valid at this point of the
    /// conversation, e.g. a move sent before joining.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
