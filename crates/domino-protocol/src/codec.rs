//! Envelope serialization.
//!
//! Server and client are generic over [`Codec`], so a binary format can
//! replace [`JsonCodec`] without touching the session code.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Turns wire types into bytes and back.
///
/// One instance is shared by every connection task for the lifetime of
/// the server.
pub trait Codec: Send + Sync + 'static {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Fails with [`ProtocolError::Decode`] on malformed bytes or an
    /// unknown discriminant.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// JSON codec; frames can be read straight off a WebSocket inspector.
///
/// ```rust
/// use domino_protocol::{ClientCommand, Codec, Envelope, JsonCodec, Payload, PlayerId};
///
/// let envelope = Envelope {
///     seq: 1,
///     timestamp: 5000,
///     payload: Payload::Command(ClientCommand::Move {
///         player_id: PlayerId(2),
///         card_index: 3,
///     }),
/// };
///
/// let bytes = JsonCodec.encode(&envelope).unwrap();
/// let decoded: Envelope = JsonCodec.decode(&bytes).unwrap();
/// assert_eq!(envelope, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
