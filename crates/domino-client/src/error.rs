use domino_protocol::{ProtocolError, WireTile};
use domino_transport::TransportError;

/// Errors a client can run into.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The server refused the join.
    #[error("join rejected ({code}): {message}")]
    Rejected { code: u16, message: String },

    /// Player names must contain something other than whitespace.
    #[error("player name must not be empty")]
    EmptyName,

    /// A command that needs a player id was sent before joining.
    #[error("not joined")]
    NotJoined,

    /// The server reported a tile that fits neither end of the local chain.
    #[error("mirror out of sync: {0} fits neither end")]
    OutOfSync(WireTile),
}
