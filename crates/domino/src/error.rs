//! Unified error type for the domino server.

use domino_engine::EngineError;
use domino_protocol::ProtocolError;
use domino_session::SessionError;
use domino_transport::TransportError;

/// Top-level error that wraps every layer's error.
///
/// `#[from]` lets `?` lift sub-crate errors into this one.
#[derive(Debug, thiserror::Error)]
pub enum DominoError {
    /// Connection, send or receive failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Encode, decode or unexpected message.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A join or move refused by the rules.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Event bus or outbound queue failure.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The game actor has stopped.
    #[error("game is unavailable")]
    GameUnavailable,
}

#[cfg(test)]
mod tests {
    use domino_protocol::PlayerId;

    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err: DominoError = TransportError::ConnectionClosed("gone".into()).into();
        assert!(matches!(err, DominoError::Transport(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err: DominoError = ProtocolError::InvalidMessage("bad".into()).into();
        assert!(matches!(err, DominoError::Protocol(_)));
    }

    #[test]
    fn test_from_engine_error_keeps_message() {
        let err: DominoError = EngineError::RosterFull.into();
        assert!(matches!(err, DominoError::Engine(EngineError::RosterFull)));
        assert_eq!(err.to_string(), "game is full");
    }

    #[test]
    fn test_from_session_error() {
        let err: DominoError = SessionError::NotRegistered(PlayerId(1)).into();
        assert!(matches!(err, DominoError::Session(_)));
    }
}
