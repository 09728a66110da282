//! Error types for the session layer.

use domino_protocol::PlayerId;

/// Errors from the event bus and the outbound queues.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The player's outbound queue is at capacity; the message was dropped.
    #[error("outbound queue full for player {0}")]
    QueueFull(PlayerId),

    /// The player's send loop has gone away.
    #[error("outbound queue closed for player {0}")]
    QueueClosed(PlayerId),

    /// No session is registered for the player.
    #[error("no session registered for player {0}")]
    NotRegistered(PlayerId),

    /// The player already has a session.
    #[error("player {0} already has a session")]
    AlreadyRegistered(PlayerId),

    /// The dispatch loop has stopped.
    #[error("event bus closed")]
    BusClosed,
}
