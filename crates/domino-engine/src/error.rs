//! Error types for the rules engine.

use domino_protocol::{PlayerId, WireTile};

/// Reasons the engine refuses a join or a move.
///
/// Move rejections never change game state; the engine reports them to the
/// offending player as a [`GameEvent::InvalidMove`](crate::GameEvent).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Every seat is taken or the game already left the lobby.
    #[error("game is full")]
    RosterFull,

    /// `capacity * hand_size` does not fit in the deck.
    #[error("deck cannot deal {needed} tiles, only {available} left")]
    DeckExhausted { needed: usize, available: usize },

    /// A move arrived before the roster filled up.
    #[error("Game has not started yet")]
    GameNotStarted,

    /// A move arrived after the game ended.
    #[error("Game is already finished")]
    GameFinished,

    /// The player id is not on the roster.
    #[error("player {0} not exists")]
    UnknownPlayer(PlayerId),

    /// A move arrived from someone other than the current player.
    #[error("Received move from {player} but current player is {current}")]
    NotYourTurn { player: PlayerId, current: PlayerId },

    /// The hand slot index is past the end of the dealt hand.
    #[error("Invalid move. Out of range {0}")]
    SlotOutOfRange(usize),

    /// The hand slot is already empty.
    #[error("Card already played. Please select another")]
    TileAlreadyPlayed,

    /// The tile matches neither open end.
    #[error("Card {0} not playable. Please select another")]
    IllegalTile(WireTile),
}
