//! Events the engine emits.
//!
//! The engine never talks to connections. Each operation returns the
//! events it produced, in order, and the caller posts them to the event
//! bus where per-kind handlers turn them into wire updates.

use domino_protocol::{PlayerId, PlayerInfo, WireTile};

use crate::EngineError;

/// Who a log line is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogScope {
    Everyone,
    Player(PlayerId),
}

/// Something that happened in the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A player took a seat.
    PlayerJoined { player: PlayerInfo },

    /// A player's hand, for the owner's eyes only.
    HandAssigned {
        player: PlayerId,
        cards: Vec<Option<WireTile>>,
    },

    /// The opener was placed on the empty chain.
    InitialTileRevealed { tile: WireTile },

    /// The turn moved to `player`.
    TurnChanged { player: PlayerId },

    /// `player` was passed over for having no legal tile.
    TurnSkipped { player: PlayerId },

    /// A move was rejected; state is unchanged.
    InvalidMove { player: PlayerId, error: EngineError },

    /// A tile was attached. `tile` carries the normalized faces.
    TileMoved {
        player: PlayerId,
        slot: usize,
        tile: WireTile,
        next_player: Option<PlayerId>,
    },

    /// The game ended. `winner` is `None` if it never started.
    GameFinished {
        winner: Option<PlayerInfo>,
        reason: String,
    },

    /// Free-text narration.
    LogMessage { scope: LogScope, message: String },
}

/// Discriminant of a [`GameEvent`], used to route it to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PlayerJoined,
    HandAssigned,
    InitialTileRevealed,
    TurnChanged,
    TurnSkipped,
    InvalidMove,
    TileMoved,
    GameFinished,
    LogMessage,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PlayerJoined { .. } => EventKind::PlayerJoined,
            Self::HandAssigned { .. } => EventKind::HandAssigned,
            Self::InitialTileRevealed { .. } => EventKind::InitialTileRevealed,
            Self::TurnChanged { .. } => EventKind::TurnChanged,
            Self::TurnSkipped { .. } => EventKind::TurnSkipped,
            Self::InvalidMove { .. } => EventKind::InvalidMove,
            Self::TileMoved { .. } => EventKind::TileMoved,
            Self::GameFinished { .. } => EventKind::GameFinished,
            Self::LogMessage { .. } => EventKind::LogMessage,
        }
    }

    pub(crate) fn log(message: impl Into<String>) -> Self {
        Self::LogMessage {
            scope: LogScope::Everyone,
            message: message.into(),
        }
    }
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::PlayerJoined,
        EventKind::HandAssigned,
        EventKind::InitialTileRevealed,
        EventKind::TurnChanged,
        EventKind::TurnSkipped,
        EventKind::InvalidMove,
        EventKind::TileMoved,
        EventKind::GameFinished,
        EventKind::LogMessage,
    ];
}
