//! Game configuration and phase state machine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Configuration for a game instance.
///
/// `capacity * hand_size` must leave at least one tile in the deck for the
/// opener search; [`TurnEngine::new`](crate::TurnEngine::new) rejects
/// configurations that don't.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of players at which the game starts automatically.
    pub capacity: usize,

    /// Tiles dealt to each player on join.
    pub hand_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            capacity: 3,
            hand_size: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// GamePhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a game.
///
/// ```text
/// WaitingForPlayers → InProgress → Finished
///         └──────────────────────────↑  (no playable opener)
/// ```
///
/// `Finished` is terminal; a new game needs a new engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    WaitingForPlayers,
    InProgress,
    Finished,
}

impl GamePhase {
    /// Returns `true` while seats are still open.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::WaitingForPlayers)
    }

    /// Returns `true` if moves are accepted.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Returns `true` if moving from `self` to `target` is allowed.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::WaitingForPlayers, Self::InProgress)
                | (Self::WaitingForPlayers, Self::Finished)
                | (Self::InProgress, Self::Finished)
        )
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaitingForPlayers => write!(f, "WaitingForPlayers"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}
