//! Core protocol types for the domino wire format.
//!
//! Every type in this module travels "on the wire": it is serialized to
//! bytes, sent over the connection, and deserialized on the other side.
//! Only face values ever cross the wire; orientation and ownership are
//! server-side concepts.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique, server-assigned identifier for a player.
///
/// A newtype wrapper so a player id can't be confused with a hand slot
/// or a sequence number, even though all of them are integers.
///
/// `#[serde(transparent)]` serializes `PlayerId(3)` as plain `3`; the
/// human-facing form `P3` only appears through `Display`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Public identity of a player as other players see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    /// Display color name (e.g. `"navy"`); purely cosmetic.
    pub color: String,
}

/// A tile as it appears on the wire: just the two face values.
///
/// For a tile on the chain this is the pair *after* orientation
/// normalization, so `y` of a head tile touches the old head and `x` of a
/// tail tile touches the old tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireTile {
    pub x: u8,
    pub y: u8,
}

impl fmt::Display for WireTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// SystemMessage: connection lifecycle
// ---------------------------------------------------------------------------

/// `SystemMessage::Error` code for a malformed or out-of-place message.
pub const ERROR_BAD_REQUEST: u16 = 400;
/// `SystemMessage::Error` code for a join rejected because the roster is full.
pub const ERROR_ROSTER_FULL: u16 = 409;
/// `SystemMessage::Error` code when the game actor is gone.
pub const ERROR_UNAVAILABLE: u16 = 503;

/// Messages that frame the connection itself rather than the game.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
/// `{ "type": "Join", "player_name": "ana" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SystemMessage {
    /// Client → Server: the join request. Must be the first message.
    Join { player_name: String },

    /// Server → Client: join succeeded. `players_in_game` is the roster
    /// snapshot excluding the joiner; later joins arrive as
    /// [`ServerUpdate::NewPlayer`].
    JoinAccepted {
        player: PlayerInfo,
        players_in_game: Vec<PlayerInfo>,
    },

    /// Either direction: "I'm disconnecting."
    Disconnect { reason: String },

    /// Server → Client: a request failed. `code` follows HTTP-style
    /// conventions (see the `ERROR_*` constants).
    Error { code: u16, message: String },
}

// ---------------------------------------------------------------------------
// ClientCommand: intents sent on the open stream
// ---------------------------------------------------------------------------

/// What a joined client can ask of the server.
///
/// Serialized as `{ "cmd": "getcards", "playerId": 1 }` and
/// `{ "cmd": "move", "playerId": 1, "cardIndex": 2 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "cmd",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum ClientCommand {
    /// Re-send my current hand.
    GetCards { player_id: PlayerId },

    /// Play the tile in hand slot `card_index`.
    Move {
        player_id: PlayerId,
        card_index: usize,
    },
}

// ---------------------------------------------------------------------------
// ServerUpdate: deltas pushed to a client mirror
// ---------------------------------------------------------------------------

/// Server → Client deltas, all sharing one envelope discriminated by
/// `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum ServerUpdate {
    /// Another player joined after you.
    NewPlayer { player: PlayerInfo },

    /// It is now `player_id`'s turn.
    PlayerTurn { player_id: PlayerId },

    /// The full hand of `player_id`, one entry per dealt slot. Played
    /// slots are `null`. Only ever sent to the owner.
    Cards {
        player_id: PlayerId,
        cards: Vec<Option<WireTile>>,
    },

    /// A tile was played. `next_player` is `None` when the move ended
    /// the game.
    PlayerMove {
        player: PlayerId,
        next_player: Option<PlayerId>,
        card_index: usize,
        card: WireTile,
    },

    /// The opener placed on the empty chain when the game started.
    InitialCard { card: WireTile },

    /// A free-text log line.
    Log { message: String },

    /// The game is over. `winner` is `None` when the game could not start.
    GameFinished {
        winner: Option<PlayerInfo>,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Payload / Envelope
// ---------------------------------------------------------------------------

/// The content of an envelope.
///
/// `#[serde(tag = "type", content = "data")]` produces adjacently tagged
/// JSON, e.g. `{ "type": "Command", "data": { "cmd": "move", ... } }`, so
/// the receive loop can tell connection framing from game traffic without
/// looking inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Payload {
    System(SystemMessage),
    Command(ClientCommand),
    Update(ServerUpdate),
}

/// The top-level message wrapper. Every message on the wire is an Envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Per-connection, per-direction sequence number starting at 0.
    /// Outbound order on one connection is enqueue order.
    pub seq: u64,

    /// Milliseconds since the sender's session started.
    pub timestamp: u64,

    pub payload: Payload,
}

// =========================================================================
// Tests
// =========================================================================
