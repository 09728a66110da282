//! Rules engine for the domino game.
//!
//! Everything here is synchronous and transport-agnostic. The server owns
//! exactly one [`TurnEngine`] per game and feeds it joins and moves one at
//! a time; the engine answers with [`GameEvent`]s describing what changed.
//!
//! # Key types
//!
//! - [`Tile`], [`Chain`], [`Hand`], [`Deck`] — the pieces and where they live
//! - [`TurnEngine`] — roster, turn pointer, move validation, end of game
//! - [`GameEvent`] — typed record of every state change
//! - [`GameConfig`] / [`GamePhase`] — seat count, hand size, lifecycle

mod chain;
mod config;
mod deck;
mod engine;
mod error;
mod event;
mod hand;
mod player;
mod tile;

pub use chain::{Attachment, Chain, Placement};
pub use config::{GameConfig, GamePhase};
pub use deck::{Deck, DECK_SIZE, MIN_PIPS};
pub use engine::{player_log, select_winner, TurnEngine};
pub use error::EngineError;
pub use event::{EventKind, GameEvent, LogScope};
pub use hand::Hand;
pub use player::Player;
pub use tile::{Tile, MAX_PIPS};
