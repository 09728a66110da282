//! # Domino
//!
//! Authoritative multiplayer domino server.
//!
//! One process hosts one game. Clients connect over WebSocket, join with a
//! name, and then exchange commands and updates:
//!
//! ```text
//! client ──Join──→ handler ──→ GameActor (owns TurnEngine)
//!                                  │ events
//!                                  ▼
//!                              EventBus ──fan-out──→ per-player queues ──send loop──→ clients
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domino::prelude::*;
//!
//! # async fn example() -> Result<(), DominoError> {
//! let server = DominoServer::builder().bind("0.0.0.0:50051").build().await?;
//! server.run().await
//! # }
//! ```

mod error;
mod game;
mod handler;
mod server;

pub use error::DominoError;
pub use game::{GameHandle, GameInfo, Joined};
pub use server::{DominoServer, DominoServerBuilder};

/// Everything needed to configure and run a server.
pub mod prelude {
    pub use crate::{DominoError, DominoServer, DominoServerBuilder, GameHandle, GameInfo};
    pub use domino_engine::{Deck, GameConfig, GamePhase};
    pub use domino_protocol::{PlayerId, PlayerInfo};
    pub use domino_session::SessionConfig;
}
