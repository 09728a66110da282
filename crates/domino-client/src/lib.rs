//! Client side of the domino game.
//!
//! - [`DominoClient`] — joins over WebSocket, sends moves, yields updates
//! - [`ClientMirror`] — the player's local view, rebuilt from updates
//!
//! ```rust,no_run
//! use domino_client::{ClientMirror, DominoClient};
//!
//! # async fn example() -> Result<(), domino_client::ClientError> {
//! let client = DominoClient::connect("127.0.0.1:50051").await?;
//! let (me, others) = client.join("ana").await?;
//! let mut mirror = ClientMirror::new(me, others);
//! while let Some(update) = client.next_update().await? {
//!     mirror.apply(update)?;
//!     println!("{mirror}");
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod mirror;

pub use client::DominoClient;
pub use error::ClientError;
pub use mirror::{ClientMirror, Opponent};
