//! Wire protocol for the domino server.
//!
//! This crate defines the "language" that clients and server speak:
//!
//! - **Types** ([`Envelope`], [`SystemMessage`], [`ClientCommand`],
//!   [`ServerUpdate`], etc.) — the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (Envelope) → Session (player context)
//! ```
//!
//! A connection starts with a request/response exchange
//! (`SystemMessage::Join` → `SystemMessage::JoinAccepted` or `Error`) and
//! then turns into a bidirectional stream of [`ClientCommand`]s and
//! [`ServerUpdate`]s.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientCommand, Envelope, Payload, PlayerId, PlayerInfo, ServerUpdate,
    SystemMessage, WireTile, ERROR_BAD_REQUEST, ERROR_ROSTER_FULL,
    ERROR_UNAVAILABLE,
};
