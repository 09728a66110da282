//! Session layer for the domino server.
//!
//! Sits between the rules engine and the network:
//!
//! ```text
//! TurnEngine ──events──→ EventBus ──fan-out──→ SessionRegistry ──→ PlayerSession (one per client)
//! ```
//!
//! - [`EventBus`] — buffered publish/subscribe with one handler per kind
//! - [`install_fanout`] — maps each [`GameEvent`](domino_engine::GameEvent)
//!   to wire updates and their recipients
//! - [`SessionRegistry`] / [`PlayerSession`] — bounded per-player outbound
//!   queues; a full queue drops rather than blocks
//! - [`PlayerAllocator`] — sequential ids and rotating display colors

mod allocator;
mod bus;
mod config;
mod error;
mod fanout;
mod registry;

pub use allocator::{PlayerAllocator, COLORS};
pub use bus::{BusEvent, EventBus, Handler};
pub use config::SessionConfig;
pub use error::SessionError;
pub use fanout::{install_fanout, updates_for};
pub use registry::{PlayerSession, Recipient, SessionRegistry};
