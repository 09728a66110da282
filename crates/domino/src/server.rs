//! `DominoServer` builder and server loop.
//!
//! Ties the layers together: transport → protocol → session → engine.
//! One server hosts exactly one game.

use std::sync::Arc;

use domino_engine::{Deck, GameConfig, TurnEngine};
use domino_protocol::{Codec, JsonCodec};
use domino_session::{install_fanout, EventBus, PlayerAllocator, SessionConfig, SessionRegistry};
use domino_transport::{Transport, WebSocketTransport};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::game::{spawn_game, GameHandle};
use crate::handler::handle_connection;
use crate::DominoError;

/// Commands the game actor buffers before callers start waiting.
const GAME_CHANNEL_SIZE: usize = 64;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) game: GameHandle,
    pub(crate) registry: SessionRegistry,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a domino server.
///
/// # Example
///
/// ```rust,no_run
/// use domino::prelude::*;
///
/// # async fn example() -> Result<(), DominoError> {
/// let server = DominoServer::builder()
///     .bind("0.0.0.0:50051")
///     .game_config(GameConfig { capacity: 4, hand_size: 5 })
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct DominoServerBuilder {
    bind_addr: String,
    game_config: GameConfig,
    session_config: SessionConfig,
    seed: Option<u64>,
    deck: Option<Deck>,
}

impl DominoServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:50051".to_string(),
            game_config: GameConfig::default(),
            session_config: SessionConfig::default(),
            seed: None,
            deck: None,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the roster capacity and hand size.
    pub fn game_config(mut self, config: GameConfig) -> Self {
        self.game_config = config;
        self
    }

    /// Sets the queue and bus buffer sizes.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Makes the shuffle and color rotation reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Plays with exactly this deck instead of a shuffled one.
    pub fn deck(mut self, deck: Deck) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Binds the listener and starts the event bus and the game actor.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<DominoServer<JsonCodec>, DominoError> {
        let (deck, allocator) = match (self.deck, self.seed) {
            (Some(deck), Some(seed)) => (deck, PlayerAllocator::seeded(seed)),
            (Some(deck), None) => (deck, PlayerAllocator::new()),
            (None, Some(seed)) => {
                let mut rng = StdRng::seed_from_u64(seed);
                (Deck::shuffled(&mut rng), PlayerAllocator::seeded(seed))
            }
            (None, None) => (Deck::shuffled(&mut rand::rng()), PlayerAllocator::new()),
        };
        let engine = TurnEngine::new(self.game_config, deck)?;

        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let registry = SessionRegistry::new(self.session_config.outbound_capacity);
        let bus = Arc::new(EventBus::new(self.session_config.event_buffer));
        install_fanout(&bus, &registry);
        bus.start();

        let game = spawn_game(engine, allocator, registry.clone(), bus, GAME_CHANNEL_SIZE);

        let state = Arc::new(ServerState {
            game,
            registry,
            codec: JsonCodec,
        });
        Ok(DominoServer { transport, state })
    }
}

impl Default for DominoServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A domino server with its game already running.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct DominoServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl DominoServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> DominoServerBuilder {
        DominoServerBuilder::new()
    }
}

impl<C: Codec> DominoServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// A handle to the hosted game.
    pub fn game(&self) -> GameHandle {
        self.state.game.clone()
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task per connection. Runs until the process is
    /// terminated.
    pub async fn run(mut self) -> Result<(), DominoError> {
        tracing::info!(addr = ?self.local_addr().ok(), "domino server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
