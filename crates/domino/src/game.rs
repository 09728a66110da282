//! Game actor: a Tokio task that owns the [`TurnEngine`].
//!
//! Joins, moves and hand requests from every connection funnel through one
//! mpsc channel, so the engine sees them strictly one at a time. The
//! events each command produces are posted to the bus before the next
//! command is read.

use std::sync::Arc;

use domino_engine::{player_log, EngineError, GameEvent, GamePhase, TurnEngine};
use domino_protocol::{PlayerId, PlayerInfo};
use domino_session::{EventBus, PlayerAllocator, PlayerSession, SessionRegistry};
use tokio::sync::{mpsc, oneshot};

use crate::DominoError;

/// A successful join: who you are, who was already seated, and the queue
/// your updates will arrive on.
#[derive(Debug)]
pub struct Joined {
    pub player: PlayerInfo,
    pub players_in_game: Vec<PlayerInfo>,
    pub session: PlayerSession,
}

/// A snapshot of game metadata.
#[derive(Debug, Clone)]
pub struct GameInfo {
    pub phase: GamePhase,
    pub players: Vec<PlayerInfo>,
    pub current: Option<PlayerId>,
    pub winner: Option<PlayerId>,
}

enum GameCommand {
    Join {
        name: String,
        reply: oneshot::Sender<Result<Joined, DominoError>>,
    },
    Move {
        player: PlayerId,
        slot: usize,
    },
    RequestHand {
        requester: PlayerId,
        player: PlayerId,
    },
    Notify {
        player: PlayerId,
        message: String,
    },
    GetInfo {
        reply: oneshot::Sender<GameInfo>,
    },
    Shutdown,
}

/// Handle to the running game actor. Cheap to clone.
#[derive(Clone)]
pub struct GameHandle {
    sender: mpsc::Sender<GameCommand>,
}

impl GameHandle {
    /// Seats a new player called `name`.
    pub async fn join(&self, name: &str) -> Result<Joined, DominoError> {
        let (reply, rx) = oneshot::channel();
        self.send(GameCommand::Join {
            name: name.to_string(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| DominoError::GameUnavailable)?
    }

    /// Submits a move (fire-and-forget; the outcome arrives as updates).
    pub async fn play(&self, player: PlayerId, slot: usize) -> Result<(), DominoError> {
        self.send(GameCommand::Move { player, slot }).await
    }

    /// Asks for `player`'s hand to be re-sent to `requester`.
    pub async fn request_hand(
        &self,
        requester: PlayerId,
        player: PlayerId,
    ) -> Result<(), DominoError> {
        self.send(GameCommand::RequestHand { requester, player })
            .await
    }

    /// Sends a log line to one player through the normal update path.
    pub async fn notify(&self, player: PlayerId, message: String) -> Result<(), DominoError> {
        self.send(GameCommand::Notify { player, message }).await
    }

    pub async fn info(&self) -> Result<GameInfo, DominoError> {
        let (reply, rx) = oneshot::channel();
        self.send(GameCommand::GetInfo { reply }).await?;
        rx.await.map_err(|_| DominoError::GameUnavailable)
    }

    pub async fn shutdown(&self) -> Result<(), DominoError> {
        self.send(GameCommand::Shutdown).await
    }

    async fn send(&self, cmd: GameCommand) -> Result<(), DominoError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| DominoError::GameUnavailable)
    }
}

struct GameActor {
    engine: TurnEngine,
    allocator: PlayerAllocator,
    registry: SessionRegistry,
    bus: Arc<EventBus<GameEvent>>,
    receiver: mpsc::Receiver<GameCommand>,
}

impl GameActor {
    async fn run(mut self) {
        tracing::info!(capacity = self.engine.config().capacity, "game actor started");

        while let Some(cmd) = self.receiver.recv().await {
            let events = match cmd {
                GameCommand::Join { name, reply } => {
                    let (result, events) = self.handle_join(&name);
                    // Queue the join's updates before the joiner hears back.
                    self.publish(events).await;
                    let _ = reply.send(result);
                    continue;
                }
                GameCommand::Move { player, slot } => self.engine.play(player, slot),
                GameCommand::RequestHand { requester, player } => {
                    vec![self.handle_request_hand(requester, player)]
                }
                GameCommand::Notify { player, message } => {
                    vec![player_log(player, message)]
                }
                GameCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                    continue;
                }
                GameCommand::Shutdown => {
                    tracing::info!("game shutting down");
                    break;
                }
            };
            self.publish(events).await;
        }

        tracing::info!("game actor stopped");
    }

    fn handle_join(&mut self, name: &str) -> (Result<Joined, DominoError>, Vec<GameEvent>) {
        if !self.engine.has_open_seat() {
            return (Err(EngineError::RosterFull.into()), Vec::new());
        }

        let player = self.allocator.allocate(name);
        // Register first so the joiner's own hand has somewhere to go.
        let session = match self.registry.register(player.id) {
            Ok(session) => session,
            Err(e) => return (Err(e.into()), Vec::new()),
        };
        let players_in_game = self.engine.roster_info();

        match self.engine.join(player.clone()) {
            Ok(events) => (
                Ok(Joined {
                    player,
                    players_in_game,
                    session,
                }),
                events,
            ),
            Err(e) => {
                let _ = self.registry.unregister(player.id);
                (Err(e.into()), Vec::new())
            }
        }
    }

    fn handle_request_hand(&self, requester: PlayerId, player: PlayerId) -> GameEvent {
        if requester != player {
            return match self.engine.player(player) {
                None => player_log(requester, format!("player {player} not exists")),
                Some(_) => player_log(requester, format!("cards of {player} are not yours to see")),
            };
        }
        self.engine
            .hand_snapshot(player)
            .unwrap_or_else(|e| player_log(requester, e.to_string()))
    }

    async fn publish(&self, events: Vec<GameEvent>) {
        if let Err(e) = self.bus.post_all(events).await {
            tracing::error!(error = %e, "failed to publish game events");
        }
    }

    fn info(&self) -> GameInfo {
        GameInfo {
            phase: self.engine.phase(),
            players: self.engine.roster_info(),
            current: self.engine.current_player().map(|p| p.id()),
            winner: self.engine.winner().map(|p| p.id()),
        }
    }
}

/// Spawns the game actor and returns a handle to it.
///
/// `channel_size` bounds the command queue; senders wait when it's full.
pub(crate) fn spawn_game(
    engine: TurnEngine,
    allocator: PlayerAllocator,
    registry: SessionRegistry,
    bus: Arc<EventBus<GameEvent>>,
    channel_size: usize,
) -> GameHandle {
    let (sender, receiver) = mpsc::channel(channel_size);
    let actor = GameActor {
        engine,
        allocator,
        registry,
        bus,
        receiver,
    };
    tokio::spawn(actor.run());
    GameHandle { sender }
}
