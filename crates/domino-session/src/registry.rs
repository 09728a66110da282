//! Per-player outbound queues.
//!
//! Every joined player has a bounded FIFO of [`ServerUpdate`]s. Bus
//! handlers push into it without waiting; the player's send loop drains it
//! through its [`PlayerSession`]. A full queue drops the message for that
//! player only, so one slow client never stalls dispatch for the others.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use domino_protocol::{Envelope, Payload, PlayerId, ServerUpdate};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::SessionError;

/// Who should receive an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every registered player.
    All,
    /// One specific player.
    Player(PlayerId),
    /// Every registered player except one.
    AllExcept(PlayerId),
}

/// Shared map from player to the sending half of their outbound queue.
///
/// Cheap to clone; clones share the same map.
#[derive(Clone)]
pub struct SessionRegistry {
    senders: Arc<Mutex<HashMap<PlayerId, mpsc::Sender<ServerUpdate>>>>,
    capacity: usize,
}

impl SessionRegistry {
    /// Creates an empty registry whose queues hold `capacity` messages.
    pub fn new(capacity: usize) -> Self {
        Self {
            senders: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PlayerId, mpsc::Sender<ServerUpdate>>> {
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens an outbound queue for `player`.
    pub fn register(&self, player: PlayerId) -> Result<PlayerSession, SessionError> {
        let mut senders = self.lock();
        if senders.contains_key(&player) {
            return Err(SessionError::AlreadyRegistered(player));
        }
        let (tx, rx) = mpsc::channel(self.capacity);
        senders.insert(player, tx);
        tracing::debug!(player_id = %player, capacity = self.capacity, "session registered");
        Ok(PlayerSession::new(player, rx))
    }

    /// Closes `player`'s queue. Their send loop finishes once it has
    /// drained what was already queued.
    pub fn unregister(&self, player: PlayerId) -> Result<(), SessionError> {
        match self.lock().remove(&player) {
            Some(_) => {
                tracing::debug!(player_id = %player, "session unregistered");
                Ok(())
            }
            None => Err(SessionError::NotRegistered(player)),
        }
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.lock().contains_key(&player)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queues `update` for one player without waiting.
    pub fn send_to(&self, player: PlayerId, update: ServerUpdate) -> Result<(), SessionError> {
        let senders = self.lock();
        let sender = senders
            .get(&player)
            .ok_or(SessionError::NotRegistered(player))?;
        sender.try_send(update).map_err(|e| match e {
            TrySendError::Full(_) => SessionError::QueueFull(player),
            TrySendError::Closed(_) => SessionError::QueueClosed(player),
        })
    }

    /// Queues `update` for every matching player. Failures are logged and
    /// skipped. Returns how many queues accepted it.
    pub fn deliver(&self, recipient: Recipient, update: ServerUpdate) -> usize {
        let targets: Vec<PlayerId> = match recipient {
            Recipient::Player(id) => vec![id],
            Recipient::All => self.lock().keys().copied().collect(),
            Recipient::AllExcept(excluded) => self
                .lock()
                .keys()
                .copied()
                .filter(|id| *id != excluded)
                .collect(),
        };

        let mut delivered = 0;
        for player in targets {
            match self.send_to(player, update.clone()) {
                Ok(()) => delivered += 1,
                Err(SessionError::QueueFull(_)) => {
                    tracing::warn!(player_id = %player, "outbound queue full, update dropped");
                }
                Err(error) => {
                    tracing::debug!(player_id = %player, %error, "update not delivered");
                }
            }
        }
        delivered
    }
}

/// The receiving half of a player's outbound queue, plus the envelope
/// sequence for that connection.
#[derive(Debug)]
pub struct PlayerSession {
    player: PlayerId,
    outbound: mpsc::Receiver<ServerUpdate>,
    seq: u64,
    started: Instant,
}

impl PlayerSession {
    fn new(player: PlayerId, outbound: mpsc::Receiver<ServerUpdate>) -> Self {
        Self {
            player,
            outbound,
            seq: 0,
            started: Instant::now(),
        }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Wraps `payload` in the next envelope for this connection.
    pub fn envelope(&mut self, payload: Payload) -> Envelope {
        let seq = self.seq;
        self.seq += 1;
        Envelope {
            seq,
            timestamp: self.started.elapsed().as_millis() as u64,
            payload,
        }
    }

    /// Waits for the next queued update. `None` once the session has been
    /// unregistered and the queue is drained.
    pub async fn next_update(&mut self) -> Option<ServerUpdate> {
        self.outbound.recv().await
    }

    /// Waits for the next queued update, already enveloped.
    pub async fn next_envelope(&mut self) -> Option<Envelope> {
        let update = self.next_update().await?;
        Some(self.envelope(Payload::Update(update)))
    }
}
