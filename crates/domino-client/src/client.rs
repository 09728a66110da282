//! Connection driver: joins a game and exchanges envelopes with the server.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use domino_protocol::{
    ClientCommand, Codec, Envelope, JsonCodec, Payload, PlayerId, PlayerInfo, ProtocolError,
    ServerUpdate, SystemMessage,
};
use domino_transport::{connect, ClientConnection, Connection, TransportError};

use crate::ClientError;

/// A connected player.
///
/// Every method takes `&self`, so one task can wait in
/// [`next_update`](Self::next_update) while another sends moves.
pub struct DominoClient<C: Codec = JsonCodec> {
    conn: ClientConnection,
    codec: C,
    seq: AtomicU64,
    started: Instant,
    player: OnceLock<PlayerId>,
}

impl DominoClient<JsonCodec> {
    /// Dials `addr` (`host:port` or a `ws://` URL).
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        Self::connect_with(addr, JsonCodec).await
    }
}

impl<C: Codec> DominoClient<C> {
    pub async fn connect_with(addr: &str, codec: C) -> Result<Self, ClientError> {
        let conn = connect(addr).await?;
        Ok(Self {
            conn,
            codec,
            seq: AtomicU64::new(0),
            started: Instant::now(),
            player: OnceLock::new(),
        })
    }

    /// The id assigned at join, if joined.
    pub fn player_id(&self) -> Option<PlayerId> {
        self.player.get().copied()
    }

    /// Joins the game as `name`.
    ///
    /// Returns the assigned identity and everyone seated before this
    /// player.
    pub async fn join(&self, name: &str) -> Result<(PlayerInfo, Vec<PlayerInfo>), ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::EmptyName);
        }
        self.send(Payload::System(SystemMessage::Join {
            player_name: name.to_string(),
        }))
        .await?;

        let data = self
            .conn
            .recv()
            .await?
            .ok_or_else(|| TransportError::ConnectionClosed("closed during join".into()))?;
        let envelope: Envelope = self.codec.decode(&data)?;
        match envelope.payload {
            Payload::System(SystemMessage::JoinAccepted {
                player,
                players_in_game,
            }) => {
                let _ = self.player.set(player.id);
                tracing::info!(player_id = %player.id, color = %player.color, "joined game");
                Ok((player, players_in_game))
            }
            Payload::System(SystemMessage::Error { code, message }) => {
                Err(ClientError::Rejected { code, message })
            }
            other => Err(ProtocolError::InvalidMessage(format!(
                "expected JoinAccepted, got {other:?}"
            ))
            .into()),
        }
    }

    /// Asks the server to re-send this player's hand.
    pub async fn request_cards(&self) -> Result<(), ClientError> {
        let player_id = self.player_id().ok_or(ClientError::NotJoined)?;
        self.send(Payload::Command(ClientCommand::GetCards { player_id }))
            .await
    }

    /// Plays the tile in hand slot `slot`.
    pub async fn send_move(&self, slot: usize) -> Result<(), ClientError> {
        let player_id = self.player_id().ok_or(ClientError::NotJoined)?;
        tracing::debug!(%player_id, slot, "sending move");
        self.send(Payload::Command(ClientCommand::Move {
            player_id,
            card_index: slot,
        }))
        .await
    }

    /// Waits for the next update. `None` once the server has closed the
    /// connection.
    pub async fn next_update(&self) -> Result<Option<ServerUpdate>, ClientError> {
        loop {
            let Some(data) = self.conn.recv().await? else {
                return Ok(None);
            };
            let envelope: Envelope = match self.codec.decode(&data) {
                Ok(env) => env,
                Err(e) => {
                    tracing::debug!(error = %e, "failed to decode envelope");
                    continue;
                }
            };
            match envelope.payload {
                Payload::Update(update) => return Ok(Some(update)),
                Payload::System(SystemMessage::Disconnect { reason }) => {
                    tracing::info!(%reason, "server disconnected");
                    return Ok(None);
                }
                Payload::System(SystemMessage::Error { code, message }) => {
                    tracing::warn!(code, %message, "server error");
                }
                other => tracing::debug!(payload = ?other, "ignoring unexpected payload"),
            }
        }
    }

    /// Says goodbye and closes the connection.
    pub async fn disconnect(&self, reason: &str) -> Result<(), ClientError> {
        self.send(Payload::System(SystemMessage::Disconnect {
            reason: reason.to_string(),
        }))
        .await?;
        self.conn.close().await?;
        Ok(())
    }

    async fn send(&self, payload: Payload) -> Result<(), ClientError> {
        let envelope = Envelope {
            seq: self.seq.fetch_add(1, Ordering::Relaxed),
            timestamp: self.started.elapsed().as_millis() as u64,
            payload,
        };
        let bytes = self.codec.encode(&envelope)?;
        self.conn.send(&bytes).await?;
        Ok(())
    }
}
