//! Per-connection handler: join, send loop and receive loop.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Receive `Join` → seat the player through the game actor
//!   2. Send `JoinAccepted` → player is in the game
//!   3. Spawn the send loop, which drains the player's outbound queue
//!   4. Loop: receive envelopes → forward commands to the game actor

use std::sync::Arc;
use std::time::{Duration, Instant};

use domino_engine::EngineError;
use domino_protocol::{
    ClientCommand, Codec, Envelope, Payload, PlayerId, ProtocolError, SystemMessage,
    ERROR_BAD_REQUEST, ERROR_ROSTER_FULL, ERROR_UNAVAILABLE,
};
use domino_session::{PlayerSession, SessionRegistry};
use domino_transport::{Connection, WebSocketConnection};

use crate::game::Joined;
use crate::server::ServerState;
use crate::DominoError;

/// How long a fresh connection has to send its `Join`.
const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Closes a player's outbound queue when the handler exits, even on an
/// early return. The send loop then drains and stops.
struct SessionGuard {
    player_id: PlayerId,
    registry: SessionRegistry,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.registry.unregister(self.player_id).is_ok() {
            tracing::info!(player_id = %self.player_id, "session closed");
        }
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), DominoError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    // --- Step 1: Join ---
    let Joined {
        player,
        players_in_game,
        mut session,
    } = perform_join(&conn, &state).await?;
    let player_id = player.id;

    let guard = SessionGuard {
        player_id,
        registry: state.registry.clone(),
    };
    tracing::info!(%conn_id, %player_id, name = %player.name, "player joined");

    let accepted = session.envelope(Payload::System(SystemMessage::JoinAccepted {
        player,
        players_in_game,
    }));
    let bytes = state.codec.encode(&accepted)?;
    conn.send(&bytes).await?;

    // --- Step 2: Send loop ---
    let conn = Arc::new(conn);
    let sender = tokio::spawn(send_loop(
        Arc::clone(&conn),
        session,
        Arc::clone(&state),
    ));

    // --- Step 3: Receive loop ---
    let result = receive_loop(&conn, &state, player_id).await;

    drop(guard);
    if let Err(e) = sender.await {
        tracing::warn!(%player_id, error = %e, "send loop panicked");
    }
    if let Err(e) = conn.close().await {
        tracing::debug!(%player_id, error = %e, "close failed");
    }
    result
}

/// Receives the `Join` request and seats the player.
///
/// Anything else as the first message is answered with a 400 and the
/// connection is dropped.
async fn perform_join<C: Codec>(
    conn: &WebSocketConnection,
    state: &ServerState<C>,
) -> Result<Joined, DominoError> {
    let start = Instant::now();

    let data = match tokio::time::timeout(JOIN_TIMEOUT, conn.recv()).await {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => {
            return Err(ProtocolError::InvalidMessage("connection closed before join".into()).into());
        }
        Ok(Err(e)) => return Err(DominoError::Transport(e)),
        Err(_) => {
            return Err(ProtocolError::InvalidMessage("join timed out".into()).into());
        }
    };

    let name = match state.codec.decode::<Envelope>(&data).map(|env| env.payload) {
        Ok(Payload::System(SystemMessage::Join { player_name })) => player_name,
        _ => {
            send_error(conn, &state.codec, ERROR_BAD_REQUEST, "expected Join", &start).await?;
            return Err(ProtocolError::InvalidMessage("first message must be Join".into()).into());
        }
    };
    let name = name.trim();
    if name.is_empty() {
        send_error(conn, &state.codec, ERROR_BAD_REQUEST, "player name is empty", &start).await?;
        return Err(ProtocolError::InvalidMessage("empty player name".into()).into());
    }

    match state.game.join(name).await {
        Ok(joined) => Ok(joined),
        Err(e) => {
            let code = match &e {
                DominoError::Engine(EngineError::RosterFull) => ERROR_ROSTER_FULL,
                DominoError::Engine(_) => ERROR_BAD_REQUEST,
                _ => ERROR_UNAVAILABLE,
            };
            tracing::info!(%name, code, error = %e, "join rejected");
            send_error(conn, &state.codec, code, &e.to_string(), &start).await?;
            Err(e)
        }
    }
}

/// Drains the player's outbound queue onto the socket.
///
/// Ends when the queue is closed and empty, or the socket fails.
async fn send_loop<C: Codec>(
    conn: Arc<WebSocketConnection>,
    mut session: PlayerSession,
    state: Arc<ServerState<C>>,
) {
    let player_id = session.player();
    while let Some(envelope) = session.next_envelope().await {
        let bytes = match state.codec.encode(&envelope) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%player_id, error = %e, "failed to encode update");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(%player_id, error = %e, "send failed, stopping send loop");
            break;
        }
    }
    tracing::debug!(%player_id, "send loop finished");
}

/// Reads envelopes until the client leaves or the socket fails.
///
/// Malformed envelopes are logged and skipped.
async fn receive_loop<C: Codec>(
    conn: &WebSocketConnection,
    state: &ServerState<C>,
    player_id: PlayerId,
) -> Result<(), DominoError> {
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                return Ok(());
            }
        };

        let envelope: Envelope = match state.codec.decode(&data) {
            Ok(env) => env,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode envelope");
                continue;
            }
        };

        match envelope.payload {
            Payload::Command(cmd) => handle_command(state, player_id, cmd).await?,
            Payload::System(SystemMessage::Disconnect { reason }) => {
                tracing::info!(%player_id, %reason, "client disconnected");
                return Ok(());
            }
            Payload::System(SystemMessage::Join { .. }) => {
                state
                    .game
                    .notify(player_id, format!("Already joined as {player_id}"))
                    .await?;
            }
            other => {
                tracing::debug!(%player_id, payload = ?other, "ignoring unexpected payload");
            }
        }
    }
}

async fn handle_command<C: Codec>(
    state: &ServerState<C>,
    player_id: PlayerId,
    cmd: ClientCommand,
) -> Result<(), DominoError> {
    tracing::debug!(%player_id, ?cmd, "command received");
    match cmd {
        ClientCommand::GetCards { player_id: target } => {
            state.game.request_hand(player_id, target).await
        }
        // A connection only ever moves for the player it joined as.
        ClientCommand::Move {
            player_id: claimed,
            card_index,
        } if claimed != player_id => {
            tracing::warn!(%player_id, %claimed, card_index, "move names another player");
            state
                .game
                .notify(
                    player_id,
                    format!("Received move for {claimed} on the connection of {player_id}"),
                )
                .await
        }
        ClientCommand::Move { card_index, .. } => state.game.play(player_id, card_index).await,
    }
}

/// Sends a `SystemMessage::Error` envelope to the client.
async fn send_error(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    code: u16,
    message: &str,
    start: &Instant,
) -> Result<(), DominoError> {
    let envelope = Envelope {
        seq: 0,
        timestamp: start.elapsed().as_millis() as u64,
        payload: Payload::System(SystemMessage::Error {
            code,
            message: message.to_string(),
        }),
    };
    let bytes = codec.encode(&envelope)?;
    conn.send(&bytes).await?;
    Ok(())
}
