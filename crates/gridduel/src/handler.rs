//! Per-connection handler: decode intents, route them, push room events.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`], plus a writer task that owns the outbound
//! side:
//!   1. Reader: receive envelopes → dispatch to the room registry
//!   2. Writer: drain the player's `ServerMessage` channel → encode → send
//!
//! Direct replies (errors, room listings) go through the same channel as
//! room events, so one writer assigns every outbound sequence number.

use std::sync::Arc;
use std::time::{Duration, Instant};

use gridduel_protocol::{ClientMessage, Codec, Envelope, PlayerId, ServerMessage};
use gridduel_room::{Intent, PlayerSender, RoomError};
use gridduel_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::GridDuelError;
use crate::server::ServerState;

/// Drop guard that takes the player out of their room when the handler
/// exits, however it exits.
///
/// `Drop` is synchronous, so the registry call runs in a spawned task.
struct RoomGuard<C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for RoomGuard<C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut rooms = state.rooms.lock().await;
            match rooms.leave(player_id).await {
                Ok(()) | Err(RoomError::NotInAnyRoom(_)) => {}
                Err(e) => {
                    tracing::warn!(%player_id, error = %e, "leave on disconnect failed");
                }
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), GridDuelError> {
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    let player_id = PlayerId(conn_id.into_inner());
    tracing::debug!(%conn_id, %player_id, "handling new connection");

    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_loop(Arc::clone(&conn), Arc::clone(&state), rx));
    let _guard = RoomGuard {
        player_id,
        state: Arc::clone(&state),
    };

    let result = read_loop(&conn, &state, player_id, &tx).await;
    writer.abort();
    result
}

async fn read_loop<C: Codec>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<C>>,
    player_id: PlayerId,
    tx: &PlayerSender,
) -> Result<(), GridDuelError> {
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                return Err(e.into());
            }
        };

        let envelope: Envelope<ClientMessage> = match state.codec.decode(&data) {
            Ok(env) => env,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode envelope");
                let _ = tx.send(ServerMessage::Error {
                    message: format!("invalid message: {e}"),
                });
                continue;
            }
        };

        dispatch(state, player_id, tx, envelope.payload).await;
    }
}

/// Routes one decoded intent. Failures the client should see become
/// [`ServerMessage::Error`]; the rest are logged.
async fn dispatch<C: Codec>(
    state: &Arc<ServerState<C>>,
    player_id: PlayerId,
    tx: &PlayerSender,
    msg: ClientMessage,
) {
    let intent = match msg {
        ClientMessage::JoinRoom {
            room_id,
            name,
            character_type,
        } => {
            // The registry lock is held only for the join itself.
            let result = {
                let mut rooms = state.rooms.lock().await;
                rooms
                    .join(player_id, room_id.clone(), name, character_type, tx.clone())
                    .await
            };
            if let Err(e) = result {
                tracing::info!(%player_id, %room_id, error = %e, "join rejected");
                let _ = tx.send(ServerMessage::Error {
                    message: e.to_string(),
                });
            }
            return;
        }
        ClientMessage::ListRooms => {
            let rooms = state.rooms.lock().await.status().await;
            let _ = tx.send(ServerMessage::RoomList { rooms });
            return;
        }
        ClientMessage::SelectCards { cards } => Intent::SelectCards(cards),
        ClientMessage::RerollCards => Intent::RerollCards,
    };

    // PERF: caching the room handle per connection would avoid the
    // registry lock on every intent.
    let result = state.rooms.lock().await.route(player_id, intent).await;
    if let Err(e) = result {
        tracing::debug!(%player_id, error = %e, "intent not routed, ignoring");
    }
}

/// Wraps outbound messages in envelopes and writes them to the socket.
async fn write_loop<C: Codec>(
    conn: Arc<WebSocketConnection>,
    state: Arc<ServerState<C>>,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
) -> Result<(), GridDuelError> {
    let start = Instant::now();
    let mut seq: u64 = 1;

    while let Some(msg) = rx.recv().await {
        let envelope = Envelope::new(next_seq(&mut seq), millis(start.elapsed()), msg);
        let bytes = state.codec.encode(&envelope)?;
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(conn_id = %conn.id(), error = %e, "send failed, stopping writer");
            return Err(e.into());
        }
    }
    Ok(())
}

/// Milliseconds since the connection opened, saturating at `u64::MAX`.
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Increments and returns the next sequence number.
fn next_seq(seq: &mut u64) -> u64 {
    let current = *seq;
    *seq += 1;
    current
}
