//! Per-connection session handling.
//!
//! Each accepted WebSocket gets its own task running [`run_session`].
//! The lifecycle is Connecting → Joined → Active → Closed:
//!
//! 1. The upgrade path carries `(room_id, player_id)`; a full room is
//!    turned away before the handshake.
//! 2. `registry.join` registers the outbound channel and announces the
//!    join to the room.
//! 3. The active loop awaits inbound frames, classifies them, and feeds
//!    `move` messages to the room actor.
//! 4. Any close or transport error is a normal termination signal: the
//!    session deregisters exactly once and the task ends. No
//!    reconnection — a returning player is a brand-new session.

use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::{SinkExt, StreamExt};
use roshambo_protocol::{
    parse_client_message, ClientMessage, PlayerId, ProtocolError, RoomId,
};
use roshambo_room::RoomStatus;
use serde_json::json;
use tokio::sync::mpsc;

use crate::AppState;

/// `GET /ws/{room_id}/{player_id}` — upgrades into a game session.
pub(crate) async fn ws_upgrade(
    State(state): State<AppState>,
    Path((room_id, player_id)): Path<(String, String)>,
    ws: WebSocketUpgrade,
) -> Response {
    let room_id = RoomId(room_id);
    let player_id = PlayerId(player_id);

    // Turn a full room away before paying for the upgrade. The real
    // admission check happens in `join` below; this only improves the
    // rejection (an HTTP 409 instead of an immediately-closed socket).
    if state.registry.status(&room_id).await == RoomStatus::Full {
        tracing::debug!(%room_id, %player_id, "refusing upgrade, room full");
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "room full" })),
        )
            .into_response();
    }

    ws.on_upgrade(move |socket| run_session(socket, state, room_id, player_id))
}

/// Drives one connection from join to deregistration.
async fn run_session(
    mut socket: WebSocket,
    state: AppState,
    room_id: RoomId,
    player_id: PlayerId,
) {
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();

    // Joining also announces `player_join` to the whole room, this
    // connection included — the announcement is already queued on
    // `outbound_rx` by the time join returns.
    let room = match state
        .registry
        .join(&room_id, player_id.clone(), outbound_tx)
        .await
    {
        Ok(handle) => handle,
        Err(e) => {
            // Lost the pre-upgrade race, or a duplicate player id.
            // Close with a policy frame instead of admitting a
            // spectator whose moves would corrupt the round.
            tracing::info!(%room_id, %player_id, error = %e, "join refused");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::POLICY,
                    reason: e.to_string().into(),
                })))
                .await;
            return;
        }
    };

    tracing::debug!(%room_id, %player_id, "session joined");

    let (mut sink, mut stream) = socket.split();

    // Writer task: drain room broadcasts into the socket. A send failure
    // means the peer is gone; the reader half will notice and tear down.
    let mut writer = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "unserializable broadcast");
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Active loop: the await on the next frame is the session's only
    // suspension point; everything it triggers is a fast in-memory
    // mutation inside the room actor.
    loop {
        let frame = tokio::select! {
            frame = stream.next() => frame,
            // Writer death means the socket is unwritable; don't linger
            // reading from a peer we can no longer answer.
            _ = &mut writer => None,
        };

        let Some(Ok(message)) = frame else {
            // Closed cleanly or failed mid-read — same teardown path.
            break;
        };

        match message {
            Message::Text(text) => match parse_client_message(&text) {
                Ok(ClientMessage::Move { mv }) => {
                    if room.submit_move(player_id.clone(), mv).await.is_err() {
                        // Room actor is gone; nothing left to play in.
                        break;
                    }
                }
                Err(ProtocolError::UnrecognizedType(t)) => {
                    tracing::debug!(
                        %room_id, %player_id, msg_type = %t,
                        "ignoring irrelevant message type"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        %room_id, %player_id, error = %e,
                        "dropping malformed frame"
                    );
                }
            },
            Message::Close(_) => break,
            // Pings are answered by axum; binary frames aren't part of
            // the contract.
            _ => {}
        }
    }

    // Deregister exactly once; the registry side is idempotent anyway.
    state.registry.leave(&room_id, &player_id).await;
    writer.abort();
    tracing::debug!(%room_id, %player_id, "session closed");
}
