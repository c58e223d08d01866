//! `WebSocket` handler for the live room view stream.
//!
//! Viewers connect to `GET /ws/rooms/{room}` and receive a JSON-encoded
//! [`ViewFrame`] each time something happens in the room: the human
//! played, the opponent replied, or the game ended. Each frame carries
//! a freshly rendered board fragment built from the room's current
//! snapshot at event time, so a lagging client that skips events still
//! converges on the latest board.
//!
//! Subscription ends when the connection does: the broadcast receiver
//! is dropped on every exit path.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tempo_types::{RoomEvent, RoomKey};
use tracing::{debug, warn};

use crate::render;
use crate::state::AppState;

/// Query parameters for the push stream.
#[derive(Debug, serde::Deserialize)]
pub struct StreamQuery {
    /// Display name rendered on the viewer's player card.
    pub player: Option<String>,
}

/// One pushed frame: the triggering event plus the rendered view.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ViewFrame {
    /// The room event that triggered this frame.
    #[serde(flatten)]
    pub event: RoomEvent,
    /// Rendered HTML view of the room.
    pub html: String,
}

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming room views.
///
/// # Route
///
/// `GET /ws/rooms/{room}`
pub async fn ws_room(
    ws: WebSocketUpgrade,
    Path(room): Path<String>,
    Query(query): Query<StreamQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let room = RoomKey::new(room);
    let player = query.player.unwrap_or_else(|| String::from("You"));
    ws.on_upgrade(move |socket| handle_stream(socket, state, room, player))
}

/// Handle the `WebSocket` lifecycle: subscribe to the room's bus and
/// forward a rendered view for each event.
async fn handle_stream(mut socket: WebSocket, state: Arc<AppState>, room: RoomKey, player: String) {
    debug!(room = %room, "viewer connected");

    let mut rx = state.bus.subscribe(&room).await;

    loop {
        tokio::select! {
            // An event landed on the room's bus.
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        let Some(json) = render_frame(&state, &room, &player, event).await else {
                            continue;
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!(room = %room, "viewer disconnected (send failed)");
                            return;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        // Skipped frames are fine; the next one re-reads
                        // the current snapshot anyway.
                        debug!(room = %room, skipped = n, "viewer lagged, skipping ahead");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!(room = %room, "room bus closed, shutting down stream");
                        return;
                    }
                }
            }
            // Check if the client sent a close frame or disconnected.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(room = %room, "viewer disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(room = %room, "viewer disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(room = %room, "websocket error: {e}");
                        return;
                    }
                    _ => {
                        // Ignore text and binary frames from the client.
                    }
                }
            }
        }
    }
}

/// Classify an event, read the current snapshot, and render one frame.
///
/// Returns `None` when the frame cannot be built (no snapshot yet, or
/// the engine failed); the stream simply waits for the next event.
async fn render_frame(
    state: &AppState,
    room: &RoomKey,
    player: &str,
    event: RoomEvent,
) -> Option<String> {
    let snapshot = match state.coordinator.current_snapshot(room).await {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => {
            debug!(room = %room, "event for a room with no snapshot, skipping frame");
            return None;
        }
        Err(e) => {
            warn!(room = %room, error = %e, "snapshot read failed, skipping frame");
            return None;
        }
    };

    let (thinking, game_over) = match &event {
        RoomEvent::OpponentShouldMove => (true, None),
        RoomEvent::OpponentMoved => (false, None),
        RoomEvent::GameOver { reason } => (false, Some(reason.to_string())),
    };
    let html = render::view(room.as_str(), &snapshot, player, thinking, game_over.as_deref());

    match serde_json::to_string(&ViewFrame { event, html }) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!(room = %room, error = %e, "frame serialization failed");
            None
        }
    }
}
