//! REST endpoint handlers for the Tempo server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML landing page |
//! | `POST` | `/api/rooms` | Create a room and seed the session |
//! | `POST` | `/api/rooms/{room}/clicks` | Submit one raw click |
//!
//! The click endpoint deliberately tells the submitter nothing: every
//! well-formed request answers `204 No Content` whether the click was
//! ignored, recorded, rejected, or applied. Board state travels to
//! viewers only over the push stream.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use rand::seq::IndexedRandom;
use tempo_types::{BoardSnapshot, PlayerId, RoomKey, Square};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Built-in pool of room-key stems. Uniqueness comes from the appended
/// id suffix, not from the pool.
const ROOM_POOL: &[&str] = &[
    "amber", "cedar", "cobalt", "coral", "crimson", "ember", "fern", "indigo", "ivory", "jade",
    "maroon", "moss", "ochre", "onyx", "pearl", "rust", "saffron", "sage", "slate", "teal",
];

/// Built-in pool of display names for the human player.
const NAME_POOL: &[&str] = &[
    "Ada", "Bram", "Cleo", "Dara", "Edda", "Finn", "Greta", "Hollis", "Ines", "Juno", "Kai",
    "Lior", "Mara", "Nadia", "Orin", "Petra", "Quill", "Rowan", "Sel", "Tova", "Uma", "Vesper",
    "Wren", "Yuri", "Zora",
];

/// Request body for `POST /api/rooms/{room}/clicks`.
#[derive(Debug, serde::Deserialize)]
pub struct ClickBody {
    /// The submitting player's identifier.
    pub player: String,
    /// The clicked square index, 0 = a1 through 63 = h8.
    pub square: u8,
}

/// Response body for `POST /api/rooms`.
#[derive(Debug, serde::Serialize)]
pub struct CreatedRoom {
    /// The generated room key.
    pub room: RoomKey,
    /// The generated display name for the human player.
    pub player: PlayerId,
    /// The seeded starting snapshot.
    pub snapshot: BoardSnapshot,
}

/// Serve the minimal HTML landing page.
pub async fn index() -> impl IntoResponse {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Tempo</title>
    <style>
        body {
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }
        h1 { color: #58a6ff; margin-bottom: 0.25rem; }
        .subtitle { color: #8b949e; margin-top: 0; }
        a { color: #58a6ff; text-decoration: none; }
        a:hover { text-decoration: underline; }
        ul { list-style: none; padding: 0; }
        li { padding: 0.3rem 0; }
        code { color: #7ee787; }
    </style>
</head>
<body>
    <h1>Tempo</h1>
    <p class="subtitle">Live chess rooms with a delayed automated opponent</p>
    <ul>
        <li><code>POST /api/rooms</code> create a room</li>
        <li><code>POST /api/rooms/{room}/clicks</code> submit a click</li>
        <li><code>GET /ws/rooms/{room}</code> live board stream</li>
    </ul>
</body>
</html>"#,
    )
}

/// Create a room: generate a room key and a player name, seed the
/// session with the starting position.
///
/// # Route
///
/// `POST /api/rooms`
///
/// # Errors
///
/// Returns [`ApiError`] if the store write fails.
pub async fn create_room(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CreatedRoom>, ApiError> {
    // Keep the rng out of scope before the first await.
    let (room, player) = {
        let mut rng = rand::rng();
        let stem = ROOM_POOL.choose(&mut rng).copied().unwrap_or("amber");
        let name = NAME_POOL.choose(&mut rng).copied().unwrap_or("Wren");
        let id = Uuid::new_v4().simple().to_string();
        let suffix = id.get(..4).unwrap_or("0000");
        (RoomKey::new(format!("{stem}-{suffix}")), PlayerId::new(name))
    };

    let snapshot = state.coordinator.create_session(&room, &player).await?;
    info!(room = %room, player = %player, "room created");

    Ok(Json(CreatedRoom {
        room,
        player,
        snapshot,
    }))
}

/// Submit one raw click for a room.
///
/// # Route
///
/// `POST /api/rooms/{room}/clicks`
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] (`400`) if the square index is
/// out of range, or [`ApiError::Engine`] if the engine fails. Every
/// other path is `204 No Content`.
pub async fn submit_click(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
    Json(body): Json<ClickBody>,
) -> Result<StatusCode, ApiError> {
    let square =
        Square::try_new(body.square).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let room = RoomKey::new(room);
    let player = PlayerId::new(body.player);

    let outcome = state.coordinator.submit_click(&room, &player, square).await?;
    debug!(room = %room, player = %player, square = %square, ?outcome, "click handled");

    Ok(StatusCode::NO_CONTENT)
}
