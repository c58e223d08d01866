//! Axum router construction for the Tempo server.
//!
//! Assembles the REST routes and the `WebSocket` push stream into a
//! single [`Router`] with CORS middleware enabled for cross-origin
//! frontends.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- minimal HTML landing page
/// - `POST /api/rooms` -- create a room
/// - `POST /api/rooms/{room}/clicks` -- submit one click
/// - `GET /ws/rooms/{room}` -- live board view stream
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Landing page
        .route("/", get(handlers::index))
        // REST API
        .route("/api/rooms", post(handlers::create_room))
        .route("/api/rooms/{room}/clicks", post(handlers::submit_click))
        // WebSocket
        .route("/ws/rooms/{room}", get(ws::ws_room))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
