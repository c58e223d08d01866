//! HTTP and `WebSocket` surface for the Tempo chess service.
//!
//! This crate exposes the engine over Axum:
//!
//! - **REST endpoints** for creating a room and submitting raw clicks
//!   (`POST /api/rooms`, `POST /api/rooms/{room}/clicks`)
//! - **`WebSocket` push stream** (`GET /ws/rooms/{room}`) delivering a
//!   freshly rendered board view for every room event via
//!   [`tokio::sync::broadcast`]
//! - **Minimal HTML landing page** (`GET /`)
//!
//! # Architecture
//!
//! Handlers never hold game state: the write path goes through the
//! engine's coordinator and the read path through the per-room event
//! bus. The click endpoint is deliberately mute -- every well-formed
//! request answers `204 No Content` and the resulting board travels to
//! viewers only over the push stream.

pub mod config;
pub mod error;
pub mod handlers;
pub mod render;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use config::{ConfigError, ServerConfig};
pub use router::build_router;
pub use server::{start_server, ServerError};
pub use state::AppState;
