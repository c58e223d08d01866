//! Shared application state for the HTTP surface.
//!
//! [`AppState`] is the handler-visible view of the engine: the move
//! coordinator for the write path and the event bus for push-stream
//! subscriptions. It is wrapped in [`Arc`] and injected through Axum's
//! `State` extractor.

use std::sync::Arc;

use tempo_engine::{EventBus, MoveCoordinator};

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    /// The engine's write path: clicks in, validated transitions out.
    pub coordinator: Arc<MoveCoordinator>,
    /// Per-room broadcast bus the push streams subscribe to.
    pub bus: Arc<EventBus>,
}

impl AppState {
    /// Bundle the engine collaborators the handlers need.
    #[must_use]
    pub fn new(coordinator: Arc<MoveCoordinator>, bus: Arc<EventBus>) -> Self {
        Self { coordinator, bus }
    }
}
