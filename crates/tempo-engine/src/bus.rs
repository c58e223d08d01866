//! Per-room publish/subscribe event bus.
//!
//! Each room gets its own bounded [`broadcast`] channel. Publishing is
//! non-blocking and best-effort: events reach only the subscribers
//! listening at publish time, nothing is persisted or replayed, and a
//! subscriber that falls behind skips to the newest event. Missed
//! intermediate states are acceptable -- consumers re-read the current
//! snapshot on every event, so the latest one is always enough.

use std::collections::HashMap;

use tempo_types::{RoomEvent, RoomKey};
use tokio::sync::{broadcast, RwLock};

/// Capacity of each room's broadcast channel.
///
/// A subscriber that falls behind by more than this many events
/// receives a [`broadcast::error::RecvError::Lagged`] and resumes from
/// the newest event.
const BROADCAST_CAPACITY: usize = 32;

/// Per-room broadcast channels keyed by room.
///
/// Unsubscription is the receiver's drop: a consumer that returns (or
/// is cancelled) on any path releases its subscription automatically.
#[derive(Debug, Default)]
pub struct EventBus {
    channels: RwLock<HashMap<RoomKey, broadcast::Sender<RoomEvent>>>,
}

impl EventBus {
    /// Create a bus with no rooms.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a room's events.
    ///
    /// The returned receiver yields only events published after this
    /// call; there is no backlog replay.
    pub async fn subscribe(&self, room: &RoomKey) -> broadcast::Receiver<RoomEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(room.clone())
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .subscribe()
    }

    /// Publish an event to a room's current subscribers.
    ///
    /// Returns the number of subscribers the event reached. Zero is
    /// normal -- it means nobody was listening, and the event is simply
    /// lost.
    pub async fn publish(&self, room: &RoomKey, event: RoomEvent) -> usize {
        let channels = self.channels.read().await;
        channels
            .get(room)
            // send errs only when there are zero receivers.
            .map_or(0, |sender| sender.send(event).unwrap_or(0))
    }
}
