//! Per-room control state: turn phase, exclusive lock, registered
//! human.
//!
//! The directory holds state that is cheap to rebuild and therefore
//! deliberately not persisted: which player owns the white pieces,
//! where the room sits in its turn cycle, and the lock that serializes
//! writers. Rooms recovered from a persistent store after a restart are
//! re-registered lazily on their next click.

use std::collections::HashMap;
use std::sync::Arc;

use tempo_types::{PlayerColor, PlayerId, RoomKey, TurnPhase};
use tokio::sync::{Mutex, RwLock};

/// Control state for one room.
#[derive(Debug, Clone)]
struct RoomEntry {
    /// Serializes the read-validate-append critical section across the
    /// coordinator and the opponent.
    lock: Arc<Mutex<()>>,
    phase: TurnPhase,
    human: PlayerId,
    human_color: PlayerColor,
}

/// Registry of per-room control state.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: RwLock<HashMap<RoomKey, RoomEntry>>,
}

impl RoomDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a room with its human player.
    ///
    /// Registering an existing key replaces its control state (room-key
    /// collisions are assumed away, not guarded).
    pub async fn register(&self, room: &RoomKey, human: &PlayerId, human_color: PlayerColor) {
        let mut rooms = self.rooms.write().await;
        rooms.insert(
            room.clone(),
            RoomEntry {
                lock: Arc::new(Mutex::new(())),
                phase: TurnPhase::AwaitingFirstClick,
                human: human.clone(),
                human_color,
            },
        );
    }

    /// Register a room only if it is not already present.
    pub async fn register_if_absent(
        &self,
        room: &RoomKey,
        human: &PlayerId,
        human_color: PlayerColor,
    ) {
        let mut rooms = self.rooms.write().await;
        rooms.entry(room.clone()).or_insert_with(|| RoomEntry {
            lock: Arc::new(Mutex::new(())),
            phase: TurnPhase::AwaitingFirstClick,
            human: human.clone(),
            human_color,
        });
    }

    /// The room's exclusive lock handle, or `None` for an unknown room.
    pub async fn lock_handle(&self, room: &RoomKey) -> Option<Arc<Mutex<()>>> {
        let rooms = self.rooms.read().await;
        rooms.get(room).map(|entry| Arc::clone(&entry.lock))
    }

    /// The room's current turn phase.
    pub async fn phase(&self, room: &RoomKey) -> Option<TurnPhase> {
        let rooms = self.rooms.read().await;
        rooms.get(room).map(|entry| entry.phase)
    }

    /// Advance the room's turn phase. No-op for an unknown room.
    pub async fn set_phase(&self, room: &RoomKey, phase: TurnPhase) {
        let mut rooms = self.rooms.write().await;
        if let Some(entry) = rooms.get_mut(room) {
            entry.phase = phase;
        }
    }

    /// The registered human player and their color.
    pub async fn human(&self, room: &RoomKey) -> Option<(PlayerId, PlayerColor)> {
        let rooms = self.rooms.read().await;
        rooms
            .get(room)
            .map(|entry| (entry.human.clone(), entry.human_color))
    }
}
