//! Session store seam for the Tempo session server.
//!
//! The store is a pure keyed append-only log abstraction with no game
//! semantics: one newest-first snapshot log per room, one newest-first
//! raw-click log per player. Neither log is ever trimmed or rewritten
//! within this crate's scope.
//!
//! Two implementations are provided:
//!
//! - [`MemoryStore`] -- in-process, for tests and single-process runs
//! - [`RedisStore`] -- backed by a Redis-compatible server via
//!   [`fred`], using the same list layout the engine expects
//!
//! Components take an injected `Arc<dyn SessionStore>`; nothing in the
//! workspace reaches for an ambient store handle.

pub mod error;
pub mod memory;
pub mod redis;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use redis::RedisStore;

use async_trait::async_trait;
use tempo_types::{BoardSnapshot, PlayerId, RoomKey, Square};

/// Durable, append-only log of board states per room, plus a per-player
/// log of raw input clicks.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The newest snapshot in the room's log, or `None` for an unknown
    /// room.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend read fails.
    async fn current_snapshot(&self, room: &RoomKey) -> Result<Option<BoardSnapshot>, StoreError>;

    /// Atomically prepend a snapshot to the room's log. Prior entries
    /// are never overwritten or removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend write fails.
    async fn append_snapshot(
        &self,
        room: &RoomKey,
        snapshot: BoardSnapshot,
    ) -> Result<(), StoreError>;

    /// Append a raw square index to the player's input log.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend write fails.
    async fn record_click(&self, player: &PlayerId, square: Square) -> Result<(), StoreError>;

    /// Read, without consuming, the two most recent clicks as
    /// `(newer, older)`. `None` when fewer than two clicks exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend read fails or a stored
    /// entry is corrupt.
    async fn last_two_clicks(
        &self,
        player: &PlayerId,
    ) -> Result<Option<(Square, Square)>, StoreError>;

    /// The full snapshot log for a room, newest first. Empty for an
    /// unknown room.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend read fails.
    async fn snapshot_log(&self, room: &RoomKey) -> Result<Vec<BoardSnapshot>, StoreError>;
}
