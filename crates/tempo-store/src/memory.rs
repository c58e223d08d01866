//! In-process session store.
//!
//! Logs live in a [`tokio::sync::RwLock`]-guarded map. Suitable for
//! tests and single-process deployments; state does not survive a
//! restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tempo_types::{BoardSnapshot, PlayerId, RoomKey, Square};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::SessionStore;

/// Interior state: logs are kept oldest-first and read back to front,
/// so appends are O(1) and the newest-first contract is preserved on
/// every read path.
#[derive(Debug, Default)]
struct MemoryInner {
    snapshots: HashMap<RoomKey, Vec<BoardSnapshot>>,
    clicks: HashMap<PlayerId, Vec<Square>>,
}

/// In-memory [`SessionStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn current_snapshot(&self, room: &RoomKey) -> Result<Option<BoardSnapshot>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .snapshots
            .get(room)
            .and_then(|log| log.last())
            .cloned())
    }

    async fn append_snapshot(
        &self,
        room: &RoomKey,
        snapshot: BoardSnapshot,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .snapshots
            .entry(room.clone())
            .or_default()
            .push(snapshot);
        Ok(())
    }

    async fn record_click(&self, player: &PlayerId, square: Square) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.clicks.entry(player.clone()).or_default().push(square);
        Ok(())
    }

    async fn last_two_clicks(
        &self,
        player: &PlayerId,
    ) -> Result<Option<(Square, Square)>, StoreError> {
        let inner = self.inner.read().await;
        let Some(log) = inner.clicks.get(player) else {
            return Ok(None);
        };
        let mut newest = log.iter().rev();
        match (newest.next(), newest.next()) {
            (Some(newer), Some(older)) => Ok(Some((*newer, *older))),
            _ => Ok(None),
        }
    }

    async fn snapshot_log(&self, room: &RoomKey) -> Result<Vec<BoardSnapshot>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .snapshots
            .get(room)
            .map(|log| log.iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn sq(index: u8) -> Square {
        Square::try_new(index).unwrap()
    }

    #[tokio::test]
    async fn unknown_room_has_no_snapshot() {
        let store = MemoryStore::new();
        let room = RoomKey::new("missing");
        assert!(store.current_snapshot(&room).await.unwrap().is_none());
        assert!(store.snapshot_log(&room).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_is_newest_first_and_monotone() {
        let store = MemoryStore::new();
        let room = RoomKey::new("cedar-7f2a");
        let first = BoardSnapshot::starting();
        let second = BoardSnapshot::new("after-one-move");

        store.append_snapshot(&room, first.clone()).await.unwrap();
        store.append_snapshot(&room, second.clone()).await.unwrap();

        assert_eq!(
            store.current_snapshot(&room).await.unwrap(),
            Some(second.clone())
        );
        assert_eq!(store.snapshot_log(&room).await.unwrap(), vec![second, first]);
    }

    #[tokio::test]
    async fn last_two_clicks_reads_without_consuming() {
        let store = MemoryStore::new();
        let player = PlayerId::new("Wren");

        assert!(store.last_two_clicks(&player).await.unwrap().is_none());
        store.record_click(&player, sq(12)).await.unwrap();
        assert!(store.last_two_clicks(&player).await.unwrap().is_none());
        store.record_click(&player, sq(28)).await.unwrap();

        // Newer first, and repeated reads see the same pair.
        let pair = store.last_two_clicks(&player).await.unwrap();
        assert_eq!(pair, Some((sq(28), sq(12))));
        assert_eq!(store.last_two_clicks(&player).await.unwrap(), pair);

        store.record_click(&player, sq(3)).await.unwrap();
        assert_eq!(
            store.last_two_clicks(&player).await.unwrap(),
            Some((sq(3), sq(28)))
        );
    }

    #[tokio::test]
    async fn rooms_and_players_are_isolated() {
        let store = MemoryStore::new();
        let room_a = RoomKey::new("a");
        let room_b = RoomKey::new("b");
        store
            .append_snapshot(&room_a, BoardSnapshot::starting())
            .await
            .unwrap();
        assert!(store.current_snapshot(&room_b).await.unwrap().is_none());

        let wren = PlayerId::new("Wren");
        let lark = PlayerId::new("Lark");
        store.record_click(&wren, sq(1)).await.unwrap();
        store.record_click(&wren, sq(2)).await.unwrap();
        assert!(store.last_two_clicks(&lark).await.unwrap().is_none());
    }
}
