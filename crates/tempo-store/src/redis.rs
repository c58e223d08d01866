//! Redis-compatible session store.
//!
//! Logs are Redis lists written with `LPUSH`, so index 0 is always the
//! newest entry and the append-only contract maps directly onto list
//! prepends.
//!
//! # Key Patterns
//!
//! | Pattern | Type | Description |
//! |---------|------|-------------|
//! | `room:{key}:snapshots` | List | Newest-first board snapshot log |
//! | `player:{id}:clicks` | List | Newest-first raw click log |

use async_trait::async_trait;
use fred::prelude::*;
use tempo_types::{BoardSnapshot, PlayerId, RoomKey, Square};

use crate::error::StoreError;
use crate::SessionStore;

/// [`SessionStore`] backed by a Redis-compatible server.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    /// Connect to a Redis-compatible server at the given URL.
    ///
    /// The URL follows the Redis scheme: `redis://host:port` or
    /// `redis://host:port/db`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the URL cannot be parsed, or
    /// [`StoreError::Redis`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let config =
            Config::from_url(url).map_err(|e| StoreError::Config(format!("invalid URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!("Connected to session store backend");
        Ok(Self { client })
    }

    fn snapshot_key(room: &RoomKey) -> String {
        format!("room:{room}:snapshots")
    }

    fn click_key(player: &PlayerId) -> String {
        format!("player:{player}:clicks")
    }

    fn parse_click(key: &str, raw: &str) -> Result<Square, StoreError> {
        let index = raw.parse::<u8>().map_err(|e| StoreError::Corrupt {
            key: key.to_owned(),
            message: format!("click entry {raw:?} is not a square index: {e}"),
        })?;
        Square::try_new(index).map_err(|e| StoreError::Corrupt {
            key: key.to_owned(),
            message: e.to_string(),
        })
    }

    /// Flush all keys from the backend.
    ///
    /// **WARNING:** This deletes all data. Only use for testing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Redis`] if the flush fails.
    pub async fn flush_all(&self) -> Result<(), StoreError> {
        let _: () = self.client.flushall(false).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for RedisStore {
    async fn current_snapshot(&self, room: &RoomKey) -> Result<Option<BoardSnapshot>, StoreError> {
        let key = Self::snapshot_key(room);
        let head: Option<String> = self.client.lindex(&key, 0).await?;
        Ok(head.map(BoardSnapshot::new))
    }

    async fn append_snapshot(
        &self,
        room: &RoomKey,
        snapshot: BoardSnapshot,
    ) -> Result<(), StoreError> {
        let key = Self::snapshot_key(room);
        let _: u64 = self.client.lpush(&key, snapshot.as_str()).await?;
        Ok(())
    }

    async fn record_click(&self, player: &PlayerId, square: Square) -> Result<(), StoreError> {
        let key = Self::click_key(player);
        let _: u64 = self.client.lpush(&key, i64::from(square.index())).await?;
        Ok(())
    }

    async fn last_two_clicks(
        &self,
        player: &PlayerId,
    ) -> Result<Option<(Square, Square)>, StoreError> {
        let key = Self::click_key(player);
        let entries: Vec<String> = self.client.lrange(&key, 0, 1).await?;
        let mut newest = entries.iter();
        match (newest.next(), newest.next()) {
            (Some(newer), Some(older)) => Ok(Some((
                Self::parse_click(&key, newer)?,
                Self::parse_click(&key, older)?,
            ))),
            _ => Ok(None),
        }
    }

    async fn snapshot_log(&self, room: &RoomKey) -> Result<Vec<BoardSnapshot>, StoreError> {
        let key = Self::snapshot_key(room);
        let entries: Vec<String> = self.client.lrange(&key, 0, -1).await?;
        Ok(entries.into_iter().map(BoardSnapshot::new).collect())
    }
}
