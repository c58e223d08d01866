//! The automated opponent: a delayed, detached reply task.
//!
//! Each trigger spawns one unit of work that sleeps for the configured
//! thinking delay, then -- under the room's exclusive lock -- re-reads
//! the head snapshot, bails out if the game has ended meanwhile, and
//! otherwise applies one uniformly random legal move. The delay is a
//! plain sleep, not a cancellable deadline: once scheduled the task
//! always runs to its wake-time terminal check.
//!
//! Failures are never retried and never reach a viewer: they are logged
//! and pushed onto a failure channel the owning process drains.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::IndexedRandom;
use tempo_rules::RulesOracle;
use tempo_store::SessionStore;
use tempo_types::{RoomEvent, RoomKey, TurnPhase};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bus::EventBus;
use crate::error::EngineError;
use crate::rooms::RoomDirectory;

/// Tuning for the automated opponent.
#[derive(Debug, Clone)]
pub struct OpponentConfig {
    /// Simulated thinking time between trigger and reply.
    pub delay: Duration,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(2),
        }
    }
}

/// A reply task that failed, reported on the failure channel.
#[derive(Debug)]
pub struct OpponentFailure {
    /// The room the reply was for.
    pub room: RoomKey,
    /// What went wrong.
    pub error: EngineError,
}

/// Shared innards captured by each spawned reply task.
struct OpponentInner {
    store: Arc<dyn SessionStore>,
    rules: Arc<dyn RulesOracle>,
    bus: Arc<EventBus>,
    rooms: Arc<RoomDirectory>,
    delay: Duration,
    failures: mpsc::UnboundedSender<OpponentFailure>,
}

/// Background producer of reply moves for the black pieces.
#[derive(Clone)]
pub struct AutomatedOpponent {
    inner: Arc<OpponentInner>,
}

impl AutomatedOpponent {
    /// Wire the opponent from its injected collaborators.
    ///
    /// Returns the opponent together with the receiving end of its
    /// failure channel.
    #[must_use]
    pub fn new(
        store: Arc<dyn SessionStore>,
        rules: Arc<dyn RulesOracle>,
        bus: Arc<EventBus>,
        rooms: Arc<RoomDirectory>,
        config: OpponentConfig,
    ) -> (Self, mpsc::UnboundedReceiver<OpponentFailure>) {
        let (failures, failure_rx) = mpsc::unbounded_channel();
        (
            Self {
                inner: Arc::new(OpponentInner {
                    store,
                    rules,
                    bus,
                    rooms,
                    delay: config.delay,
                    failures,
                }),
            },
            failure_rx,
        )
    }

    /// Schedule a reply for `room` as a detached background task.
    ///
    /// Triggering a finished (or unknown) room is a no-op at wake time,
    /// so repeated triggers are harmless.
    pub fn trigger(&self, room: RoomKey) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            if let Err(error) = Self::play_reply(&inner, &room).await {
                warn!(room = %room, %error, "opponent reply failed, dropping");
                // The receiver may be gone during shutdown; that loss
                // is within the fire-and-forget contract.
                let _ = inner.failures.send(OpponentFailure { room, error });
            }
        })
    }

    /// The reply body: terminal check, uniform choice, append,
    /// broadcast.
    async fn play_reply(inner: &OpponentInner, room: &RoomKey) -> Result<(), EngineError> {
        let Some(lock) = inner.rooms.lock_handle(room).await else {
            return Ok(());
        };
        let _guard = lock.lock().await;

        let Some(snapshot) = inner.store.current_snapshot(room).await? else {
            return Ok(());
        };
        if inner.rules.terminal_reason(&snapshot)?.is_some() {
            // The human may have already ended the game, or this is a
            // repeated trigger.
            debug!(room = %room, "reply skipped, game already over");
            inner.rooms.set_phase(room, TurnPhase::Terminal).await;
            return Ok(());
        }

        let moves = inner.rules.legal_moves(&snapshot)?;
        let reply = {
            let mut rng = rand::rng();
            moves.choose(&mut rng).copied()
        };
        let Some(reply) = reply else {
            return Ok(());
        };

        let next = inner.rules.apply(&snapshot, &reply)?;
        inner.store.append_snapshot(room, next.clone()).await?;
        info!(room = %room, mv = %reply, "opponent replied");

        match inner.rules.terminal_reason(&next)? {
            Some(reason) => {
                inner.rooms.set_phase(room, TurnPhase::Terminal).await;
                inner
                    .bus
                    .publish(room, RoomEvent::GameOver { reason })
                    .await;
                info!(room = %room, %reason, "game over");
            }
            None => {
                inner
                    .rooms
                    .set_phase(room, TurnPhase::AwaitingFirstClick)
                    .await;
                inner.bus.publish(room, RoomEvent::OpponentMoved).await;
            }
        }
        Ok(())
    }
}
