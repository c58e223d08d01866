//! Move coordination: clicks in, validated state transitions out.
//!
//! The coordinator owns the write path for a session. A click is always
//! recorded to the player's append-only input log; whether it also
//! drives a move depends on the room's turn phase and whose turn the
//! oracle says it is. Illegal candidates are rejected silently -- the
//! submitter learns nothing synchronously, state travels only through
//! the push stream. That gap is inherited behavior, kept deliberately.

use std::sync::Arc;

use tempo_rules::RulesOracle;
use tempo_store::SessionStore;
use tempo_types::{
    BoardSnapshot, MoveSpec, PlayerColor, PlayerId, PromotionPiece, RoomEvent, RoomKey, Square,
    TerminalReason, TurnPhase,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::bus::EventBus;
use crate::error::EngineError;
use crate::opponent::{AutomatedOpponent, OpponentConfig, OpponentFailure};
use crate::rooms::RoomDirectory;

/// What a single click submission did.
///
/// The HTTP surface collapses all of these to the same response; the
/// outcome exists so logs and tests can observe what the client cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Unknown room or terminal session; nothing was recorded.
    Ignored,
    /// The click was recorded but no move was attempted.
    Recorded,
    /// A complete gesture produced an illegal candidate; it was
    /// silently dropped and the gesture reset.
    Rejected,
    /// A legal move was applied and a new snapshot appended.
    Applied {
        /// The move that was applied.
        mv: MoveSpec,
        /// The terminal classification of the new snapshot, if the
        /// move ended the game.
        terminal: Option<TerminalReason>,
    },
}

/// Resolves raw player input into validated, persisted, broadcast
/// game-state transitions.
pub struct MoveCoordinator {
    store: Arc<dyn SessionStore>,
    rules: Arc<dyn RulesOracle>,
    bus: Arc<EventBus>,
    rooms: Arc<RoomDirectory>,
    opponent: AutomatedOpponent,
}

impl MoveCoordinator {
    /// Wire a coordinator from its injected collaborators.
    ///
    /// Returns the coordinator together with the receiving end of the
    /// automated opponent's failure channel; the owner is expected to
    /// drain it.
    #[must_use]
    pub fn new(
        store: Arc<dyn SessionStore>,
        rules: Arc<dyn RulesOracle>,
        bus: Arc<EventBus>,
        config: OpponentConfig,
    ) -> (Self, mpsc::UnboundedReceiver<OpponentFailure>) {
        let rooms = Arc::new(RoomDirectory::new());
        let (opponent, failures) = AutomatedOpponent::new(
            Arc::clone(&store),
            Arc::clone(&rules),
            Arc::clone(&bus),
            Arc::clone(&rooms),
            config,
        );
        (
            Self {
                store,
                rules,
                bus,
                rooms,
                opponent,
            },
            failures,
        )
    }

    /// Create a session: register the room with its human player (who
    /// takes the white pieces) and seed the log with the starting
    /// position.
    ///
    /// Creating a room whose key already exists prepends a fresh
    /// starting position onto the existing log; key collisions are
    /// assumed away, not guarded.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the store write fails.
    pub async fn create_session(
        &self,
        room: &RoomKey,
        human: &PlayerId,
    ) -> Result<BoardSnapshot, EngineError> {
        self.rooms.register(room, human, PlayerColor::White).await;
        let snapshot = self.rules.starting_position();
        self.store.append_snapshot(room, snapshot.clone()).await?;
        info!(room = %room, player = %human, "session created");
        Ok(snapshot)
    }

    /// Handle one raw click from a player.
    ///
    /// The pipeline, in order: no-op for unknown or finished rooms;
    /// record the click; stop unless the submitter is the room's human
    /// and the human's side is on move; advance the turn state machine,
    /// attempting a move only when this click completes a gesture.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the store or oracle fails. Illegal
    /// candidates are not errors.
    pub async fn submit_click(
        &self,
        room: &RoomKey,
        player: &PlayerId,
        square: Square,
    ) -> Result<ClickOutcome, EngineError> {
        // Unknown room with no persisted state: nothing to do. A room
        // that exists only in the store (process restart) is lazily
        // re-registered to the first clicker.
        if self.rooms.lock_handle(room).await.is_none() {
            if self.store.current_snapshot(room).await?.is_none() {
                return Ok(ClickOutcome::Ignored);
            }
            self.rooms
                .register_if_absent(room, player, PlayerColor::White)
                .await;
        }
        let Some(lock) = self.rooms.lock_handle(room).await else {
            return Ok(ClickOutcome::Ignored);
        };

        // Everything below is the per-room critical section: one
        // writer at a time reads, validates, and appends.
        let _guard = lock.lock().await;

        let phase = self
            .rooms
            .phase(room)
            .await
            .unwrap_or(TurnPhase::AwaitingFirstClick);
        if phase.is_terminal() {
            return Ok(ClickOutcome::Ignored);
        }

        let Some(snapshot) = self.store.current_snapshot(room).await? else {
            return Ok(ClickOutcome::Ignored);
        };
        if let Some(reason) = self.rules.terminal_reason(&snapshot)? {
            // The log can be ahead of the directory (e.g. after a
            // restart); converge and ignore.
            debug!(room = %room, %reason, "click against finished game ignored");
            self.rooms.set_phase(room, TurnPhase::Terminal).await;
            return Ok(ClickOutcome::Ignored);
        }

        self.store.record_click(player, square).await?;
        debug!(room = %room, player = %player, square = %square, "click recorded");

        let Some((human, human_color)) = self.rooms.human(room).await else {
            return Ok(ClickOutcome::Recorded);
        };
        let to_move = self.rules.side_to_move(&snapshot)?;
        if *player != human || to_move != human_color {
            // Clicks from viewers or out-of-turn clicks are stored but
            // never acted on.
            return Ok(ClickOutcome::Recorded);
        }

        match phase {
            TurnPhase::AwaitingFirstClick => {
                self.rooms.set_phase(room, TurnPhase::AwaitingSecondClick).await;
                Ok(ClickOutcome::Recorded)
            }
            TurnPhase::AwaitingSecondClick => {
                self.attempt_gesture(room, player, &snapshot).await
            }
            TurnPhase::AwaitingOpponentReply | TurnPhase::Terminal => {
                Ok(ClickOutcome::Recorded)
            }
        }
    }

    /// Complete a gesture: read the last two clicks, resolve the
    /// candidate, validate, and on success append and broadcast.
    async fn attempt_gesture(
        &self,
        room: &RoomKey,
        player: &PlayerId,
        snapshot: &BoardSnapshot,
    ) -> Result<ClickOutcome, EngineError> {
        // Whatever happens, this gesture is spent.
        self.rooms.set_phase(room, TurnPhase::AwaitingFirstClick).await;

        let Some((newer, older)) = self.store.last_two_clicks(player).await? else {
            return Ok(ClickOutcome::Recorded);
        };
        let candidate = self.resolve_candidate(snapshot, older, newer)?;

        if !self.rules.is_legal(snapshot, &candidate)? {
            debug!(room = %room, candidate = %candidate, "illegal candidate dropped");
            return Ok(ClickOutcome::Rejected);
        }

        let next = self.rules.apply(snapshot, &candidate)?;
        self.store.append_snapshot(room, next.clone()).await?;
        info!(room = %room, mv = %candidate, "move applied");

        match self.rules.terminal_reason(&next)? {
            Some(reason) => {
                self.rooms.set_phase(room, TurnPhase::Terminal).await;
                self.bus.publish(room, RoomEvent::GameOver { reason }).await;
                info!(room = %room, %reason, "game over");
                Ok(ClickOutcome::Applied {
                    mv: candidate,
                    terminal: Some(reason),
                })
            }
            None => {
                self.rooms
                    .set_phase(room, TurnPhase::AwaitingOpponentReply)
                    .await;
                self.bus.publish(room, RoomEvent::OpponentShouldMove).await;
                // Fire-and-forget by policy: the handle is dropped here,
                // failures surface on the opponent's failure channel.
                let _reply = self.opponent.trigger(room.clone());
                Ok(ClickOutcome::Applied {
                    mv: candidate,
                    terminal: None,
                })
            }
        }
    }

    /// Build the candidate move for a click pair: destination is the
    /// newer click, source the older. If the pair only matches
    /// promotion moves, auto-promote to a queen; no alternate choice is
    /// offered.
    fn resolve_candidate(
        &self,
        snapshot: &BoardSnapshot,
        older: Square,
        newer: Square,
    ) -> Result<MoveSpec, EngineError> {
        let mut candidate = MoveSpec {
            from: older,
            to: newer,
            promotion: None,
        };
        let promotes = self
            .rules
            .legal_moves(snapshot)?
            .iter()
            .any(|m| m.from == candidate.from && m.to == candidate.to && m.promotion.is_some());
        if promotes {
            candidate.promotion = Some(PromotionPiece::Queen);
        }
        Ok(candidate)
    }

    /// Manually trigger the automated opponent for a room.
    ///
    /// Used by the coordinator itself after a successful human move;
    /// exposed so owners can re-trigger and observe the task handle.
    pub fn trigger_opponent(&self, room: RoomKey) -> JoinHandle<()> {
        self.opponent.trigger(room)
    }

    /// The newest snapshot for a room, if any.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the store read fails.
    pub async fn current_snapshot(
        &self,
        room: &RoomKey,
    ) -> Result<Option<BoardSnapshot>, EngineError> {
        Ok(self.store.current_snapshot(room).await?)
    }

    /// The full newest-first snapshot log for a room.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the store read fails.
    pub async fn snapshot_log(&self, room: &RoomKey) -> Result<Vec<BoardSnapshot>, EngineError> {
        Ok(self.store.snapshot_log(room).await?)
    }

    /// The room's current turn phase, if the room is registered.
    pub async fn phase(&self, room: &RoomKey) -> Option<TurnPhase> {
        self.rooms.phase(room).await
    }
}
