//! Session synchronization engine for the Tempo chess server.
//!
//! This crate turns discrete player clicks into validated game-state
//! transitions, persists them through the injected session store, and
//! propagates them to live viewers through a per-room broadcast bus --
//! including the delayed scheduling of the automated opponent's reply.
//!
//! # Components
//!
//! - [`MoveCoordinator`] -- resolves a click pair into a candidate move,
//!   validates it against the rules oracle, appends the result, decides
//!   what to broadcast
//! - [`AutomatedOpponent`] -- detached background task that plays a
//!   uniformly random legal reply after a fixed delay
//! - [`EventBus`] -- per-room publish/subscribe over bounded broadcast
//!   channels; at-most-once, no replay
//! - [`RoomDirectory`] -- per-room turn phase, exclusive lock, and
//!   registered human player
//!
//! # Consistency
//!
//! There is exactly one critical section per room: the read-validate-
//! append sequence runs under the room's exclusive lock in both the
//! coordinator and the opponent, so two near-simultaneous submissions
//! can never both append against the same stale snapshot.

pub mod bus;
pub mod coordinator;
pub mod error;
pub mod opponent;
pub mod rooms;

pub use bus::EventBus;
pub use coordinator::{ClickOutcome, MoveCoordinator};
pub use error::EngineError;
pub use opponent::{AutomatedOpponent, OpponentConfig, OpponentFailure};
pub use rooms::RoomDirectory;
