//! Shared type definitions for the Tempo chess session server.
//!
//! This crate holds the vocabulary every other crate speaks:
//!
//! - [`RoomKey`] and [`PlayerId`] -- string-backed keys scoping a game's
//!   state and a player's input log
//! - [`Square`], [`BoardSnapshot`], [`MoveSpec`] -- the board geometry,
//!   the reversible position encoding, and a candidate move
//! - [`TerminalReason`] -- why a game ended
//! - [`RoomEvent`] -- the per-room broadcast payload
//! - [`TurnPhase`] -- the per-room turn-taking state machine
//!
//! It contains no IO and no game rules; legality lives behind the
//! rules oracle seam and persistence behind the session store seam.

pub mod board;
pub mod events;
pub mod keys;
pub mod phase;

pub use board::{
    BoardSnapshot, MoveSpec, PlayerColor, PromotionPiece, Square, SquareError, TerminalReason,
    STARTING_POSITION,
};
pub use events::RoomEvent;
pub use keys::{PlayerId, RoomKey};
pub use phase::TurnPhase;
