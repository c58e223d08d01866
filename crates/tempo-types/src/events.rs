//! Per-room broadcast payloads.

use serde::{Deserialize, Serialize};

use crate::board::TerminalReason;

/// A state-change notification published on a room's event bus.
///
/// Delivery is at-most-once and best-effort: only subscribers listening
/// at publish time see the event, and a lagging subscriber skips to the
/// newest one. Events carry no position data; consumers re-read the
/// current snapshot when they wake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RoomEvent {
    /// The human's move was applied; the automated opponent is due to
    /// reply. Viewers show the position with a "thinking" hint.
    OpponentShouldMove,
    /// The automated opponent's reply was applied.
    OpponentMoved,
    /// A terminal snapshot was appended; the game is over.
    GameOver {
        /// The oracle's classification of the final position.
        reason: TerminalReason,
    },
}
