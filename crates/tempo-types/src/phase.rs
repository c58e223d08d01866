//! The per-room turn-taking state machine.
//!
//! Turn intent is tracked explicitly instead of being inferred from the
//! click log: a gesture is two clicks, and only the transition out of
//! [`AwaitingSecondClick`](TurnPhase::AwaitingSecondClick) attempts a
//! move. The phase lives in the engine's room directory, not in the
//! store; it is derivable state and is rebuilt when a room is
//! re-registered.

use serde::{Deserialize, Serialize};

/// Where a room currently sits in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// The human is on move and has not yet picked a piece.
    AwaitingFirstClick,
    /// One click is banked; the next click completes the gesture and
    /// triggers a legality check.
    AwaitingSecondClick,
    /// The human's move was applied; the automated opponent owes a
    /// reply.
    AwaitingOpponentReply,
    /// The head snapshot is terminal; no further transitions occur.
    Terminal,
}

impl TurnPhase {
    /// Whether a click from the side to move may advance this phase.
    ///
    /// Clicks are always recorded; this guards whether a recorded click
    /// also drives a transition.
    #[must_use]
    pub const fn accepts_gesture(self) -> bool {
        matches!(self, Self::AwaitingFirstClick | Self::AwaitingSecondClick)
    }

    /// Whether the room has reached its end state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gesture_phases_accept_clicks() {
        assert!(TurnPhase::AwaitingFirstClick.accepts_gesture());
        assert!(TurnPhase::AwaitingSecondClick.accepts_gesture());
        assert!(!TurnPhase::AwaitingOpponentReply.accepts_gesture());
        assert!(!TurnPhase::Terminal.accepts_gesture());
    }

    #[test]
    fn terminal_is_absorbing() {
        assert!(TurnPhase::Terminal.is_terminal());
        assert!(!TurnPhase::AwaitingFirstClick.is_terminal());
    }
}
