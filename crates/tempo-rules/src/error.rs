//! Error types for the rules oracle seam.

use tempo_types::MoveSpec;

/// Errors an oracle implementation can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// The snapshot encoding could not be parsed into a position.
    #[error("invalid snapshot encoding: {0}")]
    InvalidSnapshot(String),

    /// A move was applied that is not legal in the given position.
    #[error("illegal move {candidate} in position {snapshot}")]
    IllegalMove {
        /// The rejected candidate move.
        candidate: MoveSpec,
        /// The encoding of the position it was attempted in.
        snapshot: String,
    },
}
