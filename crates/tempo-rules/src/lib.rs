//! Rules oracle seam for the Tempo session server.
//!
//! The session engine treats the rules of chess as an external
//! collaborator: legality checking, move application, and terminal
//! classification all sit behind the [`RulesOracle`] trait. The engine
//! injects an `Arc<dyn RulesOracle>` and never inspects a snapshot
//! itself.
//!
//! [`StandardRules`] is the production implementation, backed by the
//! `shakmaty` library with FEN as the snapshot encoding. It is pure and
//! deterministic, which also makes it the implementation the property
//! tests run against.

pub mod error;
pub mod standard;

pub use error::RulesError;
pub use standard::StandardRules;

use tempo_types::{BoardSnapshot, MoveSpec, PlayerColor, TerminalReason};

/// Legal-move generation, move application, and terminal-state
/// classification for the underlying game.
///
/// Snapshots are opaque, fully reversible position encodings: every
/// snapshot an oracle produces must round-trip exactly through its own
/// operations.
pub trait RulesOracle: Send + Sync {
    /// The fixed position every new session is seeded with.
    fn starting_position(&self) -> BoardSnapshot;

    /// Which side moves next in `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::InvalidSnapshot`] if the encoding cannot be
    /// parsed.
    fn side_to_move(&self, snapshot: &BoardSnapshot) -> Result<PlayerColor, RulesError>;

    /// Every legal move in `snapshot`, in king-move form for castling.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::InvalidSnapshot`] if the encoding cannot be
    /// parsed.
    fn legal_moves(&self, snapshot: &BoardSnapshot) -> Result<Vec<MoveSpec>, RulesError>;

    /// Whether `candidate` is a member of the legal-move set of
    /// `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::InvalidSnapshot`] if the encoding cannot be
    /// parsed.
    fn is_legal(&self, snapshot: &BoardSnapshot, candidate: &MoveSpec)
        -> Result<bool, RulesError>;

    /// Apply a legal move and return the successor snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::IllegalMove`] if `candidate` is not legal
    /// in `snapshot`, or [`RulesError::InvalidSnapshot`] if the encoding
    /// cannot be parsed.
    fn apply(
        &self,
        snapshot: &BoardSnapshot,
        candidate: &MoveSpec,
    ) -> Result<BoardSnapshot, RulesError>;

    /// Classify whether `snapshot` ends the game, and why.
    ///
    /// `None` means the game continues.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::InvalidSnapshot`] if the encoding cannot be
    /// parsed.
    fn terminal_reason(
        &self,
        snapshot: &BoardSnapshot,
    ) -> Result<Option<TerminalReason>, RulesError>;
}
