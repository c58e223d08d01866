//! Board geometry, position encoding, and move vocabulary.
//!
//! A position is carried as a [`BoardSnapshot`]: an opaque, fully
//! reversible FEN string produced by the rules oracle (or the fixed
//! starting position). The core never inspects it beyond treating it as
//! the value to log and broadcast about.

use serde::{Deserialize, Serialize};

/// The FEN encoding of the standard chess starting position.
pub const STARTING_POSITION: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A raw board square index in `[0, 64)`.
///
/// Indexing follows the usual little-endian rank-file mapping: `0` is
/// `a1`, `7` is `h1`, `56` is `a8`, `63` is `h8`. Construction is
/// validated so a `Square` is always in range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Square(u8);

impl Square {
    /// Construct a square from a raw index.
    ///
    /// # Errors
    ///
    /// Returns [`SquareError`] if `index` is 64 or greater.
    pub const fn try_new(index: u8) -> Result<Self, SquareError> {
        if index < 64 {
            Ok(Self(index))
        } else {
            Err(SquareError { index })
        }
    }

    /// Return the raw index in `[0, 64)`.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Return the file number in `[0, 8)` (`0` is the a-file).
    #[must_use]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Return the rank number in `[0, 8)` (`0` is rank 1).
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }
}

impl TryFrom<u8> for Square {
    type Error = SquareError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::try_new(index)
    }
}

impl From<Square> for u8 {
    fn from(square: Square) -> Self {
        square.0
    }
}

impl core::fmt::Display for Square {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let file = char::from(b'a'.saturating_add(self.file()));
        let rank = char::from(b'1'.saturating_add(self.rank()));
        write!(f, "{file}{rank}")
    }
}

/// Error returned when a raw index is outside `[0, 64)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("square index {index} out of range (expected 0..64)")]
pub struct SquareError {
    /// The rejected index.
    pub index: u8,
}

/// A serialized, fully reversible encoding of a position, including
/// whose turn it is.
///
/// Produced only by the rules oracle or as the fixed
/// [`starting`](BoardSnapshot::starting) position; everywhere else it is
/// an opaque log entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardSnapshot(String);

impl BoardSnapshot {
    /// Wrap an encoded position.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The fixed starting position every new session is seeded with.
    #[must_use]
    pub fn starting() -> Self {
        Self(STARTING_POSITION.to_owned())
    }

    /// Return the encoded position as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two sides of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerColor {
    /// The side that moves first; assigned to the human player.
    White,
    /// The side played by the automated opponent.
    Black,
}

impl PlayerColor {
    /// Return the opposing color.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl core::fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::White => write!(f, "White"),
            Self::Black => write!(f, "Black"),
        }
    }
}

/// A piece a pawn may promote to.
///
/// The coordinator only ever selects [`Queen`](PromotionPiece::Queen)
/// (no alternate choice is offered), but the vocabulary carries the
/// full set so the policy could change without a wire break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionPiece {
    /// The highest-value piece; the only promotion the policy produces.
    Queen,
    /// Rook under-promotion.
    Rook,
    /// Bishop under-promotion.
    Bishop,
    /// Knight under-promotion.
    Knight,
}

/// A candidate move: source square, destination square, and an optional
/// promotion piece.
///
/// Castling is expressed in king-move form (`e1` to `g1`), matching how
/// a player clicks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveSpec {
    /// The square the moving piece starts on.
    pub from: Square,
    /// The square the moving piece lands on.
    pub to: Square,
    /// The promotion piece, when the move promotes a pawn.
    pub promotion: Option<PromotionPiece>,
}

impl core::fmt::Display for MoveSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        match self.promotion {
            Some(PromotionPiece::Queen) => write!(f, "q"),
            Some(PromotionPiece::Rook) => write!(f, "r"),
            Some(PromotionPiece::Bishop) => write!(f, "b"),
            Some(PromotionPiece::Knight) => write!(f, "n"),
            None => Ok(()),
        }
    }
}

/// Why a position ended the game, as classified by the rules oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerminalReason {
    /// One side delivered checkmate.
    Checkmate {
        /// The winning side.
        winner: PlayerColor,
    },
    /// The side to move has no legal move and is not in check.
    Stalemate,
    /// Neither side can possibly deliver mate.
    InsufficientMaterial,
    /// One hundred half-moves without a capture or pawn move.
    FiftyMoveRule,
    /// The position repeated enough times to end the game.
    ///
    /// Part of the oracle contract, but undetectable from a single
    /// snapshot; the standard oracle never produces it.
    Repetition,
    /// The oracle declared the game over for some other reason.
    Other,
}

impl core::fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Checkmate { winner } => write!(f, "{winner} wins by checkmate"),
            Self::Stalemate => write!(f, "Draw by stalemate"),
            Self::InsufficientMaterial => write!(f, "Draw by insufficient material"),
            Self::FiftyMoveRule => write!(f, "Draw by fifty-move rule"),
            Self::Repetition => write!(f, "Draw by repetition"),
            Self::Other => write!(f, "Game over"),
        }
    }
}
