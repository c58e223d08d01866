//! Standard chess rules backed by the `shakmaty` library.
//!
//! Snapshots are FEN strings. FEN is compact and fully reversible for
//! everything a single position can carry: piece placement, side to
//! move, castling rights, en passant square, and the half-move and
//! full-move counters. The one thing it cannot carry is position
//! history, so [`TerminalReason::Repetition`] is never produced here.

use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position, Role};
use tempo_types::{
    BoardSnapshot, MoveSpec, PlayerColor, PromotionPiece, Square, TerminalReason,
};

use crate::error::RulesError;
use crate::RulesOracle;

/// Half-move count at which the fifty-move rule ends the game.
const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// The production [`RulesOracle`]: standard chess over FEN snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl StandardRules {
    /// Create the standard-chess oracle.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse a snapshot into a position.
    fn parse(snapshot: &BoardSnapshot) -> Result<Chess, RulesError> {
        let fen: Fen = snapshot
            .as_str()
            .parse()
            .map_err(|e| RulesError::InvalidSnapshot(format!("{e}")))?;
        fen.into_position(CastlingMode::Standard)
            .map_err(|e| RulesError::InvalidSnapshot(format!("{e}")))
    }

    /// Encode a position back into a snapshot.
    fn encode(position: Chess) -> BoardSnapshot {
        let fen = Fen::from_setup(position.into_setup(EnPassantMode::Legal));
        BoardSnapshot::new(fen.to_string())
    }

    /// Find the legal move matching `candidate`, if any.
    fn find_move(position: &Chess, candidate: &MoveSpec) -> Option<Move> {
        position
            .legal_moves()
            .iter()
            .find(|m| move_spec(m) == Some(*candidate))
            .cloned()
    }
}

impl RulesOracle for StandardRules {
    fn starting_position(&self) -> BoardSnapshot {
        BoardSnapshot::starting()
    }

    fn side_to_move(&self, snapshot: &BoardSnapshot) -> Result<PlayerColor, RulesError> {
        let position = Self::parse(snapshot)?;
        Ok(match position.turn() {
            Color::White => PlayerColor::White,
            Color::Black => PlayerColor::Black,
        })
    }

    fn legal_moves(&self, snapshot: &BoardSnapshot) -> Result<Vec<MoveSpec>, RulesError> {
        let position = Self::parse(snapshot)?;
        Ok(position.legal_moves().iter().filter_map(move_spec).collect())
    }

    fn is_legal(
        &self,
        snapshot: &BoardSnapshot,
        candidate: &MoveSpec,
    ) -> Result<bool, RulesError> {
        let position = Self::parse(snapshot)?;
        Ok(Self::find_move(&position, candidate).is_some())
    }

    fn apply(
        &self,
        snapshot: &BoardSnapshot,
        candidate: &MoveSpec,
    ) -> Result<BoardSnapshot, RulesError> {
        let position = Self::parse(snapshot)?;
        let mv = Self::find_move(&position, candidate).ok_or_else(|| {
            RulesError::IllegalMove {
                candidate: *candidate,
                snapshot: snapshot.as_str().to_owned(),
            }
        })?;
        let next = position.play(&mv).map_err(|_| RulesError::IllegalMove {
            candidate: *candidate,
            snapshot: snapshot.as_str().to_owned(),
        })?;
        Ok(Self::encode(next))
    }

    fn terminal_reason(
        &self,
        snapshot: &BoardSnapshot,
    ) -> Result<Option<TerminalReason>, RulesError> {
        let position = Self::parse(snapshot)?;
        if position.is_checkmate() {
            let winner = match position.turn() {
                Color::White => PlayerColor::Black,
                Color::Black => PlayerColor::White,
            };
            return Ok(Some(TerminalReason::Checkmate { winner }));
        }
        if position.is_stalemate() {
            return Ok(Some(TerminalReason::Stalemate));
        }
        if position.is_insufficient_material() {
            return Ok(Some(TerminalReason::InsufficientMaterial));
        }
        if position.halfmoves() >= FIFTY_MOVE_HALFMOVES {
            return Ok(Some(TerminalReason::FiftyMoveRule));
        }
        Ok(None)
    }
}

/// Project a `shakmaty` move into the click-oriented [`MoveSpec`] form.
///
/// Castling is normalized to the king's two-square travel, matching how
/// a player clicks it. Returns `None` for move kinds standard chess
/// never generates (piece drops).
fn move_spec(mv: &Move) -> Option<MoveSpec> {
    match *mv {
        Move::Normal {
            from,
            to,
            promotion,
            ..
        } => Some(MoveSpec {
            from: from_shakmaty(from)?,
            to: from_shakmaty(to)?,
            promotion: promotion.and_then(promotion_piece),
        }),
        Move::EnPassant { from, to } => Some(MoveSpec {
            from: from_shakmaty(from)?,
            to: from_shakmaty(to)?,
            promotion: None,
        }),
        Move::Castle { king, rook } => {
            let from = from_shakmaty(king)?;
            // King lands on the g-file for short castling, the c-file
            // for long.
            let file: u8 = if rook.file() > king.file() { 6 } else { 2 };
            let to_index = from.rank().checked_mul(8)?.checked_add(file)?;
            Some(MoveSpec {
                from,
                to: Square::try_new(to_index).ok()?,
                promotion: None,
            })
        }
        Move::Put { .. } => None,
    }
}

/// Convert a `shakmaty` square to the raw-index form.
fn from_shakmaty(square: shakmaty::Square) -> Option<Square> {
    let index = u8::try_from(u32::from(square)).ok()?;
    Square::try_new(index).ok()
}

/// Map a promotion role onto the wire vocabulary.
const fn promotion_piece(role: Role) -> Option<PromotionPiece> {
    match role {
        Role::Queen => Some(PromotionPiece::Queen),
        Role::Rook => Some(PromotionPiece::Rook),
        Role::Bishop => Some(PromotionPiece::Bishop),
        Role::Knight => Some(PromotionPiece::Knight),
        Role::Pawn | Role::King => None,
    }
}
