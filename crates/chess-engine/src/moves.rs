//! Move records.
//!
//! A [`Move`] is a complete, self-contained description of a committed (or
//! candidate) move: what moved, what was captured, and the game state just
//! before it was played. Undoing a move needs nothing but the record itself.

use std::fmt;

use chess_core::{CastleSide, Color, Piece, Square};

use crate::bitboard::Bitboard;
use crate::board::CastlingRights;

/// The kind of board change a move performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    Quiet,
    Capture,
    KingCastle,
    QueenCastle,
    EnPassantCapture,
    /// Pawn reaching the last row, with or without a capture.
    Promotion,
}

impl MoveFlag {
    /// Returns the castle side for the two castle flags.
    pub const fn castle_side(self) -> Option<CastleSide> {
        match self {
            MoveFlag::KingCastle => Some(CastleSide::KingSide),
            MoveFlag::QueenCastle => Some(CastleSide::QueenSide),
            _ => None,
        }
    }

    pub const fn is_castle(self) -> bool {
        matches!(self, MoveFlag::KingCastle | MoveFlag::QueenCastle)
    }
}

/// Game state that a move overwrites and undo must restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Snapshot {
    pub castling: CastlingRights,
    pub en_passant: Bitboard,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

/// A fully described move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub(crate) flag: MoveFlag,
    pub(crate) from: Square,
    pub(crate) to: Square,
    pub(crate) piece: Piece,
    pub(crate) color: Color,
    /// Piece standing on `to` afterwards; differs from `piece` only for
    /// promotions.
    pub(crate) target: Piece,
    pub(crate) captured: Piece,
    pub(crate) before: Snapshot,
    pub(crate) castling_after: CastlingRights,
    pub(crate) en_passant_after: Bitboard,
}

impl Move {
    #[inline]
    pub fn flag(&self) -> MoveFlag {
        self.flag
    }

    #[inline]
    pub fn from(&self) -> Square {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Square {
        self.to
    }

    /// The kind of piece that moved.
    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    /// The color that moved.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn target(&self) -> Piece {
        self.target
    }

    /// The captured piece kind, or [`Piece::Empty`].
    #[inline]
    pub fn captured(&self) -> Piece {
        self.captured
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }

    /// The promotion piece, if this is a promotion.
    pub fn promotion(&self) -> Option<Piece> {
        (self.flag == MoveFlag::Promotion).then_some(self.target)
    }

    /// Material value of the capture.
    #[inline]
    pub fn points(&self) -> i32 {
        self.captured.points()
    }

    /// Square the captured piece stood on. For en passant this is beside
    /// the origin, on the destination's file.
    pub fn captured_square(&self) -> Square {
        match self.flag {
            MoveFlag::EnPassantCapture => Square::at(self.from.row(), self.to.col()),
            _ => self.to,
        }
    }

    /// State before the move was played.
    #[inline]
    pub fn snapshot(&self) -> Snapshot {
        self.before
    }

    /// Castling rights after the move.
    #[inline]
    pub fn castling_after(&self) -> CastlingRights {
        self.castling_after
    }

    /// En passant target after the move (empty or one bit).
    #[inline]
    pub fn en_passant_after(&self) -> Bitboard {
        self.en_passant_after
    }

    /// True if the move resets the halfmove clock.
    #[inline]
    pub fn is_irreversible(&self) -> bool {
        self.piece == Piece::Pawn || self.is_capture()
    }

    /// Formats the move in UCI notation (e.g. `"e2e4"`, `"e7e8q"`).
    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion() {
            write!(f, "{}", promo.to_fen_char(Color::Black))?;
        }
        Ok(())
    }
}
