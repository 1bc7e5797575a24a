//! The move-input interface handed to the engine by front ends.

use crate::{Piece, Square};
use std::fmt;

/// The side of the board a king castles toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Toward the h-file (O-O).
    KingSide,
    /// Toward the a-file (O-O-O).
    QueenSide,
}

impl CastleSide {
    /// Both sides, king side first.
    pub const BOTH: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    /// Returns the column the king lands on.
    #[inline]
    pub const fn king_target_col(self) -> u8 {
        match self {
            CastleSide::KingSide => 6,
            CastleSide::QueenSide => 2,
        }
    }

    /// Returns the column of the rook that castles on this side.
    #[inline]
    pub const fn rook_col(self) -> u8 {
        match self {
            CastleSide::KingSide => 7,
            CastleSide::QueenSide => 0,
        }
    }
}

impl fmt::Display for CastleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastleSide::KingSide => f.write_str("O-O"),
            CastleSide::QueenSide => f.write_str("O-O-O"),
        }
    }
}

/// A request to move, already disambiguated by whoever produced it.
///
/// Notation parsing lives outside the engine; by the time a move reaches the
/// game it is either an explicit coordinate triple or a castle intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveInput {
    /// Move the piece on `from` to `to`. A pawn reaching the last rank
    /// promotes to `promotion`, or to a queen when none is given.
    Coordinates {
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    },
    /// Castle the side-to-move's king toward the given side.
    Castle(CastleSide),
}

impl MoveInput {
    /// Builds a coordinate move without a promotion kind.
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        MoveInput::Coordinates {
            from,
            to,
            promotion: None,
        }
    }

    /// Parses long coordinate notation (`e2e4`, `e7e8q`).
    ///
    /// Castling in this notation is a king move of two squares; it is
    /// returned as coordinates and recognized by the engine.
    pub fn from_uci(s: &str) -> Option<Self> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_san_char(c.to_ascii_uppercase()) {
                Some(piece) if piece.is_promotion_target() => Some(piece),
                _ => return None,
            },
        };
        Some(MoveInput::Coordinates {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for MoveInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveInput::Coordinates {
                from,
                to,
                promotion,
            } => {
                write!(f, "{from}{to}")?;
                if let Some(piece) = promotion {
                    write!(f, "{}", piece.to_fen_char(crate::Color::Black))?;
                }
                Ok(())
            }
            MoveInput::Castle(side) => write!(f, "{side}"),
        }
    }
}
