//! Move rejection errors.

use chess_core::{CastleSide, Color, Piece, Square};
use thiserror::Error;

/// Why a move was refused. A refused move never changes the game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on {0}")]
    NoPieceAtSquare(Square),

    #[error("the piece on {square} belongs to {color}, who is not to move")]
    WrongTurn { square: Square, color: Color },

    #[error("{to} is not reachable from {from}")]
    MoveNotInRange { from: Square, to: Square },

    #[error("cannot promote to {0}")]
    InvalidPromotion(Piece),

    #[error("castling right for {0} has been lost")]
    CastleRightsRevoked(CastleSide),

    #[error("{0} is blocked or passes through an attacked square")]
    CastlePathBlockedOrAttacked(CastleSide),

    #[error("move would leave the king in check")]
    KingWouldBeInCheck,

    #[error("malformed move notation: {0}")]
    MalformedNotation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(MoveError::NoPieceAtSquare(e4).to_string(), "no piece on e4");
        assert_eq!(
            MoveError::CastleRightsRevoked(CastleSide::QueenSide).to_string(),
            "castling right for O-O-O has been lost"
        );
        let err = MoveError::WrongTurn { square: e4, color: Color::Black };
        assert!(err.to_string().contains("Black"));
    }
}
