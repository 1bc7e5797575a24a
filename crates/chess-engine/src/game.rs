//! Game state and move legality.
//!
//! A [`Game`] owns a [`Board`], the side to move, the clocks and a stack of
//! committed [`Move`]s. Every move request goes through the same pipeline:
//! resolve the piece, check the destination against the pseudo-legal range,
//! classify the move, check castling conditions, then apply it speculatively
//! and reject it if the mover's own king ends up attacked. A rejected move
//! leaves the game exactly as it was.

use chess_core::{CastleSide, Color, FenError, FenRecord, MoveInput, Piece, Square};
use tracing::{debug, trace};

use crate::bitboard::Bitboard;
use crate::board::{Board, CastlingRights};
use crate::error::MoveError;
use crate::moves::{Move, MoveFlag, Snapshot};
use crate::san;

/// Where a game stands for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// The side to move has at least one legal move.
    InProgress,
    /// The side to move is in check with no legal move.
    Checkmate { winner: Color },
    /// The side to move is not in check and has no legal move.
    Stalemate,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }

    /// The PGN result token for this status.
    pub fn result_token(self) -> &'static str {
        match self {
            GameStatus::InProgress => "*",
            GameStatus::Checkmate { winner: Color::White } => "1-0",
            GameStatus::Checkmate { winner: Color::Black } => "0-1",
            GameStatus::Stalemate => "1/2-1/2",
        }
    }
}

/// A chess game with undo history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    turn: Color,
    history: Vec<Move>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// An en-passant target must be the empty square just passed over by an
/// opposing pawn's double push, seen from the side to move.
fn check_en_passant(board: &Board, target: Square, turn: Color) -> Result<(), FenError> {
    let (target_row, pawn_row) = match turn {
        Color::White => (5, 4),
        Color::Black => (2, 3),
    };
    let pawn = Square::at(pawn_row, target.col());
    let valid = target.row() == target_row
        && board.piece_at(target) == Piece::Empty
        && board.piece_at(pawn) == Piece::Pawn
        && board.color_at(pawn) == Some(turn.opposite());
    if valid {
        Ok(())
    } else {
        Err(FenError::InvalidEnPassantSquare(target.to_string()))
    }
}

impl Game {
    /// Creates a game at the standard starting position.
    pub fn new() -> Self {
        Game {
            board: Board::new(),
            turn: Color::White,
            history: Vec::new(),
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates a game from a FEN string. Each side must have exactly one king.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let record = FenRecord::parse(fen)?;
        let mut board = Board::from_placement(&record.placement)?;
        for color in Color::BOTH {
            let kings = board.pieces_of(Piece::King, color).count();
            if kings != 1 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "{color} has {kings} kings, expected 1"
                )));
            }
        }
        board.set_castling(CastlingRights::from_fen(&record.castling)?);
        if let Some(target) = record.en_passant {
            check_en_passant(&board, target, record.turn)?;
        }
        board.set_en_passant(record.en_passant.map_or(Bitboard::EMPTY, Bitboard::from_square));
        Ok(Game {
            board,
            turn: record.turn,
            history: Vec::new(),
            halfmove_clock: record.halfmove_clock,
            fullmove_number: record.fullmove_number,
        })
    }

    /// Replaces the position and clears the history.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        *self = Game::from_fen(fen)?;
        Ok(())
    }

    /// Exports the current position as FEN.
    pub fn to_fen(&self) -> String {
        FenRecord {
            placement: self.board.placement(),
            turn: self.turn,
            castling: self.board.castling().to_fen(),
            en_passant: self.board.en_passant_square(),
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_string()
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Committed moves, oldest first.
    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Static material sum for `color`, kings excluded.
    pub fn material(&self, color: Color) -> i32 {
        self.board.material(color)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.board.is_in_check(self.turn)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            castling: self.board.castling(),
            en_passant: self.board.en_passant(),
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// Validates and commits a move given by coordinates.
    ///
    /// A king moving two squares along its home row is treated as a castle.
    /// A pawn reaching the last row promotes to `promotion`, or to a queen.
    pub fn process_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    ) -> Result<Move, MoveError> {
        self.try_move(from, to, promotion).inspect_err(|err| {
            debug!(%from, %to, error = %err, "move rejected");
        })
    }

    /// Castles the side to move toward `side`.
    pub fn castle(&mut self, side: CastleSide) -> Result<Move, MoveError> {
        self.castle_candidate(side)
            .and_then(|candidate| self.commit(candidate))
            .inspect_err(|err| {
                debug!(%side, error = %err, "castle rejected");
            })
    }

    /// Applies a move request from a front end.
    pub fn apply_input(&mut self, input: MoveInput) -> Result<Move, MoveError> {
        match input {
            MoveInput::Coordinates { from, to, promotion } => self.process_move(from, to, promotion),
            MoveInput::Castle(side) => self.castle(side),
        }
    }

    /// Resolves a SAN token against the legal moves and applies it.
    pub fn push_san(&mut self, san: &str) -> Result<Move, MoveError> {
        let input = san::resolve_san(self, san)?;
        self.apply_input(input)
    }

    fn try_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    ) -> Result<Move, MoveError> {
        let candidate = self.candidate(from, to, promotion)?;
        self.commit(candidate)
    }

    /// Builds the move record for a coordinate request without touching the
    /// board.
    fn candidate(&self, from: Square, to: Square, promotion: Option<Piece>) -> Result<Move, MoveError> {
        let piece = self.board.piece_at(from);
        let color = self
            .board
            .color_at(from)
            .ok_or(MoveError::NoPieceAtSquare(from))?;
        if color != self.turn {
            return Err(MoveError::WrongTurn { square: from, color });
        }

        let range = self.board.destinations(piece, Bitboard::from_square(from), color);
        if !range.contains(to) {
            return match self.castle_landing(piece, from, to) {
                Some(side) => self.castle_candidate(side),
                None => Err(MoveError::MoveNotInRange { from, to }),
            };
        }

        let occupant = self.board.piece_at(to);
        let (flag, target, captured) = if piece == Piece::Pawn && to.row() == color.promotion_row() {
            let kind = promotion.unwrap_or(Piece::Queen);
            if !kind.is_promotion_target() {
                return Err(MoveError::InvalidPromotion(kind));
            }
            (MoveFlag::Promotion, kind, occupant)
        } else if piece == Piece::Pawn
            && from.col() != to.col()
            && occupant.is_empty()
            && self.board.en_passant().contains(to)
        {
            (MoveFlag::EnPassantCapture, Piece::Pawn, Piece::Pawn)
        } else if !occupant.is_empty() {
            (MoveFlag::Capture, piece, occupant)
        } else {
            (MoveFlag::Quiet, piece, Piece::Empty)
        };

        let mut castling = self.board.castling();
        match piece {
            Piece::King => castling.revoke_color(color),
            Piece::Rook => castling.revoke_corner(from),
            _ => {}
        }
        if !captured.is_empty() {
            castling.revoke_corner(to);
        }

        let en_passant = if piece == Piece::Pawn && from.row().abs_diff(to.row()) == 2 {
            Bitboard::from_square(Square::at((from.row() + to.row()) / 2, from.col()))
        } else {
            Bitboard::EMPTY
        };

        Ok(Move {
            flag,
            from,
            to,
            piece,
            color,
            target,
            captured,
            before: self.snapshot(),
            castling_after: castling,
            en_passant_after: en_passant,
        })
    }

    /// Recognizes a king's two-square step from its home square.
    fn castle_landing(&self, piece: Piece, from: Square, to: Square) -> Option<CastleSide> {
        let row = self.turn.home_row();
        if piece != Piece::King || from != Square::at(row, 4) || to.row() != row {
            return None;
        }
        CastleSide::BOTH
            .into_iter()
            .find(|side| side.king_target_col() == to.col())
    }

    /// Builds a castle record after checking rights, path and attacks.
    fn castle_candidate(&self, side: CastleSide) -> Result<Move, MoveError> {
        let color = self.turn;
        let row = color.home_row();
        let king_from = Square::at(row, 4);
        let king_to = Square::at(row, side.king_target_col());
        let rook_from = Square::at(row, side.rook_col());

        if !self.board.castling().has(color, side)
            || !self.board.pieces_of(Piece::King, color).contains(king_from)
            || !self.board.pieces_of(Piece::Rook, color).contains(rook_from)
        {
            return Err(MoveError::CastleRightsRevoked(side));
        }

        let (low, high) = match side {
            CastleSide::KingSide => (king_from.col() + 1, rook_from.col()),
            CastleSide::QueenSide => (rook_from.col() + 1, king_from.col()),
        };
        let between = (low..high)
            .map(|col| Bitboard::from_square(Square::at(row, col)))
            .fold(Bitboard::EMPTY, |acc, bit| acc | bit);
        if (between & self.board.occupied()).is_not_empty() {
            return Err(MoveError::CastlePathBlockedOrAttacked(side));
        }

        let (a, b) = (king_from.col().min(king_to.col()), king_from.col().max(king_to.col()));
        let opponent = color.opposite();
        if (a..=b).any(|col| self.board.square_attacked_by(Square::at(row, col), opponent)) {
            return Err(MoveError::CastlePathBlockedOrAttacked(side));
        }

        let mut castling = self.board.castling();
        castling.revoke_color(color);
        let flag = match side {
            CastleSide::KingSide => MoveFlag::KingCastle,
            CastleSide::QueenSide => MoveFlag::QueenCastle,
        };
        Ok(Move {
            flag,
            from: king_from,
            to: king_to,
            piece: Piece::King,
            color,
            target: Piece::King,
            captured: Piece::Empty,
            before: self.snapshot(),
            castling_after: castling,
            en_passant_after: Bitboard::EMPTY,
        })
    }

    /// Applies a candidate speculatively and keeps it only if the mover's
    /// king is safe afterwards.
    fn commit(&mut self, candidate: Move) -> Result<Move, MoveError> {
        self.board.apply(&candidate);
        if self.board.is_in_check(candidate.color()) {
            self.board.apply(&candidate);
            return Err(MoveError::KingWouldBeInCheck);
        }
        self.install(candidate);
        Ok(candidate)
    }

    /// Records a move whose placement change is already on the board.
    fn install(&mut self, mv: Move) {
        self.board.set_castling(mv.castling_after());
        self.board.set_en_passant(mv.en_passant_after());
        if mv.is_irreversible() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if mv.color() == Color::Black {
            self.fullmove_number += 1;
        }
        self.turn = mv.color().opposite();
        self.history.push(mv);
        trace!(mv = %mv, "move committed");
    }

    /// Commits a move produced by [`Game::legal_moves`] for the current
    /// position, without validating it again.
    pub fn make_move(&mut self, mv: &Move) {
        debug_assert_eq!(mv.color(), self.turn);
        debug_assert_eq!(mv.snapshot(), self.snapshot());
        self.board.apply(mv);
        self.install(*mv);
    }

    /// Takes back the most recent move. Returns `None` if there is none.
    pub fn undo_move(&mut self) -> Option<Move> {
        let mv = self.history.pop()?;
        self.board.apply(&mv);
        let before = mv.snapshot();
        self.board.set_castling(before.castling);
        self.board.set_en_passant(before.en_passant);
        self.halfmove_clock = before.halfmove_clock;
        self.fullmove_number = before.fullmove_number;
        self.turn = mv.color();
        trace!(mv = %mv, "move undone");
        Some(mv)
    }

    /// Enumerates every legal move for the side to move.
    ///
    /// Each pseudo-legal destination is run through the full validation
    /// pipeline and undone again, so the game is unchanged on return.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let color = self.turn;
        let mut moves = Vec::with_capacity(48);
        for piece in Piece::ALL {
            for from in self.board.pieces_of(piece, color) {
                let mut targets = self.board.destinations(piece, Bitboard::from_square(from), color);
                if piece == Piece::King {
                    targets |= self.castle_targets(from);
                }
                for to in targets {
                    if piece == Piece::Pawn && to.row() == color.promotion_row() {
                        for kind in Piece::PROMOTIONS {
                            self.collect(from, to, Some(kind), &mut moves);
                        }
                    } else {
                        self.collect(from, to, None, &mut moves);
                    }
                }
            }
        }
        moves
    }

    fn collect(&mut self, from: Square, to: Square, promotion: Option<Piece>, moves: &mut Vec<Move>) {
        if let Ok(mv) = self.try_move(from, to, promotion) {
            self.undo_move();
            moves.push(mv);
        }
    }

    /// Castle landing squares worth trying for a king on `from`.
    fn castle_targets(&self, from: Square) -> Bitboard {
        let row = self.turn.home_row();
        if from != Square::at(row, 4) {
            return Bitboard::EMPTY;
        }
        CastleSide::BOTH
            .into_iter()
            .filter(|&side| self.board.castling().has(self.turn, side))
            .fold(Bitboard::EMPTY, |acc, side| {
                acc | Bitboard::from_square(Square::at(row, side.king_target_col()))
            })
    }

    /// Reports checkmate, stalemate or an ongoing game.
    pub fn status(&mut self) -> GameStatus {
        if !self.legal_moves().is_empty() {
            GameStatus::InProgress
        } else if self.is_check() {
            GameStatus::Checkmate {
                winner: self.turn.opposite(),
            }
        } else {
            GameStatus::Stalemate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn play(game: &mut Game, uci: &str) -> Move {
        let input = MoveInput::from_uci(uci).unwrap();
        game.apply_input(input).unwrap()
    }

    #[test]
    fn new_game() {
        let mut game = Game::new();
        assert_eq!(game.turn(), Color::White);
        assert!(game.history().is_empty());
        assert!(!game.is_check());
        assert_eq!(game.to_fen(), FenRecord::STARTPOS);
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn king_pawn_opening() {
        let mut game = Game::new();
        let before = game.board().clone();
        let mv = game.process_move(sq("e2"), sq("e4"), None).unwrap();

        assert_eq!(mv.flag(), MoveFlag::Quiet);
        assert_eq!(game.board().en_passant_square(), Some(sq("e3")));
        assert_eq!(game.turn(), Color::Black);
        let changed = Bitboard::from_square(sq("e2")) | Bitboard::from_square(sq("e4"));
        assert_eq!(
            game.board().pieces(Piece::Pawn) ^ before.pieces(Piece::Pawn),
            changed
        );
        assert_eq!(
            game.board().color(Color::White) ^ before.color(Color::White),
            changed
        );
        assert_eq!(game.board().color(Color::Black), before.color(Color::Black));
        assert_eq!(
            game.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn rejections_leave_game_untouched() {
        let mut game = Game::new();
        let before = game.clone();
        assert_eq!(
            game.process_move(sq("e4"), sq("e5"), None),
            Err(MoveError::NoPieceAtSquare(sq("e4")))
        );
        assert_eq!(
            game.process_move(sq("e7"), sq("e5"), None),
            Err(MoveError::WrongTurn { square: sq("e7"), color: Color::Black })
        );
        assert_eq!(
            game.process_move(sq("e2"), sq("e5"), None),
            Err(MoveError::MoveNotInRange { from: sq("e2"), to: sq("e5") })
        );
        assert_eq!(
            game.process_move(sq("e1"), sq("g1"), None),
            Err(MoveError::CastlePathBlockedOrAttacked(CastleSide::KingSide))
        );
        assert_eq!(game, before);
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let mut game = Game::from_fen("4k3/8/8/8/4r3/8/4N3/4K3 w - - 0 1").unwrap();
        let before = game.clone();
        assert_eq!(
            game.process_move(sq("e2"), sq("c3"), None),
            Err(MoveError::KingWouldBeInCheck)
        );
        assert_eq!(game, before);
    }

    #[test]
    fn clocks_follow_moves() {
        let mut game = Game::new();
        for uci in ["g1f3", "b8c6", "f3g1"] {
            play(&mut game, uci);
        }
        assert_eq!(game.halfmove_clock(), 3);
        assert_eq!(game.fullmove_number(), 2);
        play(&mut game, "e7e5");
        assert_eq!(game.halfmove_clock(), 0);
        assert_eq!(game.fullmove_number(), 3);
    }

    #[test]
    fn undo_restores_everything() {
        let mut game = Game::new();
        let start = game.clone();
        for uci in ["e2e4", "d7d5", "e4d5", "d8d5", "b1c3"] {
            play(&mut game, uci);
        }
        let last = game.undo_move().unwrap();
        assert_eq!(last.to_uci(), "b1c3");
        assert_eq!(game.turn(), Color::White);
        while game.undo_move().is_some() {}
        assert_eq!(game, start);
        assert_eq!(game.undo_move(), None);
    }

    #[test]
    fn en_passant_capture() {
        let mut game = Game::new();
        for uci in ["e2e4", "a7a6", "e4e5", "d7d5"] {
            play(&mut game, uci);
        }
        assert_eq!(game.board().en_passant_square(), Some(sq("d6")));
        let before = game.clone();
        let mv = play(&mut game, "e5d6");
        assert_eq!(mv.flag(), MoveFlag::EnPassantCapture);
        assert_eq!(mv.captured(), Piece::Pawn);
        assert_eq!(game.board().piece_at(sq("d5")), Piece::Empty);
        assert_eq!(game.board().piece_at(sq("d6")), Piece::Pawn);
        assert_eq!(game.board().en_passant_square(), None);
        game.undo_move();
        assert_eq!(game, before);
    }

    #[test]
    fn en_passant_expires() {
        let mut game = Game::new();
        for uci in ["e2e4", "a7a6", "e4e5", "d7d5", "h2h3", "h7h6"] {
            play(&mut game, uci);
        }
        assert_eq!(
            game.process_move(sq("e5"), sq("d6"), None),
            Err(MoveError::MoveNotInRange { from: sq("e5"), to: sq("d6") })
        );
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let mut game = Game::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let mv = game.process_move(sq("a7"), sq("a8"), None).unwrap();
        assert_eq!(mv.flag(), MoveFlag::Promotion);
        assert_eq!(mv.promotion(), Some(Piece::Queen));
        assert_eq!(game.board().piece_at(sq("a8")), Piece::Queen);
        assert!(game.board().pieces(Piece::Pawn).is_empty());
        game.undo_move();
        assert_eq!(game.board().piece_at(sq("a7")), Piece::Pawn);
    }

    #[test]
    fn promotion_rejects_bad_kinds() {
        let mut game = Game::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        assert_eq!(
            game.process_move(sq("a7"), sq("a8"), Some(Piece::King)),
            Err(MoveError::InvalidPromotion(Piece::King))
        );
        assert_eq!(
            game.process_move(sq("a7"), sq("a8"), Some(Piece::Pawn)),
            Err(MoveError::InvalidPromotion(Piece::Pawn))
        );
    }

    #[test]
    fn promotion_generates_four_moves() {
        let mut game = Game::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let promotions: Vec<Move> = game
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.flag() == MoveFlag::Promotion)
            .collect();
        assert_eq!(promotions.len(), 4);
        let before = game.clone();
        for mv in &promotions {
            game.make_move(mv);
            assert_eq!(game.board().piece_at(sq("a8")), mv.target());
            game.undo_move();
            assert_eq!(game, before);
        }
    }

    #[test]
    fn capture_promotion_revokes_corner_right() {
        let mut game = Game::from_fen("rn2k3/1P6/8/8/8/8/8/4K3 w q - 0 1").unwrap();
        let mv = game.process_move(sq("b7"), sq("a8"), Some(Piece::Knight)).unwrap();
        assert_eq!(mv.captured(), Piece::Rook);
        assert_eq!(game.board().castling(), CastlingRights::NONE);
        assert_eq!(game.board().piece_at(sq("a8")), Piece::Knight);
        assert_eq!(game.board().color_at(sq("a8")), Some(Color::White));
    }

    #[test]
    fn castling_both_sides() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let mut game = Game::from_fen(fen).unwrap();
        let mv = game.castle(CastleSide::KingSide).unwrap();
        assert_eq!(mv.flag(), MoveFlag::KingCastle);
        assert_eq!(game.board().piece_at(sq("g1")), Piece::King);
        assert_eq!(game.board().piece_at(sq("f1")), Piece::Rook);
        assert_eq!(game.board().castling().to_fen(), "kq");

        let mv = game.process_move(sq("e8"), sq("c8"), None).unwrap();
        assert_eq!(mv.flag(), MoveFlag::QueenCastle);
        assert_eq!(game.to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2");

        game.undo_move();
        game.undo_move();
        assert_eq!(game.to_fen(), fen);
    }

    #[test]
    fn castling_through_attack() {
        // Black rook on f8 covers f1.
        let mut game = Game::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(
            game.castle(CastleSide::KingSide),
            Err(MoveError::CastlePathBlockedOrAttacked(CastleSide::KingSide))
        );
        assert!(game.castle(CastleSide::QueenSide).is_ok());
    }

    #[test]
    fn castling_onto_attacked_square() {
        // Black rook on g8 covers g1 only.
        let mut game = Game::from_fen("4k1r1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let before = game.clone();
        assert_eq!(
            game.castle(CastleSide::KingSide),
            Err(MoveError::CastlePathBlockedOrAttacked(CastleSide::KingSide))
        );
        assert_eq!(game, before);
        assert_eq!(
            game.process_move(sq("e1"), sq("g1"), None),
            Err(MoveError::CastlePathBlockedOrAttacked(CastleSide::KingSide))
        );
        assert_eq!(game, before);
    }

    #[test]
    fn castling_blocked_on_g_file() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K1NR w KQ - 0 1").unwrap();
        let before = game.clone();
        assert_eq!(
            game.castle(CastleSide::KingSide),
            Err(MoveError::CastlePathBlockedOrAttacked(CastleSide::KingSide))
        );
        assert_eq!(game, before);
        assert!(game.castle(CastleSide::QueenSide).is_ok());
    }

    #[test]
    fn castling_out_of_check() {
        let mut game = Game::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(
            game.castle(CastleSide::QueenSide),
            Err(MoveError::CastlePathBlockedOrAttacked(CastleSide::QueenSide))
        );
    }

    #[test]
    fn queen_side_b_file_may_be_attacked() {
        // b1 is attacked but the king never crosses it.
        let mut game = Game::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert!(game.castle(CastleSide::QueenSide).is_ok());
    }

    #[test]
    fn queen_side_b_file_must_be_empty() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1").unwrap();
        assert_eq!(
            game.castle(CastleSide::QueenSide),
            Err(MoveError::CastlePathBlockedOrAttacked(CastleSide::QueenSide))
        );
    }

    #[test]
    fn rook_and_king_moves_revoke_rights() {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut game, "h1h2");
        play(&mut game, "e8d8");
        play(&mut game, "h2h1");
        play(&mut game, "d8e8");
        assert_eq!(game.board().castling().to_fen(), "Q");
        assert_eq!(
            game.castle(CastleSide::KingSide),
            Err(MoveError::CastleRightsRevoked(CastleSide::KingSide))
        );
        play(&mut game, "e1f1");
        assert_eq!(game.board().castling(), CastlingRights::NONE);
    }

    #[test]
    fn castle_requires_rook() {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/4K3 w K - 0 1").unwrap();
        assert_eq!(
            game.castle(CastleSide::KingSide),
            Err(MoveError::CastleRightsRevoked(CastleSide::KingSide))
        );
    }

    #[test]
    fn castles_are_enumerated() {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castles = game
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.flag().is_castle())
            .count();
        assert_eq!(castles, 2);
        assert_eq!(game.legal_moves().len(), 26);
    }

    #[test]
    fn fools_mate() {
        let mut game = Game::new();
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            play(&mut game, uci);
        }
        assert!(game.is_check());
        assert_eq!(game.status(), GameStatus::Checkmate { winner: Color::Black });
        assert_eq!(game.status().result_token(), "0-1");
    }

    #[test]
    fn stalemate() {
        let mut game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!game.is_check());
        assert_eq!(game.status(), GameStatus::Stalemate);
        assert!(game.status().is_over());
    }

    #[test]
    fn fen_requires_kings() {
        assert!(matches!(
            Game::from_fen("8/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Game::from_fen("4k3/8/8/8/8/8/8/3KK3 w - - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn fen_en_passant_must_fit_position() {
        // No black pawn in front of e3, and it is White's turn.
        assert!(matches!(
            Game::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e3 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        // Right square, wrong side to move.
        assert!(matches!(
            Game::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e3 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        // Pawn behind the target belongs to the side to move.
        assert!(matches!(
            Game::from_fen("4k3/8/8/3P4/8/8/8/4K3 w - d6 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        // Target square occupied.
        assert!(matches!(
            Game::from_fen("4k3/8/3n4/3p4/8/8/8/4K3 w - d6 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));

        let mut game =
            Game::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2").unwrap();
        let mv = game.process_move(sq("e5"), sq("d6"), None).unwrap();
        assert_eq!(mv.flag(), MoveFlag::EnPassantCapture);
        assert!(game.board().is_consistent());
    }

    #[test]
    fn rejected_en_passant_keeps_start_moves() {
        let mut game = Game::new();
        assert!(game
            .set_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e3 0 1")
            .is_err());
        assert_eq!(game.legal_moves().len(), 20);
        assert!(game.legal_moves().iter().all(|mv| mv.flag() != MoveFlag::EnPassantCapture));
    }

    #[test]
    fn set_fen_clears_history() {
        let mut game = Game::new();
        play(&mut game, "e2e4");
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        game.set_fen(fen).unwrap();
        assert!(game.history().is_empty());
        assert_eq!(game.to_fen(), fen);
        assert!(game.set_fen("garbage").is_err());
        assert_eq!(game.to_fen(), fen);
    }

    #[test]
    fn material_is_static() {
        let game = Game::from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
        assert_eq!(game.material(Color::White), 5);
        assert_eq!(game.material(Color::Black), 9);
    }
}
