//! Bitboard board representation.
//!
//! A [`Board`] keeps one bitboard per piece kind (plus an aggregate of empty
//! squares) and one per color. Every mutation is an XOR of masks, so applying
//! the same move twice restores the board exactly. Castling rights and the
//! en passant target live here too because attack generation needs them;
//! turn and clocks belong to the game.

use std::sync::Arc;

use chess_core::{CastleSide, Color, FenError, Piece, Square};

use crate::bitboard::Bitboard;
use crate::moves::{Move, MoveFlag};
use crate::rays::RayTable;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates castling rights from raw flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::KingSide) => Self::WHITE_KINGSIDE,
            (Color::White, CastleSide::QueenSide) => Self::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::KingSide) => Self::BLACK_KINGSIDE,
            (Color::Black, CastleSide::QueenSide) => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if `color` still holds the right to castle on `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    /// Returns true if `color` holds either castling right.
    #[inline]
    pub const fn any(self, color: Color) -> bool {
        self.has(color, CastleSide::KingSide) || self.has(color, CastleSide::QueenSide)
    }

    /// Removes one right.
    #[inline]
    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::flag(color, side);
    }

    /// Removes both rights of a color.
    #[inline]
    pub fn revoke_color(&mut self, color: Color) {
        self.revoke(color, CastleSide::KingSide);
        self.revoke(color, CastleSide::QueenSide);
    }

    /// Removes the right tied to a rook's starting corner, if `sq` is one.
    pub fn revoke_corner(&mut self, sq: Square) {
        match sq {
            Square::A1 => self.revoke(Color::White, CastleSide::QueenSide),
            Square::H1 => self.revoke(Color::White, CastleSide::KingSide),
            Square::A8 => self.revoke(Color::Black, CastleSide::QueenSide),
            Square::H8 => self.revoke(Color::Black, CastleSide::KingSide),
            _ => {}
        }
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Parses the FEN castling field (`"KQkq"`, `"-"`, ...).
    pub fn from_fen(field: &str) -> Result<Self, FenError> {
        if field == "-" {
            return Ok(Self::NONE);
        }
        let mut rights = Self::NONE;
        for c in field.chars() {
            let flag = match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => return Err(FenError::InvalidCastlingRights(field.to_string())),
            };
            rights.0 |= flag;
        }
        Ok(rights)
    }

    /// Formats the rights as a FEN castling field.
    pub fn to_fen(self) -> String {
        let mut out = String::new();
        for (flag, c) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.0 & flag != 0 {
                out.push(c);
            }
        }
        if out.is_empty() {
            out.push('-');
        }
        out
    }
}

/// Which family of rays a slider moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slide {
    /// Ranks and files (rook).
    Orthogonal,
    /// Diagonals (bishop).
    Diagonal,
}

/// King-step template, not masked by color.
#[inline]
pub fn king_template(origin: Bitboard) -> Bitboard {
    origin.north()
        | origin.south()
        | origin.east()
        | origin.west()
        | origin.north_east()
        | origin.north_west()
        | origin.south_east()
        | origin.south_west()
}

/// Knight-jump template, not masked by color.
#[inline]
pub fn knight_template(origin: Bitboard) -> Bitboard {
    let ne = origin.north_east();
    let nw = origin.north_west();
    let se = origin.south_east();
    let sw = origin.south_west();
    (ne | nw).north() | (ne | se).east() | (nw | sw).west() | (se | sw).south()
}

/// Squares a pawn of `color` attacks diagonally.
#[inline]
pub fn pawn_capture_template(origin: Bitboard, color: Color) -> Bitboard {
    match color {
        Color::White => origin.north_east() | origin.north_west(),
        Color::Black => origin.south_east() | origin.south_west(),
    }
}

#[inline]
fn pawn_push(origin: Bitboard, color: Color) -> Bitboard {
    match color {
        Color::White => origin.north(),
        Color::Black => origin.south(),
    }
}

/// King and rook XOR masks for a castle on the given side, before shifting
/// to the castling color's home row.
const fn castle_masks(side: CastleSide) -> (u64, u64) {
    match side {
        // e1^g1, h1^f1
        CastleSide::KingSide => (0x50, 0xA0),
        // e1^c1, a1^d1
        CastleSide::QueenSide => (0x14, 0x09),
    }
}

/// Piece placement with castling rights and the en passant target.
#[derive(Debug, Clone)]
pub struct Board {
    /// Indexed by [`Piece::index`]; the [`Piece::Empty`] slot is the
    /// complement of both color sets.
    pieces: [Bitboard; 7],
    colors: [Bitboard; 2],
    castling: CastlingRights,
    en_passant: Bitboard,
    rays: Arc<RayTable>,
}

impl Board {
    /// Creates a board with no pieces, no castling rights and no en passant
    /// target.
    pub fn empty() -> Self {
        let mut pieces = [Bitboard::EMPTY; 7];
        pieces[Piece::Empty.index()] = Bitboard::FULL;
        Board {
            pieces,
            colors: [Bitboard::EMPTY; 2],
            castling: CastlingRights::NONE,
            en_passant: Bitboard::EMPTY,
            rays: Arc::new(RayTable::new()),
        }
    }

    /// Creates the standard starting arrangement with all castling rights.
    pub fn new() -> Self {
        const BACK_RANK: [Piece; 8] = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        let mut board = Self::empty();
        for color in Color::BOTH {
            for (col, piece) in BACK_RANK.into_iter().enumerate() {
                board.put(piece, color, Square::at(color.home_row(), col as u8));
                board.put(Piece::Pawn, color, Square::at(color.pawn_row(), col as u8));
            }
        }
        board.castling = CastlingRights::ALL;
        board
    }

    /// Builds a board from the placement field of a FEN string. Castling
    /// rights and en passant start cleared.
    pub fn from_placement(placement: &str) -> Result<Self, FenError> {
        let invalid = |reason: String| FenError::InvalidPiecePlacement(reason);
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(invalid(format!("expected 8 ranks, got {}", rows.len())));
        }

        let mut board = Self::empty();
        for (i, text) in rows.iter().enumerate() {
            let row = 7 - i as u8;
            let mut col = 0u8;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    col += skip as u8;
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    if col >= 8 {
                        return Err(invalid(format!("rank {} overflows", row + 1)));
                    }
                    board.put(piece, color, Square::at(row, col));
                    col += 1;
                } else {
                    return Err(invalid(format!("invalid character '{c}' in rank {}", row + 1)));
                }
                if col > 8 {
                    return Err(invalid(format!("rank {} overflows", row + 1)));
                }
            }
            if col != 8 {
                return Err(invalid(format!("rank {} has {col} squares, expected 8", row + 1)));
            }
        }
        Ok(board)
    }

    /// Exports the placement field of a FEN string.
    pub fn placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for row in (0..8u8).rev() {
            let mut gap = 0;
            for col in 0..8u8 {
                let sq = Square::at(row, col);
                match self.color_at(sq) {
                    Some(color) => {
                        if gap > 0 {
                            out.push(char::from(b'0' + gap));
                            gap = 0;
                        }
                        out.push(self.piece_at(sq).to_fen_char(color));
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                out.push(char::from(b'0' + gap));
            }
            if row > 0 {
                out.push('/');
            }
        }
        out
    }

    fn put(&mut self, piece: Piece, color: Color, sq: Square) {
        debug_assert!(self.piece_at(sq).is_empty());
        let bit = Bitboard::from_square(sq);
        self.pieces[piece.index()] |= bit;
        self.colors[color.index()] |= bit;
        self.refresh_empty();
    }

    #[inline]
    fn refresh_empty(&mut self) {
        self.pieces[Piece::Empty.index()] = !(self.colors[0] | self.colors[1]);
    }

    /// Returns the shared ray table.
    pub fn rays(&self) -> &Arc<RayTable> {
        &self.rays
    }

    /// Returns the piece on a square, or [`Piece::Empty`].
    pub fn piece_at(&self, sq: Square) -> Piece {
        Piece::ALL
            .into_iter()
            .find(|piece| self.pieces[piece.index()].contains(sq))
            .unwrap_or(Piece::Empty)
    }

    /// Returns the color of the piece on a square, or `None` if it is empty.
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        Color::BOTH
            .into_iter()
            .find(|color| self.colors[color.index()].contains(sq))
    }

    /// Returns every square holding `piece`, of either color.
    #[inline]
    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    /// Returns every square holding a piece of `color`.
    #[inline]
    pub fn color(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Returns the squares holding `piece` of `color`.
    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        self.pieces[Piece::Empty.index()]
    }

    /// Returns the square of `color`'s king, if it has one.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(Piece::King, color).lsb()
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    pub fn set_castling(&mut self, rights: CastlingRights) {
        self.castling = rights;
    }

    /// Returns the en passant target as a bitboard (empty or one bit).
    #[inline]
    pub fn en_passant(&self) -> Bitboard {
        self.en_passant
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant.lsb()
    }

    pub fn set_en_passant(&mut self, target: Bitboard) {
        debug_assert!(target.count() <= 1);
        self.en_passant = target;
    }

    /// Sum of material for `color`, kings excluded.
    pub fn material(&self, color: Color) -> i32 {
        Piece::ALL
            .into_iter()
            .filter(|&piece| piece != Piece::King)
            .map(|piece| piece.points() * self.pieces_of(piece, color).count() as i32)
            .sum()
    }

    /// Checks the representation invariants: colors are disjoint, piece
    /// kinds are disjoint, their union equals the occupied set, and the
    /// empty aggregate is its complement.
    pub fn is_consistent(&self) -> bool {
        if (self.colors[0] & self.colors[1]).is_not_empty() {
            return false;
        }
        let mut union = Bitboard::EMPTY;
        for piece in Piece::ALL {
            let bb = self.pieces[piece.index()];
            if (union & bb).is_not_empty() {
                return false;
            }
            union |= bb;
        }
        union == self.occupied() && self.empty_squares() == !self.occupied()
    }

    /// King steps from `origin` that do not land on `color`'s own pieces.
    pub fn king_attacks(&self, origin: Bitboard, color: Color) -> Bitboard {
        king_template(origin) & !self.color(color)
    }

    /// Knight jumps from `origin` that do not land on `color`'s own pieces.
    pub fn knight_attacks(&self, origin: Bitboard, color: Color) -> Bitboard {
        knight_template(origin) & !self.color(color)
    }

    /// Slider attacks from every square of `origin`, stopping at blockers
    /// and excluding squares held by `color`.
    pub fn sliding_attacks(&self, origin: Bitboard, color: Color, slide: Slide) -> Bitboard {
        let occupied = self.occupied();
        let attacks = match slide {
            Slide::Orthogonal => self.rays.orthogonal_attacks(origin, occupied),
            Slide::Diagonal => self.rays.diagonal_attacks(origin, occupied),
        };
        attacks & !self.color(color)
    }

    /// Pawn pushes (single, and double from the starting row) plus
    /// diagonal captures onto enemy pieces or the en passant target.
    pub fn pawn_moves(&self, origin: Bitboard, color: Color) -> Bitboard {
        let empty = self.empty_squares();
        let single = pawn_push(origin, color) & empty;
        let from_start = origin & Bitboard::row(color.pawn_row());
        let double = pawn_push(pawn_push(from_start, color) & empty, color) & empty;
        let targets = self.color(color.opposite()) | self.en_passant;
        single | double | (pawn_capture_template(origin, color) & targets)
    }

    /// Destination set for a piece of the given kind and color.
    pub fn destinations(&self, piece: Piece, origin: Bitboard, color: Color) -> Bitboard {
        match piece {
            Piece::Pawn => self.pawn_moves(origin, color),
            Piece::Knight => self.knight_attacks(origin, color),
            Piece::Bishop => self.sliding_attacks(origin, color, Slide::Diagonal),
            Piece::Rook => self.sliding_attacks(origin, color, Slide::Orthogonal),
            Piece::Queen => {
                self.sliding_attacks(origin, color, Slide::Orthogonal)
                    | self.sliding_attacks(origin, color, Slide::Diagonal)
            }
            Piece::King => self.king_attacks(origin, color),
            Piece::Empty => Bitboard::EMPTY,
        }
    }

    /// Returns true if any piece of `attacker` attacks `sq`.
    ///
    /// Each piece's movement template is projected backwards from the
    /// target and intersected with the attacker's pieces of that kind.
    pub fn square_attacked_by(&self, sq: Square, attacker: Color) -> bool {
        let target = Bitboard::from_square(sq);
        let occupied = self.occupied();
        let queens = self.pieces_of(Piece::Queen, attacker);

        if (pawn_capture_template(target, attacker.opposite())
            & self.pieces_of(Piece::Pawn, attacker))
        .is_not_empty()
        {
            return true;
        }
        if (knight_template(target) & self.pieces_of(Piece::Knight, attacker)).is_not_empty() {
            return true;
        }
        if (king_template(target) & self.pieces_of(Piece::King, attacker)).is_not_empty() {
            return true;
        }
        let rooks = self.pieces_of(Piece::Rook, attacker) | queens;
        if (self.rays.orthogonal_attacks(target, occupied) & rooks).is_not_empty() {
            return true;
        }
        let bishops = self.pieces_of(Piece::Bishop, attacker) | queens;
        (self.rays.diagonal_attacks(target, occupied) & bishops).is_not_empty()
    }

    /// Returns true if `color`'s king is attacked. A board without that
    /// king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.square_attacked_by(king, color.opposite()))
    }

    /// Moves a piece between two squares without capturing.
    pub fn apply_quiet(&mut self, mv: &Move) {
        let mask = Bitboard::from_square(mv.from()) | Bitboard::from_square(mv.to());
        self.pieces[mv.piece().index()] ^= mask;
        self.colors[mv.color().index()] ^= mask;
        self.refresh_empty();
    }

    /// Removes the captured piece from the destination, then moves.
    pub fn apply_capture(&mut self, mv: &Move) {
        let to = Bitboard::from_square(mv.to());
        self.pieces[mv.captured().index()] ^= to;
        self.colors[mv.color().opposite().index()] ^= to;
        self.apply_quiet(mv);
    }

    /// Moves king and rook of `color` for a castle on `side`.
    pub fn apply_castle(&mut self, side: CastleSide, color: Color) {
        let shift = 8 * color.home_row() as u32;
        let (king, rook) = castle_masks(side);
        let king = Bitboard(king << shift);
        let rook = Bitboard(rook << shift);
        self.pieces[Piece::King.index()] ^= king;
        self.pieces[Piece::Rook.index()] ^= rook;
        self.colors[color.index()] ^= king | rook;
        self.refresh_empty();
    }

    /// Moves the pawn diagonally and removes the enemy pawn beside its
    /// starting square.
    pub fn apply_en_passant_capture(&mut self, mv: &Move) {
        let path = Bitboard::from_square(mv.from()) | Bitboard::from_square(mv.to());
        let victim = Bitboard::from_square(mv.captured_square());
        self.pieces[Piece::Pawn.index()] ^= path | victim;
        self.colors[mv.color().index()] ^= path;
        self.colors[mv.color().opposite().index()] ^= victim;
        self.refresh_empty();
    }

    /// Replaces the pawn with the promotion piece, capturing on the way
    /// if the move captures.
    pub fn apply_promotion(&mut self, mv: &Move) {
        let from = Bitboard::from_square(mv.from());
        let to = Bitboard::from_square(mv.to());
        if mv.is_capture() {
            self.pieces[mv.captured().index()] ^= to;
            self.colors[mv.color().opposite().index()] ^= to;
        }
        self.pieces[Piece::Pawn.index()] ^= from;
        self.pieces[mv.target().index()] ^= to;
        self.colors[mv.color().index()] ^= from | to;
        self.refresh_empty();
    }

    /// Applies the placement change of a move. Applying the same move a
    /// second time undoes it.
    pub fn apply(&mut self, mv: &Move) {
        match mv.flag() {
            MoveFlag::Quiet => self.apply_quiet(mv),
            MoveFlag::Capture => self.apply_capture(mv),
            MoveFlag::KingCastle => self.apply_castle(CastleSide::KingSide, mv.color()),
            MoveFlag::QueenCastle => self.apply_castle(CastleSide::QueenSide, mv.color()),
            MoveFlag::EnPassantCapture => self.apply_en_passant_capture(mv),
            MoveFlag::Promotion => self.apply_promotion(mv),
        }
        debug_assert!(self.is_consistent());
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.colors == other.colors
            && self.castling == other.castling
            && self.en_passant == other.en_passant
    }
}

impl Eq for Board {}
