//! Bitboard representation and operations.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the
//! chess board. Bit `i` is square `i` in the `row * 8 + col` layout of
//! [`Square`], so a1 is bit 0 and h8 is bit 63.

use chess_core::Square;
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

const DEBRUIJN64: u64 = 0x03f7_9d71_b4cb_0a89;

#[rustfmt::skip]
const INDEX64: [u8; 64] = [
     0, 47,  1, 56, 48, 27,  2, 60,
    57, 49, 41, 37, 28, 16,  3, 61,
    54, 58, 35, 52, 50, 42, 21, 44,
    38, 32, 29, 23, 17, 11,  4, 62,
    46, 55, 26, 59, 40, 36, 15, 53,
    34, 51, 20, 43, 31, 22, 10, 45,
    25, 39, 14, 33, 19, 30,  9, 24,
    13, 18,  8, 12,  7,  6,  5, 63,
];

/// Returns the index of the least significant set bit.
///
/// The result is meaningless for an empty set; callers guard by OR-ing in a
/// sentinel bit.
#[inline]
pub const fn bit_scan_forward(bits: u64) -> u8 {
    debug_assert!(bits != 0);
    INDEX64[((bits ^ bits.wrapping_sub(1)).wrapping_mul(DEBRUIJN64) >> 58) as usize]
}

/// Returns the index of the most significant set bit.
///
/// The result is meaningless for an empty set.
#[inline]
pub const fn bit_scan_reverse(bits: u64) -> u8 {
    debug_assert!(bits != 0);
    let mut b = bits;
    b |= b >> 1;
    b |= b >> 2;
    b |= b >> 4;
    b |= b >> 8;
    b |= b >> 16;
    b |= b >> 32;
    INDEX64[(b.wrapping_mul(DEBRUIJN64) >> 58) as usize]
}

/// One of the eight compass directions on the board.
///
/// North is toward rank 8, east toward the h-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Rook directions.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Bishop directions.
    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// Returns the index used by the ray table.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns true if rays in this direction move toward higher bit indices.
    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::NorthEast | Direction::East | Direction::NorthWest
        )
    }

    /// Shifts every square of `bb` one step in this direction.
    #[inline]
    pub const fn shift(self, bb: Bitboard) -> Bitboard {
        match self {
            Direction::North => bb.north(),
            Direction::NorthEast => bb.north_east(),
            Direction::East => bb.east(),
            Direction::SouthEast => bb.south_east(),
            Direction::South => bb.south(),
            Direction::SouthWest => bb.south_west(),
            Direction::West => bb.west(),
            Direction::NorthWest => bb.north_west(),
        }
    }
}

/// A set of squares.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    /// No squares.
    pub const EMPTY: Bitboard = Bitboard(0);

    /// All 64 squares.
    pub const FULL: Bitboard = Bitboard(!0);

    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_H: Bitboard = Bitboard(0x8080_8080_8080_8080);

    /// Everything except the a-file; masks out bits that wrapped eastward.
    pub const NOT_A_FILE: Bitboard = Bitboard(!Self::FILE_A.0);

    /// Everything except the h-file; masks out bits that wrapped westward.
    pub const NOT_H_FILE: Bitboard = Bitboard(!Self::FILE_H.0);

    pub const RANK_1: Bitboard = Bitboard(0x0000_0000_0000_00FF);
    pub const RANK_8: Bitboard = Bitboard(0xFF00_0000_0000_0000);

    /// Creates a bitboard from a raw u64.
    #[inline]
    pub const fn new(bits: u64) -> Self {
        Bitboard(bits)
    }

    /// Creates a bitboard with a single square set.
    #[inline]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(sq.bit())
    }

    /// Creates a bitboard holding every square of a row (0 = rank 1).
    #[inline]
    pub const fn row(row: u8) -> Self {
        Bitboard(Self::RANK_1.0 << (8 * row as u32))
    }

    /// Returns true if no square is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if at least one square is set.
    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// Returns the number of set squares.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns true if the given square is set.
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & sq.bit() != 0
    }

    /// Sets the given square.
    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= sq.bit();
    }

    /// Toggles the given square.
    #[inline]
    pub fn toggle(&mut self, sq: Square) {
        self.0 ^= sq.bit();
    }

    /// Returns the lowest set square, if any.
    #[inline]
    pub fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Square::from_index(bit_scan_forward(self.0))
        }
    }

    /// Removes and returns the lowest set square.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    /// Shifts the set toward rank 8.
    #[inline]
    pub const fn north(self) -> Bitboard {
        Bitboard(self.0 << 8)
    }

    /// Shifts the set toward rank 1.
    #[inline]
    pub const fn south(self) -> Bitboard {
        Bitboard(self.0 >> 8)
    }

    /// Shifts the set toward the h-file.
    #[inline]
    pub const fn east(self) -> Bitboard {
        Bitboard((self.0 << 1) & Self::NOT_A_FILE.0)
    }

    /// Shifts the set toward the a-file.
    #[inline]
    pub const fn west(self) -> Bitboard {
        Bitboard((self.0 >> 1) & Self::NOT_H_FILE.0)
    }

    #[inline]
    pub const fn north_east(self) -> Bitboard {
        Bitboard((self.0 << 9) & Self::NOT_A_FILE.0)
    }

    #[inline]
    pub const fn north_west(self) -> Bitboard {
        Bitboard((self.0 << 7) & Self::NOT_H_FILE.0)
    }

    #[inline]
    pub const fn south_east(self) -> Bitboard {
        Bitboard((self.0 >> 7) & Self::NOT_A_FILE.0)
    }

    #[inline]
    pub const fn south_west(self) -> Bitboard {
        Bitboard((self.0 >> 9) & Self::NOT_H_FILE.0)
    }
}

impl From<Square> for Bitboard {
    #[inline]
    fn from(sq: Square) -> Self {
        Bitboard::from_square(sq)
    }
}

impl BitAnd for Bitboard {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Self;
    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Self;
    #[inline]
    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard({:#018x})", self.0)?;
        for row in (0..8).rev() {
            write!(f, "{} ", row + 1)?;
            for col in 0..8 {
                let mark = if (self.0 >> (row * 8 + col)) & 1 == 1 { 'X' } else { '.' };
                write!(f, "{mark} ")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}

/// Iterator over the squares of a bitboard, lowest index first.
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.count() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn scans_on_single_bits() {
        for i in 0..64u8 {
            let bits = 1u64 << i;
            assert_eq!(bit_scan_forward(bits), i);
            assert_eq!(bit_scan_reverse(bits), i);
        }
    }

    #[test]
    fn scans_pick_the_extremes() {
        let bits = (1u64 << 3) | (1u64 << 17) | (1u64 << 60);
        assert_eq!(bit_scan_forward(bits), 3);
        assert_eq!(bit_scan_reverse(bits), 60);
        assert_eq!(bit_scan_forward(!0), 0);
        assert_eq!(bit_scan_reverse(!0), 63);
    }

    #[test]
    fn shifts_do_not_wrap_files() {
        let h_file = Bitboard::FILE_H;
        assert!(h_file.east().is_empty());
        assert!(h_file.north_east().is_empty());
        assert!(h_file.south_east().is_empty());
        let a_file = Bitboard::FILE_A;
        assert!(a_file.west().is_empty());
        assert!(a_file.north_west().is_empty());
        assert!(a_file.south_west().is_empty());
        assert!(Bitboard::RANK_8.north().is_empty());
        assert!(Bitboard::RANK_1.south().is_empty());
    }

    #[test]
    fn shifts_move_one_square() {
        let e4 = Bitboard::from_square(sq("e4"));
        assert_eq!(e4.north(), Bitboard::from_square(sq("e5")));
        assert_eq!(e4.north_east(), Bitboard::from_square(sq("f5")));
        assert_eq!(e4.east(), Bitboard::from_square(sq("f4")));
        assert_eq!(e4.south_east(), Bitboard::from_square(sq("f3")));
        assert_eq!(e4.south(), Bitboard::from_square(sq("e3")));
        assert_eq!(e4.south_west(), Bitboard::from_square(sq("d3")));
        assert_eq!(e4.west(), Bitboard::from_square(sq("d4")));
        assert_eq!(e4.north_west(), Bitboard::from_square(sq("d5")));
    }

    #[test]
    fn direction_sign_matches_shift() {
        let e4 = Bitboard::from_square(sq("e4"));
        for dir in Direction::ALL {
            let moved = dir.shift(e4).0;
            assert_eq!(moved > e4.0, dir.is_positive(), "{dir:?}");
        }
    }

    #[test]
    fn iterator_in_index_order() {
        let squares: Vec<Square> = Bitboard::FILE_A.into_iter().collect();
        assert_eq!(squares.len(), 8);
        assert_eq!(squares[0], Square::A1);
        assert_eq!(squares[7], Square::A8);
        assert_eq!(Bitboard::row(1).count(), 8);
        assert!(Bitboard::row(1).contains(sq("e2")));
    }

    #[test]
    fn pop_lsb_drains() {
        let mut bb = Bitboard::new(0b1010);
        assert_eq!(bb.pop_lsb().map(|s| s.index()), Some(1));
        assert_eq!(bb.pop_lsb().map(|s| s.index()), Some(3));
        assert_eq!(bb.pop_lsb(), None);
    }

    proptest! {
        #[test]
        fn scans_agree_with_intrinsics(bits in 1u64..=u64::MAX) {
            prop_assert_eq!(bit_scan_forward(bits) as u32, bits.trailing_zeros());
            prop_assert_eq!(bit_scan_reverse(bits) as u32, 63 - bits.leading_zeros());
        }
    }
}
