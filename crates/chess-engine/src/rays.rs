//! Sliding-piece attacks from a precomputed ray table.
//!
//! Each entry of the table is the full ray a slider would sweep from a square
//! in one direction on an empty board. Attacks on a real board look up that
//! ray, find the nearest blocker with a bit scan, and cut the ray off beyond
//! it by XOR-ing away the ray that starts at the blocker.

use crate::bitboard::{bit_scan_forward, bit_scan_reverse, Bitboard, Direction};
use chess_core::Square;

/// Sentinel for scans toward higher indices: h8 has no positive rays.
const POSITIVE_SENTINEL: u64 = 1 << 63;

/// Sentinel for scans toward lower indices: a1 has no negative rays.
const NEGATIVE_SENTINEL: u64 = 1;

/// Full-length rays for every square and direction.
#[derive(Clone, PartialEq, Eq)]
pub struct RayTable {
    rays: [[Bitboard; 8]; 64],
}

impl RayTable {
    /// Builds the table by walking every direction from every square.
    pub fn new() -> Self {
        let mut rays = [[Bitboard::EMPTY; 8]; 64];
        for sq in Square::all() {
            for dir in Direction::ALL {
                let mut ray = Bitboard::EMPTY;
                let mut step = dir.shift(Bitboard::from_square(sq));
                while step.is_not_empty() {
                    ray |= step;
                    step = dir.shift(step);
                }
                rays[sq.index() as usize][dir.index()] = ray;
            }
        }
        RayTable { rays }
    }

    /// Returns the unobstructed ray from `sq` toward `dir`.
    #[inline]
    pub fn ray(&self, sq: Square, dir: Direction) -> Bitboard {
        self.rays[sq.index() as usize][dir.index()]
    }

    #[inline]
    fn ray_at(&self, index: u8, dir: Direction) -> Bitboard {
        self.rays[index as usize][dir.index()]
    }

    /// Attacks along a direction that grows toward higher bit indices,
    /// stopping at (and including) the first occupied square.
    #[inline]
    pub fn positive_ray_attack(&self, sq: Square, dir: Direction, occupied: Bitboard) -> Bitboard {
        debug_assert!(dir.is_positive());
        let ray = self.ray(sq, dir);
        let blockers = ray & occupied;
        let nearest = bit_scan_forward(blockers.0 | POSITIVE_SENTINEL);
        ray ^ self.ray_at(nearest, dir)
    }

    /// Attacks along a direction that grows toward lower bit indices,
    /// stopping at (and including) the first occupied square.
    #[inline]
    pub fn negative_ray_attack(&self, sq: Square, dir: Direction, occupied: Bitboard) -> Bitboard {
        debug_assert!(!dir.is_positive());
        let ray = self.ray(sq, dir);
        let blockers = ray & occupied;
        let nearest = bit_scan_reverse(blockers.0 | NEGATIVE_SENTINEL);
        ray ^ self.ray_at(nearest, dir)
    }

    /// Attacks along any direction.
    #[inline]
    pub fn ray_attack(&self, sq: Square, dir: Direction, occupied: Bitboard) -> Bitboard {
        if dir.is_positive() {
            self.positive_ray_attack(sq, dir, occupied)
        } else {
            self.negative_ray_attack(sq, dir, occupied)
        }
    }

    /// Rook-style attacks from every square in `origins`.
    pub fn orthogonal_attacks(&self, origins: Bitboard, occupied: Bitboard) -> Bitboard {
        let mut attacks = Bitboard::EMPTY;
        for sq in origins {
            attacks |= self.positive_ray_attack(sq, Direction::North, occupied);
            attacks |= self.positive_ray_attack(sq, Direction::East, occupied);
            attacks |= self.negative_ray_attack(sq, Direction::South, occupied);
            attacks |= self.negative_ray_attack(sq, Direction::West, occupied);
        }
        attacks
    }

    /// Bishop-style attacks from every square in `origins`.
    pub fn diagonal_attacks(&self, origins: Bitboard, occupied: Bitboard) -> Bitboard {
        let mut attacks = Bitboard::EMPTY;
        for sq in origins {
            attacks |= self.positive_ray_attack(sq, Direction::NorthEast, occupied);
            attacks |= self.positive_ray_attack(sq, Direction::NorthWest, occupied);
            attacks |= self.negative_ray_attack(sq, Direction::SouthEast, occupied);
            attacks |= self.negative_ray_attack(sq, Direction::SouthWest, occupied);
        }
        attacks
    }
}

impl Default for RayTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RayTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RayTable { .. }")
    }
}
