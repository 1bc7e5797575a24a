//! Bitboard chess rules engine.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets with de Bruijn bit scans and
//!   directional shifts
//! - [`RayTable`] - precomputed slider rays with blocker cut-off
//! - [`Board`] - piece placement, attack queries and reversible mutators
//! - [`Game`] - move legality, history and undo
//! - [`search()`] and [`perft()`] - material alpha-beta search and move
//!   tree counting
//! - SAN resolution and PGN replay
//!
//! # Architecture
//!
//! The board keeps one bitboard per piece kind and one per color. Every
//! board mutation is an XOR of masks, so a move is undone by applying it
//! again. Legality is decided by applying a candidate move, checking whether
//! the mover's king is attacked, and undoing it if so.
//!
//! # Example
//!
//! ```
//! use chess_engine::{perft, Game, GameStatus};
//!
//! let mut game = Game::new();
//! game.push_san("e4").unwrap();
//! game.push_san("e5").unwrap();
//! assert_eq!(game.status(), GameStatus::InProgress);
//! println!("Position after 1.e4 e5: {}", game.to_fen());
//!
//! assert_eq!(perft(&mut Game::new(), 2), 400);
//! ```

mod bitboard;
mod board;
mod error;
mod game;
mod moves;
mod perft;
pub mod pgn;
mod rays;
pub mod san;
mod search;

pub use bitboard::{bit_scan_forward, bit_scan_reverse, Bitboard, BitboardIter, Direction};
pub use board::{
    king_template, knight_template, pawn_capture_template, Board, CastlingRights, Slide,
};
pub use error::MoveError;
pub use game::{Game, GameStatus};
pub use moves::{Move, MoveFlag, Snapshot};
pub use perft::{perft, perft_divide};
pub use pgn::{replay_all, replay_pgn, Replay, ReplayError};
pub use rays::RayTable;
pub use san::resolve_san;
pub use search::{search, SearchResult};
