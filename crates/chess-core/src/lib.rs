//! Core types for chess.
//!
//! This crate provides the vocabulary shared by the engine and its front ends:
//! - [`Piece`] (with the [`Piece::Empty`] sentinel) and [`Color`]
//! - [`Square`], [`File`], and [`Rank`], with the algebraic square encoding
//! - [`MoveInput`] and [`CastleSide`], the move-input interface
//! - [`FenRecord`] for FEN parsing and serialization

mod color;
mod fen;
mod input;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenRecord};
pub use input::{CastleSide, MoveInput};
pub use piece::{Piece, KING_POINTS};
pub use square::{File, Rank, Square};
