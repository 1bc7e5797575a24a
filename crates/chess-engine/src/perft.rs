//! Perft (performance test) for validating legal move enumeration.
//!
//! Perft counts the leaf nodes of the legal move tree at a fixed depth,
//! which can be compared against published reference counts.

use tracing::debug;

use crate::game::Game;

/// Counts the leaf nodes at the given depth. The game is restored before
/// returning.
pub fn perft(game: &mut Game, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = game.legal_moves();

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for mv in &moves {
        game.make_move(mv);
        nodes += perft(game, depth - 1);
        game.undo_move();
    }
    nodes
}

/// Perft split by root move, sorted by move text.
/// Useful for locating which root move has an incorrect count.
pub fn perft_divide(game: &mut Game, depth: u32) -> Vec<(String, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let moves = game.legal_moves();
    let mut results = Vec::with_capacity(moves.len());

    for mv in &moves {
        game.make_move(mv);
        results.push((mv.to_uci(), perft(game, depth - 1)));
        game.undo_move();
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    let total: u64 = results.iter().map(|(_, n)| n).sum();
    debug!(depth, moves = results.len(), nodes = total, "perft divide finished");
    results
}
