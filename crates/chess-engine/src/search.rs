//! Material-only minimax search with alpha-beta pruning.
//!
//! Positions are never evaluated statically. A line's value is the running
//! material differential of its captures: the root side adds the points of
//! what it captures and subtracts the points of what it loses. A mated node
//! is worth the king's points, and a stalemate is worth nothing.

use chess_core::KING_POINTS;
use tracing::debug;

use crate::game::Game;
use crate::moves::Move;

/// Outcome of a search from the root position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move for the side to move.
    pub best_move: Move,
    /// Score of the best line, from the root side's perspective.
    pub score: i32,
    /// Nodes visited.
    pub nodes: u64,
}

/// Counts the nodes visited during one search.
struct Searcher {
    nodes: u64,
}

impl Searcher {
    fn new() -> Self {
        Searcher { nodes: 0 }
    }

    /// Returns the node value and the move that achieves it.
    fn alpha_beta(
        &mut self,
        game: &mut Game,
        depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> (i32, Option<Move>) {
        self.nodes += 1;

        // Material is accumulated by the parent, so a leaf adds nothing.
        if depth == 0 {
            return (0, None);
        }

        let moves = game.legal_moves();
        if moves.is_empty() {
            let score = if !game.is_check() {
                0
            } else if maximizing {
                -KING_POINTS
            } else {
                KING_POINTS
            };
            return (score, None);
        }

        let mut best_move = None;
        if maximizing {
            let mut best = i32::MIN;
            for mv in &moves {
                game.make_move(mv);
                let (child, _) = self.alpha_beta(game, depth - 1, false, alpha, beta);
                game.undo_move();
                let value = child + mv.points();
                if value > best {
                    best = value;
                    best_move = Some(*mv);
                }
                alpha = alpha.max(best);
                if beta <= alpha {
                    break;
                }
            }
            (best, best_move)
        } else {
            let mut best = i32::MAX;
            for mv in &moves {
                game.make_move(mv);
                let (child, _) = self.alpha_beta(game, depth - 1, true, alpha, beta);
                game.undo_move();
                let value = child - mv.points();
                if value < best {
                    best = value;
                    best_move = Some(*mv);
                }
                beta = beta.min(best);
                if beta <= alpha {
                    break;
                }
            }
            (best, best_move)
        }
    }
}

/// Finds the best move for the side to move, looking `depth` plies ahead.
///
/// Returns `None` at depth 0 or when the side to move has no legal move.
/// The game is restored before returning.
pub fn search(game: &mut Game, depth: u32) -> Option<SearchResult> {
    if depth == 0 {
        return None;
    }

    let mut searcher = Searcher::new();
    let (score, best_move) = searcher.alpha_beta(game, depth, true, i32::MIN, i32::MAX);
    let best_move = best_move?;

    debug!(
        depth,
        nodes = searcher.nodes,
        score,
        best = %best_move,
        "search finished"
    );

    Some(SearchResult {
        best_move,
        score,
        nodes: searcher.nodes,
    })
}
