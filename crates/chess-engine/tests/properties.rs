//! Property tests over random legal move sequences.
//!
//! Each case plays a pseudo-random line by picking moves out of the legal
//! move list, then checks that the board stays well formed and that undo
//! walks the game back to where it started.

use chess_core::{Color, Piece};
use chess_engine::{Game, MoveError};
use proptest::prelude::*;

const START_FENS: [&str; 3] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1",
];

/// Plays up to `choices.len()` moves, stopping early if the game ends.
fn play_line(game: &mut Game, choices: &[usize]) -> usize {
    let mut played = 0;
    for &choice in choices {
        let moves = game.legal_moves();
        if moves.is_empty() {
            break;
        }
        game.make_move(&moves[choice % moves.len()]);
        played += 1;
    }
    played
}

fn assert_well_formed(game: &Game) {
    let board = game.board();
    assert!(board.is_consistent(), "{}", game.to_fen());
    for color in Color::BOTH {
        assert_eq!(board.pieces_of(Piece::King, color).count(), 1, "{}", game.to_fen());
    }
    assert_eq!(board.empty_squares(), !board.occupied());
    // The side that just moved never leaves its king attacked.
    assert!(!board.is_in_check(game.turn().opposite()), "{}", game.to_fen());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn undo_restores_the_start(
        start in 0usize..START_FENS.len(),
        choices in prop::collection::vec(any::<usize>(), 0..24),
    ) {
        let mut game = Game::from_fen(START_FENS[start]).unwrap();
        let initial = game.clone();
        let played = play_line(&mut game, &choices);
        prop_assert_eq!(game.history().len(), played);
        while game.undo_move().is_some() {}
        prop_assert_eq!(&game, &initial);
        prop_assert_eq!(game.to_fen(), START_FENS[start]);
    }

    #[test]
    fn every_position_is_well_formed(
        start in 0usize..START_FENS.len(),
        choices in prop::collection::vec(any::<usize>(), 0..24),
    ) {
        let mut game = Game::from_fen(START_FENS[start]).unwrap();
        for &choice in &choices {
            assert_well_formed(&game);
            let moves = game.legal_moves();
            if moves.is_empty() {
                break;
            }
            game.make_move(&moves[choice % moves.len()]);
        }
        assert_well_formed(&game);
    }

    #[test]
    fn each_move_round_trips(
        choices in prop::collection::vec(any::<usize>(), 0..16),
    ) {
        let mut game = Game::new();
        play_line(&mut game, &choices);
        let before = game.clone();
        let fen = game.to_fen();
        for mv in game.legal_moves() {
            game.make_move(&mv);
            prop_assert_eq!(game.undo_move(), Some(mv));
            prop_assert_eq!(&game, &before);
            prop_assert_eq!(game.to_fen(), fen.clone());
        }
    }

    #[test]
    fn fen_export_reimports(
        start in 0usize..START_FENS.len(),
        choices in prop::collection::vec(any::<usize>(), 0..24),
    ) {
        let mut game = Game::from_fen(START_FENS[start]).unwrap();
        play_line(&mut game, &choices);
        let fen = game.to_fen();
        let reloaded = Game::from_fen(&fen).unwrap();
        prop_assert_eq!(reloaded.to_fen(), fen);
        prop_assert_eq!(reloaded.board(), game.board());
    }

    #[test]
    fn rejected_moves_change_nothing(
        choices in prop::collection::vec(any::<usize>(), 0..16),
        from in 0u8..64,
        to in 0u8..64,
    ) {
        let mut game = Game::new();
        play_line(&mut game, &choices);
        let before = game.clone();
        let from = chess_core::Square::from_index(from).unwrap();
        let to = chess_core::Square::from_index(to).unwrap();
        match game.process_move(from, to, None) {
            Ok(mv) => {
                prop_assert_eq!(mv.from(), from);
                game.undo_move();
                prop_assert_eq!(&game, &before);
            }
            Err(err) => {
                prop_assert!(!matches!(err, MoveError::MalformedNotation(_)));
                prop_assert_eq!(&game, &before);
            }
        }
    }
}

#[test]
fn check_detection_by_rook_on_rank() {
    let game = Game::from_fen("8/8/8/8/8/8/8/r3K2k w - - 0 1").unwrap();
    assert!(game.is_check());
    let game = Game::from_fen("8/8/8/8/8/8/8/rN2K2k w - - 0 1").unwrap();
    assert!(!game.is_check());
}
