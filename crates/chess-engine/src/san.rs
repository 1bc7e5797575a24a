//! Standard Algebraic Notation (SAN) parsing.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"
//!
//! A SAN token is resolved against the legal moves of the current position
//! and turned into a [`MoveInput`] for the game to apply.

use chess_core::{CastleSide, File, MoveInput, Piece, Rank, Square};

use crate::error::MoveError;
use crate::game::Game;
use crate::moves::Move;

/// Parsed components of a SAN string.
#[derive(Debug, PartialEq, Eq)]
struct ParsedSan {
    piece: Piece,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to_square: Square,
    promotion: Option<Piece>,
}

fn malformed(reason: String) -> MoveError {
    MoveError::MalformedNotation(reason)
}

/// Resolves a SAN token to the unique legal move it names.
///
/// The game is left unchanged.
pub fn resolve_san(game: &mut Game, san: &str) -> Result<MoveInput, MoveError> {
    let san = san.trim();
    let stripped = san.trim_end_matches(['+', '#', '!', '?']);
    if stripped.is_empty() {
        return Err(malformed(format!("empty move: '{san}'")));
    }

    match stripped {
        "O-O" | "0-0" => return Ok(MoveInput::Castle(CastleSide::KingSide)),
        "O-O-O" | "0-0-0" => return Ok(MoveInput::Castle(CastleSide::QueenSide)),
        _ => {}
    }

    let parsed = parse_san_components(stripped)?;
    let matching: Vec<Move> = game
        .legal_moves()
        .into_iter()
        .filter(|mv| matches(&parsed, mv))
        .collect();

    match matching.as_slice() {
        [] => Err(malformed(format!("no legal move matches {san}"))),
        [mv] => Ok(MoveInput::Coordinates {
            from: mv.from(),
            to: mv.to(),
            promotion: mv.promotion(),
        }),
        _ => Err(malformed(format!(
            "{san} is ambiguous between {} moves",
            matching.len()
        ))),
    }
}

fn matches(parsed: &ParsedSan, mv: &Move) -> bool {
    if mv.flag().is_castle() || mv.piece() != parsed.piece || mv.to() != parsed.to_square {
        return false;
    }
    if parsed.from_file.is_some_and(|file| mv.from().file() != file) {
        return false;
    }
    if parsed.from_rank.is_some_and(|rank| mv.from().rank() != rank) {
        return false;
    }
    match mv.promotion() {
        Some(kind) => kind == parsed.promotion.unwrap_or(Piece::Queen),
        None => parsed.promotion.is_none(),
    }
}

fn parse_san_components(san: &str) -> Result<ParsedSan, MoveError> {
    if !san.is_ascii() {
        return Err(malformed(format!("non-ASCII move: {san}")));
    }

    let mut rest = san;

    // Piece letter
    let piece = match rest.chars().next().and_then(Piece::from_san_char) {
        Some(piece) => {
            rest = &rest[1..];
            piece
        }
        None => Piece::Pawn,
    };

    // Promotion, with or without '='
    let mut promotion = None;
    if let Some((body, promo)) = rest.split_once('=') {
        let kind = single_piece(promo)
            .ok_or_else(|| malformed(format!("invalid promotion in {san}")))?;
        promotion = Some(kind);
        rest = body;
    } else if piece == Piece::Pawn {
        if let Some(kind) = rest.chars().last().and_then(Piece::from_san_char) {
            promotion = Some(kind);
            rest = &rest[..rest.len() - 1];
        }
    }
    if promotion.is_some() && piece != Piece::Pawn {
        return Err(malformed(format!("only pawns promote: {san}")));
    }

    let body: Vec<char> = rest.chars().filter(|&c| c != 'x').collect();
    if body.len() < 2 {
        return Err(malformed(format!("missing destination in {san}")));
    }
    let (disambig, dest) = body.split_at(body.len() - 2);
    let to_square = File::from_char(dest[0])
        .zip(Rank::from_char(dest[1]))
        .map(|(file, rank)| Square::new(file, rank))
        .ok_or_else(|| malformed(format!("invalid destination in {san}")))?;

    let (from_file, from_rank) = parse_disambiguation(disambig)
        .ok_or_else(|| malformed(format!("invalid disambiguation in {san}")))?;

    Ok(ParsedSan {
        piece,
        from_file,
        from_rank,
        to_square,
        promotion,
    })
}

fn single_piece(text: &str) -> Option<Piece> {
    let mut chars = text.chars();
    let piece = chars.next().and_then(Piece::from_san_char)?;
    chars.next().is_none().then_some(piece)
}

fn parse_disambiguation(chars: &[char]) -> Option<(Option<File>, Option<Rank>)> {
    match chars {
        [] => Some((None, None)),
        [c] => match (File::from_char(*c), Rank::from_char(*c)) {
            (Some(file), _) => Some((Some(file), None)),
            (_, Some(rank)) => Some((None, Some(rank))),
            _ => None,
        },
        [f, r] => Some((Some(File::from_char(*f)?), Some(Rank::from_char(*r)?))),
        _ => None,
    }
}
