//! Replaying games recorded in Portable Game Notation (PGN).
//!
//! Only what is needed to replay the main line is understood: tag pairs,
//! SAN move tokens, move numbers and the result token. Comments, variations
//! and numeric annotation glyphs are skipped.

use chess_core::FenError;
use thiserror::Error;
use tracing::debug;

use crate::error::MoveError;
use crate::game::Game;

/// Result tokens that end a game's movetext.
const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Errors from replaying a PGN game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("invalid FEN tag: {0}")]
    Fen(#[from] FenError),

    #[error("ply {ply} ({token}): {source}")]
    Move {
        ply: usize,
        token: String,
        #[source]
        source: MoveError,
    },

    #[error("unterminated {0}")]
    Unterminated(&'static str),

    #[error("no game found")]
    Empty,
}

/// A replayed game.
#[derive(Debug, Clone)]
pub struct Replay {
    /// Final state after every move has been applied.
    pub game: Game,
    /// Tag pairs in file order.
    pub tags: Vec<(String, String)>,
    /// The declared result, from the movetext or the `Result` tag.
    pub result: Option<String>,
    /// Number of half-moves applied.
    pub plies: usize,
}

impl Replay {
    /// Looks up a tag value by name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Replays the first game in `text`.
pub fn replay_pgn(text: &str) -> Result<Replay, ReplayError> {
    split_games(text)
        .into_iter()
        .next()
        .ok_or(ReplayError::Empty)
        .and_then(replay_one)
}

/// Replays every game in `text`, in order.
pub fn replay_all(text: &str) -> Result<Vec<Replay>, ReplayError> {
    split_games(text).into_iter().map(replay_one).collect()
}

/// Splits a PGN database into one chunk per game. A tag line that follows
/// movetext starts a new game.
fn split_games(text: &str) -> Vec<String> {
    let mut games = Vec::new();
    let mut current = String::new();
    let mut seen_moves = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') && seen_moves {
            games.push(std::mem::take(&mut current));
            seen_moves = false;
        }
        if !trimmed.is_empty() && !trimmed.starts_with('[') {
            seen_moves = true;
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        games.push(current);
    }
    games
}

fn replay_one(text: String) -> Result<Replay, ReplayError> {
    let (tags, movetext) = parse_tags(&text);
    let mut game = match tags.iter().find(|(key, _)| key == "FEN") {
        Some((_, fen)) => Game::from_fen(fen)?,
        None => Game::new(),
    };

    let mut result = None;
    let mut plies = 0;
    for token in movetext_tokens(&movetext)? {
        if RESULT_TOKENS.contains(&token.as_str()) {
            result = Some(token);
            break;
        }
        game.push_san(&token).map_err(|source| ReplayError::Move {
            ply: plies + 1,
            token: token.clone(),
            source,
        })?;
        plies += 1;
    }

    let result = result.or_else(|| {
        tags.iter()
            .find(|(key, _)| key == "Result")
            .map(|(_, value)| value.clone())
    });
    debug!(plies, result = ?result, "game replayed");

    Ok(Replay {
        game,
        tags,
        result,
        plies,
    })
}

/// Separates `[Key "Value"]` lines from the movetext.
fn parse_tags(text: &str) -> (Vec<(String, String)>, String) {
    let mut tags = Vec::new();
    let mut movetext = String::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(inner) = trimmed.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            if let Some((key, value)) = inner.split_once(char::is_whitespace) {
                let value = value.trim().trim_matches('"');
                tags.push((key.to_string(), value.to_string()));
            }
            continue;
        }
        movetext.push_str(line);
        movetext.push('\n');
    }
    (tags, movetext)
}

/// Extracts SAN and result tokens from movetext, dropping comments,
/// variations, annotation glyphs and move numbers.
fn movetext_tokens(movetext: &str) -> Result<Vec<String>, ReplayError> {
    let mut cleaned = String::with_capacity(movetext.len());
    let mut chars = movetext.chars();
    let mut depth = 0usize;
    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if !chars.by_ref().any(|c| c == '}') {
                    return Err(ReplayError::Unterminated("comment"));
                }
                cleaned.push(' ');
            }
            ';' => {
                chars.by_ref().find(|&c| c == '\n');
                cleaned.push(' ');
            }
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                cleaned.push(' ');
            }
            _ if depth > 0 => {}
            _ => cleaned.push(c),
        }
    }
    if depth > 0 {
        return Err(ReplayError::Unterminated("variation"));
    }

    let mut tokens = Vec::new();
    for raw in cleaned.split_whitespace() {
        if raw.starts_with('$') {
            continue;
        }
        // Castling written with zeros and result tokens start with digits,
        // so check those before stripping a move number.
        if RESULT_TOKENS.contains(&raw) || raw.starts_with("0-0") {
            tokens.push(raw.to_string());
            continue;
        }
        let san = match raw.rfind('.') {
            Some(dot) => &raw[dot + 1..],
            None => raw,
        };
        if !san.is_empty() {
            tokens.push(san.to_string());
        }
    }
    Ok(tokens)
}
