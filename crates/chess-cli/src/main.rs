//! Command-line front end for the chess engine.
//!
//! Runs perft counts, material searches and PGN replays against the engine.

mod config;

use std::path::PathBuf;

use anyhow::Context;
use chess_engine::{perft, perft_divide, replay_all, search, Game};
use clap::{Parser, Subcommand};
use config::EngineConfig;

#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Bitboard chess engine: perft, search and PGN replay")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "chess.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count leaf nodes of the legal move tree
    Perft {
        /// Position to start from (defaults to the configured start position)
        #[arg(long)]
        fen: Option<String>,
        /// Depth in plies
        #[arg(short, long)]
        depth: Option<u32>,
        /// Print the count for each root move
        #[arg(long)]
        divide: bool,
    },
    /// Find the best move by material alpha-beta search
    Search {
        /// Position to search (defaults to the configured start position)
        #[arg(long)]
        fen: Option<String>,
        /// Depth in plies
        #[arg(short, long)]
        depth: Option<u32>,
    },
    /// Replay the games of a PGN file and print their final positions
    Replay {
        /// PGN file to replay
        file: PathBuf,
    },
}

fn load_game(fen: Option<String>, config: &EngineConfig) -> anyhow::Result<Game> {
    let fen = fen.unwrap_or_else(|| config.start_fen.clone());
    Game::from_fen(&fen).with_context(|| format!("invalid FEN: {fen}"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = EngineConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Commands::Perft { fen, depth, divide } => {
            let mut game = load_game(fen, &config)?;
            let depth = depth.unwrap_or(config.perft.depth);
            tracing::info!(depth, fen = %game.to_fen(), "running perft");
            if divide {
                let results = perft_divide(&mut game, depth);
                for (mv, nodes) in &results {
                    println!("{mv}: {nodes}");
                }
                let total: u64 = results.iter().map(|(_, n)| n).sum();
                println!();
                println!("Nodes searched: {total}");
            } else {
                println!("{}", perft(&mut game, depth));
            }
        }
        Commands::Search { fen, depth } => {
            let mut game = load_game(fen, &config)?;
            let depth = depth.unwrap_or(config.search.depth);
            tracing::info!(depth, fen = %game.to_fen(), "searching");
            match search(&mut game, depth) {
                Some(result) => println!(
                    "bestmove {} score {} nodes {}",
                    result.best_move, result.score, result.nodes
                ),
                None => println!("bestmove (none) status {:?}", game.status()),
            }
        }
        Commands::Replay { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            tracing::info!(file = %file.display(), "replaying");
            for (i, mut replay) in replay_all(&text)?.into_iter().enumerate() {
                let status = replay.game.status();
                println!(
                    "game {}: {} plies, result {}, status {}",
                    i + 1,
                    replay.plies,
                    replay.result.as_deref().unwrap_or("*"),
                    status.result_token()
                );
                println!("{}", replay.game.to_fen());
            }
        }
    }

    Ok(())
}
