//! Checkers-Rust: a checkers engine with a minimax / alpha-beta opponent.
//!
//! ## Usage
//!
//! - `checkers-rust` - Show a demo
//! - `checkers-rust play` - Human vs human over the text protocol
//! - `checkers-rust play --ai red` - Human (White) vs engine (Red)
//! - `checkers-rust selfplay` - Watch the engine play itself
//!
//! Set `RUST_LOG=debug` to see search statistics on stderr.

use std::io;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use checkers_rust::board::{Board, Rules};
use checkers_rust::constants::{DEFAULT_DEPTH, MAX_DEPTH, MAX_GAME_MOVES, MIN_DEPTH};
use checkers_rust::game::Game;
use checkers_rust::piece::Color;
use checkers_rust::protocol::Engine;
use checkers_rust::search::{Algorithm, search};

/// Checkers-Rust: checkers with a minimax / alpha-beta opponent
#[derive(Parser)]
#[command(name = "checkers-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play over the line protocol on stdin/stdout
    Play {
        /// Color the engine plays automatically (human vs AI)
        #[arg(long)]
        ai: Option<Color>,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Let the engine play both sides
    Selfplay {
        #[command(flatten)]
        engine: EngineArgs,
        /// Moves before the game is declared a draw
        #[arg(long, default_value_t = MAX_GAME_MOVES)]
        max_moves: usize,
        /// Random plies played before the engines take over
        #[arg(long, default_value_t = 0)]
        random_opening: usize,
        /// Seed for the random opening
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Run a simple demo of the engine
    Demo,
}

#[derive(Args)]
struct EngineArgs {
    /// Search depth in plies
    #[arg(long, default_value_t = DEFAULT_DEPTH,
          value_parser = clap::value_parser!(u32).range(MIN_DEPTH as i64..=MAX_DEPTH as i64))]
    depth: u32,
    /// Search routine: minimax or alphabeta
    #[arg(long, default_value_t = Algorithm::AlphaBeta)]
    algorithm: Algorithm,
    /// A side that can capture must capture
    #[arg(long)]
    forced_capture: bool,
    /// A side with no legal move loses
    #[arg(long)]
    no_move_loses: bool,
}

impl EngineArgs {
    fn rules(&self) -> Rules {
        Rules {
            forced_capture: self.forced_capture,
            no_move_loses: self.no_move_loses,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Play { ai, engine }) => {
            let mut protocol =
                Engine::with_settings(engine.rules(), engine.depth, engine.algorithm).auto_play(ai);
            protocol.run(io::stdin().lock(), io::stdout())
        }
        Some(Commands::Selfplay {
            engine,
            max_moves,
            random_opening,
            seed,
        }) => {
            run_selfplay(&engine, max_moves, random_opening, seed);
            Ok(())
        }
        Some(Commands::Demo) | None => {
            run_demo();
            Ok(())
        }
    }
}

/// Play `plies` uniformly random legal moves.
fn random_opening(game: &mut Game, plies: usize, seed: u64) {
    let mut rng = fastrand::Rng::with_seed(seed);
    for _ in 0..plies {
        if game.winner().is_some() {
            return;
        }
        let moves = game.board().all_moves(game.turn());
        if moves.is_empty() {
            return;
        }
        let mv = &moves[rng.usize(..moves.len())];
        let mut next = game.board().clone();
        if next.make_move(mv).is_none() {
            return;
        }
        println!("{} plays {mv} (random)", game.turn());
        game.adopt_board(next);
    }
}

fn run_selfplay(engine: &EngineArgs, max_moves: usize, plies: usize, seed: u64) {
    let mut game = Game::with_rules(engine.rules());
    random_opening(&mut game, plies, seed);

    while game.moves_played() < max_moves {
        println!("{}", game.board());
        if let Some(winner) = game.winner() {
            println!("Game over! {winner} wins after {} moves", game.moves_played());
            return;
        }

        let color = game.turn();
        let start = std::time::Instant::now();
        let result = search(game.board(), color, engine.depth, engine.algorithm);
        let Some(next) = result.best_board else {
            println!("{color} has no move, {} wins", color.opponent());
            return;
        };
        info!(
            %color,
            score = result.score,
            nodes = result.nodes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "engine move"
        );
        if let Some(mv) = &result.best_move {
            println!("Move {}: {color} plays {mv}", game.moves_played() + 1);
        }
        game.adopt_board(next);
    }
    println!("{}", game.board());
    println!("Draw: move limit of {max_moves} reached");
}

fn run_demo() {
    println!("Checkers-Rust: checkers with minimax and alpha-beta\n");

    let board = Board::new();
    println!("=== Starting position ===");
    println!("{board}");
    println!("Evaluation: {}", board.evaluate());

    println!("\n=== Search Demo (depth {DEFAULT_DEPTH}) ===");
    for algorithm in [Algorithm::Minimax, Algorithm::AlphaBeta] {
        let result = search(&board, Color::White, DEFAULT_DEPTH, algorithm);
        match &result.best_move {
            Some(mv) => println!(
                "{algorithm}: {mv} (score {}, {} nodes)",
                result.score, result.nodes
            ),
            None => println!("{algorithm}: no move"),
        }
    }
}
