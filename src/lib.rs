//! Checkers-Rust: a checkers (draughts) engine with a fixed-depth search opponent.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, evaluation weights and search limits
//! - [`piece`] - Colors, pieces and squares
//! - [`board`] - Board state, move generation, captures and evaluation
//! - [`game`] - Turn-taking state machine for selecting and moving pieces
//! - [`search`] - Minimax and alpha-beta search
//! - [`protocol`] - Text command loop for interactive play
//!
//! ## Example
//!
//! ```
//! use checkers_rust::game::Game;
//! use checkers_rust::search::Algorithm;
//!
//! let mut game = Game::new();
//!
//! // White moves a piece from (2, 1) to (3, 2)
//! assert!(game.select(2, 1));
//! assert!(game.select(3, 2));
//!
//! // Red answers with a depth-4 alpha-beta search
//! let score = game.ai_move(4, Algorithm::AlphaBeta);
//! assert!(score.is_some());
//! println!("{}", game.board());
//! ```

pub mod board;
pub mod constants;
pub mod game;
pub mod piece;
pub mod protocol;
pub mod search;
