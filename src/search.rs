//! Fixed-depth adversarial search: plain minimax and alpha-beta pruning.
//!
//! Both searches walk the same tree. White is always the maximizing side and
//! Red the minimizing side, matching the sign of [`Board::evaluate`]. A node
//! is terminal when the depth is exhausted or the position has a winner.
//!
//! The tree is explored on a single working copy of the caller's board using
//! [`Board::make_move`]/[`Board::unmake_move`], so no position is ever shared
//! between branches. Only the best successor at the root is materialized as a
//! separate board.
//!
//! The two algorithms break ties differently:
//! - minimax replaces its best move when a later successor scores equal to it
//!   (last-equal-wins);
//! - alpha-beta replaces it only on a strictly better score (first-best-wins).
//!
//! Both always agree on the score of the chosen move.

use std::fmt;

use tracing::debug;

use crate::board::{Board, Move};
use crate::constants::SCORE_INF;
use crate::piece::Color;

/// Which search routine picks AI moves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    Minimax,
    #[default]
    AlphaBeta,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Minimax => write!(f, "minimax"),
            Algorithm::AlphaBeta => write!(f, "alphabeta"),
        }
    }
}

impl std::str::FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "minimax" => Ok(Algorithm::Minimax),
            "alphabeta" | "alpha-beta" | "ab" => Ok(Algorithm::AlphaBeta),
            other => anyhow::bail!("unknown algorithm '{other}' (expected minimax or alphabeta)"),
        }
    }
}

/// Outcome of a search from the root position.
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Score of the root, from White's point of view.
    pub score: i32,
    /// Chosen move, `None` if the root is terminal or the side to move is stuck.
    pub best_move: Option<Move>,
    /// The root position with `best_move` applied.
    pub best_board: Option<Board>,
    /// Number of positions visited, root included.
    pub nodes: u64,
}

/// The color that moves at a node.
fn side(maximizing: bool) -> Color {
    if maximizing { Color::White } else { Color::Red }
}

fn finish(root: &Board, score: i32, best_move: Option<Move>, nodes: u64) -> SearchResult {
    let best_board = best_move.as_ref().and_then(|mv| {
        let mut next = root.clone();
        next.make_move(mv).map(|_| next)
    });
    SearchResult {
        score,
        best_move,
        best_board,
        nodes,
    }
}

/// Plain minimax to a fixed depth.
pub fn minimax(board: &Board, depth: u32, maximizing: bool) -> SearchResult {
    let mut work = board.clone();
    let mut nodes = 0;
    let (score, best) = minimax_rec(&mut work, depth, maximizing, &mut nodes);
    debug!(depth, maximizing, score, nodes, "minimax finished");
    finish(board, score, best, nodes)
}

fn minimax_rec(
    board: &mut Board,
    depth: u32,
    maximizing: bool,
    nodes: &mut u64,
) -> (i32, Option<Move>) {
    *nodes += 1;
    let color = side(maximizing);
    if depth == 0 || board.winner_to_move(color).is_some() {
        return (board.evaluate(), None);
    }

    let mut best_score = if maximizing { -SCORE_INF } else { SCORE_INF };
    let mut best_move = None;
    for mv in board.all_moves(color) {
        let Some(undo) = board.make_move(&mv) else {
            continue;
        };
        let (score, _) = minimax_rec(board, depth - 1, !maximizing, nodes);
        board.unmake_move(undo);

        best_score = if maximizing {
            best_score.max(score)
        } else {
            best_score.min(score)
        };
        if best_score == score {
            best_move = Some(mv);
        }
    }
    (best_score, best_move)
}

/// Minimax with alpha-beta pruning to a fixed depth.
///
/// Top-level callers pass `-SCORE_INF`/`SCORE_INF` as the window; see [`search`].
pub fn alpha_beta(board: &Board, depth: u32, alpha: i32, beta: i32, maximizing: bool) -> SearchResult {
    let mut work = board.clone();
    let mut nodes = 0;
    let (score, best) = alpha_beta_rec(&mut work, depth, alpha, beta, maximizing, &mut nodes);
    debug!(depth, maximizing, score, nodes, "alpha-beta finished");
    finish(board, score, best, nodes)
}

fn alpha_beta_rec(
    board: &mut Board,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    nodes: &mut u64,
) -> (i32, Option<Move>) {
    *nodes += 1;
    let color = side(maximizing);
    if depth == 0 || board.winner_to_move(color).is_some() {
        return (board.evaluate(), None);
    }

    let mut best_score = if maximizing { -SCORE_INF } else { SCORE_INF };
    let mut best_move: Option<Move> = None;
    for mv in board.all_moves(color) {
        let Some(undo) = board.make_move(&mv) else {
            continue;
        };
        let (score, _) = alpha_beta_rec(board, depth - 1, alpha, beta, !maximizing, nodes);
        board.unmake_move(undo);

        // The first successor is always taken so a move is reported even when
        // every line scores as infinity.
        let better = if maximizing {
            score > best_score
        } else {
            score < best_score
        };
        if better || best_move.is_none() {
            best_score = score;
            best_move = Some(mv);
        }

        if maximizing {
            alpha = alpha.max(score);
        } else {
            beta = beta.min(score);
        }
        if beta <= alpha {
            break;
        }
    }
    (best_score, best_move)
}

/// Search for the best move of `color` with an open window.
pub fn search(board: &Board, color: Color, depth: u32, algorithm: Algorithm) -> SearchResult {
    let maximizing = color.is_maximizing();
    match algorithm {
        Algorithm::Minimax => minimax(board, depth, maximizing),
        Algorithm::AlphaBeta => alpha_beta(board, depth, -SCORE_INF, SCORE_INF, maximizing),
    }
}
