//! Turn-taking game state on top of a [`Board`].
//!
//! A `Game` is either waiting for a piece to be selected or holding a
//! selection together with that piece's cached [`MoveSet`]. Human input flows
//! through [`Game::select`]; AI turns go through [`Game::adopt_board`] (or
//! [`Game::ai_move`], which runs the search first).

use tracing::{debug, trace};

use crate::board::{Board, MoveSet, Rules};
use crate::piece::{Color, Square};
use crate::search::{Algorithm, search};

pub struct Game {
    board: Board,
    turn: Color,
    selected: Option<Square>,
    valid_moves: MoveSet,
    moves_played: usize,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A new game with default rules; White moves first.
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    pub fn with_rules(rules: Rules) -> Self {
        Self::from_board(Board::with_rules(rules), Color::White)
    }

    /// Start from an arbitrary position.
    pub fn from_board(board: Board, turn: Color) -> Self {
        Self {
            board,
            turn,
            selected: None,
            valid_moves: MoveSet::default(),
            moves_played: 0,
        }
    }

    /// Back to the starting position, keeping the current rules.
    pub fn reset(&mut self) {
        *self = Self::with_rules(self.board.rules());
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Moves of the selected piece; empty when nothing is selected.
    pub fn valid_moves(&self) -> &MoveSet {
        &self.valid_moves
    }

    pub fn rules(&self) -> Rules {
        self.board.rules()
    }

    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    /// Select a piece, or move the selected piece to `(row, col)`.
    ///
    /// With a piece selected, a legal destination completes the move and
    /// returns `true`. Anything else drops the selection and treats the square
    /// as a fresh selection, which succeeds only on a piece of the side to move.
    pub fn select(&mut self, row: usize, col: usize) -> bool {
        if self.selected.is_some() {
            if self.try_move(row, col) {
                return true;
            }
            self.clear_selection();
        }

        match self.board.piece_at(row, col) {
            Some(piece) if piece.color == self.turn => {
                trace!(row, col, color = %self.turn, "selected");
                self.selected = Some((row, col));
                self.valid_moves = self.board.legal_moves(&piece);
                true
            }
            _ => false,
        }
    }

    fn try_move(&mut self, row: usize, col: usize) -> bool {
        let Some((sr, sc)) = self.selected else {
            return false;
        };
        let Some(piece) = self.board.piece_at(sr, sc) else {
            return false;
        };
        if self.board.piece_at(row, col).is_some() {
            return false;
        }
        let Some(mv) = self.valid_moves.get((row, col)).cloned() else {
            return false;
        };

        self.board.apply_move(&piece, row, col);
        for &(cr, cc) in &mv.captured {
            if let Some(victim) = self.board.piece_at(cr, cc) {
                self.board.remove_piece(&victim);
            }
        }
        debug!(%mv, color = %self.turn, "move played");
        self.change_turn();
        true
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.valid_moves = MoveSet::default();
    }

    fn change_turn(&mut self) {
        self.clear_selection();
        self.turn = self.turn.opponent();
        self.moves_played += 1;
    }

    /// Install a board produced by the search and pass the turn.
    ///
    /// The board is trusted to be a legal successor of the current one.
    pub fn adopt_board(&mut self, board: Board) {
        debug!(color = %self.turn, score = board.evaluate(), "adopted board");
        self.board = board;
        self.change_turn();
    }

    /// Search for the side to move and play the result.
    ///
    /// Returns the search score, or `None` if the side to move has no move.
    pub fn ai_move(&mut self, depth: u32, algorithm: Algorithm) -> Option<i32> {
        let result = search(&self.board, self.turn, depth, algorithm);
        let next = result.best_board?;
        self.adopt_board(next);
        Some(result.score)
    }

    pub fn winner(&self) -> Option<Color> {
        self.board.winner_to_move(self.turn)
    }
}
