//! Checkers board representation and move rules.
//!
//! The board is an 8x8 grid of optional pieces. Only dark squares, those with
//! an odd `row + col`, are ever occupied. White fills rows 0-2 and moves down
//! the board, Red fills rows 5-7 and moves up.
//!
//! Moves are generated per piece as a [`MoveSet`]: simple diagonal steps plus
//! capture chains, each chain flattened to its landing square together with
//! every opposing piece jumped on the way. Moves can be applied destructively
//! with [`Board::apply_move`]/[`Board::remove_piece`], or reversibly with
//! [`Board::make_move`]/[`Board::unmake_move`], which the search relies on.

use std::fmt;

use crate::constants::{DIAGONALS, KING_VALUE, MAN_VALUE, N, START_ROWS};
use crate::piece::{Color, Piece, Square};

/// Rule variants that the original game leaves open.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rules {
    /// When any piece of the side to move can capture, simple steps are illegal.
    pub forced_capture: bool,
    /// A player who still has pieces but no legal move on their turn loses.
    pub no_move_loses: bool,
}

/// A single move of one piece.
///
/// `captured` lists the squares of the opposing pieces jumped along the way,
/// in the order they are jumped. It is empty for a simple step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub captured: Vec<Square>,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})->({},{})",
            self.from.0, self.from.1, self.to.0, self.to.1
        )?;
        for (r, c) in &self.captured {
            write!(f, " x({r},{c})")?;
        }
        Ok(())
    }
}

/// All legal destinations of one piece, keyed by destination square.
///
/// Iteration follows generation order. Each destination appears once; when two
/// capture chains end on the same square the longer chain is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveSet {
    moves: Vec<Move>,
}

impl MoveSet {
    fn insert(&mut self, mv: Move) {
        match self.moves.iter_mut().find(|m| m.to == mv.to) {
            Some(existing) => {
                if mv.captured.len() > existing.captured.len() {
                    *existing = mv;
                }
            }
            None => self.moves.push(mv),
        }
    }

    pub fn get(&self, to: Square) -> Option<&Move> {
        self.moves.iter().find(|m| m.to == to)
    }

    pub fn contains(&self, to: Square) -> bool {
        self.get(to).is_some()
    }

    pub fn destinations(&self) -> impl Iterator<Item = Square> + '_ {
        self.moves.iter().map(|m| m.to)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn has_capture(&self) -> bool {
        self.moves.iter().any(Move::is_capture)
    }

    fn retain_captures(&mut self) {
        self.moves.retain(Move::is_capture);
    }
}

impl IntoIterator for MoveSet {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl<'a> IntoIterator for &'a MoveSet {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

/// Everything needed to take back a move made with [`Board::make_move`].
#[derive(Clone, Debug)]
pub struct Undo {
    to: Square,
    moved: Piece,
    captured: Vec<Piece>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; N * N],
    rules: Rules,
    white_left: usize,
    red_left: usize,
    white_kings: usize,
    red_kings: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn idx(row: usize, col: usize) -> usize {
    row * N + col
}

/// The square one diagonal step away, if it is on the board.
fn step((row, col): Square, (dr, dc): (isize, isize)) -> Option<Square> {
    let r = row.checked_add_signed(dr)?;
    let c = col.checked_add_signed(dc)?;
    (r < N && c < N).then_some((r, c))
}

/// Diagonals a piece may move along: forward only for men, all four for kings.
fn directions(color: Color, king: bool) -> &'static [(isize, isize)] {
    match (king, color) {
        (true, _) => &DIAGONALS[..],
        (false, Color::White) => &DIAGONALS[..2],
        (false, Color::Red) => &DIAGONALS[2..],
    }
}

/// True for the dark squares pieces stand on.
pub fn is_playable(row: usize, col: usize) -> bool {
    row < N && col < N && (row + col) % 2 == 1
}

impl Board {
    /// The standard starting position with default rules.
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// The standard starting position with the given rules.
    pub fn with_rules(rules: Rules) -> Self {
        let mut board = Self::empty();
        board.rules = rules;
        for row in 0..N {
            for col in 0..N {
                if !is_playable(row, col) {
                    continue;
                }
                if row < START_ROWS {
                    board.place(Piece::man(Color::White, row, col));
                } else if row >= N - START_ROWS {
                    board.place(Piece::man(Color::Red, row, col));
                }
            }
        }
        board
    }

    /// A board with no pieces, for setting up positions.
    pub fn empty() -> Self {
        Self {
            cells: [None; N * N],
            rules: Rules::default(),
            white_left: 0,
            red_left: 0,
            white_kings: 0,
            red_kings: 0,
        }
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn set_rules(&mut self, rules: Rules) {
        self.rules = rules;
    }

    /// Put a piece on the square its coordinates name.
    ///
    /// Returns `false`, leaving the board untouched, if the square is off the
    /// board, a light square, or already occupied.
    pub fn place(&mut self, piece: Piece) -> bool {
        if !is_playable(piece.row, piece.col) || self.cells[idx(piece.row, piece.col)].is_some() {
            return false;
        }
        self.cells[idx(piece.row, piece.col)] = Some(piece);
        *self.left_mut(piece.color) += 1;
        if piece.king {
            *self.kings_mut(piece.color) += 1;
        }
        true
    }

    /// The piece on a square, or `None` for an empty or off-board square.
    pub fn piece_at(&self, row: usize, col: usize) -> Option<Piece> {
        if row >= N || col >= N {
            return None;
        }
        self.cells[idx(row, col)]
    }

    fn is_vacant(&self, (row, col): Square) -> bool {
        self.cells[idx(row, col)].is_none()
    }

    /// Every live piece of a color, in row-major order.
    pub fn pieces_of(&self, color: Color) -> Vec<Piece> {
        self.cells
            .iter()
            .flatten()
            .filter(|p| p.color == color)
            .copied()
            .collect()
    }

    /// Number of live pieces of a color.
    pub fn count(&self, color: Color) -> usize {
        match color {
            Color::White => self.white_left,
            Color::Red => self.red_left,
        }
    }

    /// Number of kings of a color.
    pub fn kings(&self, color: Color) -> usize {
        match color {
            Color::White => self.white_kings,
            Color::Red => self.red_kings,
        }
    }

    fn left_mut(&mut self, color: Color) -> &mut usize {
        match color {
            Color::White => &mut self.white_left,
            Color::Red => &mut self.red_left,
        }
    }

    fn kings_mut(&mut self, color: Color) -> &mut usize {
        match color {
            Color::White => &mut self.white_kings,
            Color::Red => &mut self.red_kings,
        }
    }

    /// Legal destinations of a piece from its current square.
    ///
    /// Simple steps come first, then capture chains. With
    /// [`Rules::forced_capture`] only captures remain whenever any piece of
    /// the same color has one.
    pub fn legal_moves(&self, piece: &Piece) -> MoveSet {
        let mut moves = self.piece_moves(piece);
        if self.rules.forced_capture && (moves.has_capture() || self.can_capture(piece.color)) {
            moves.retain_captures();
        }
        moves
    }

    /// Every legal move of a color, piece by piece in row-major order.
    pub fn all_moves(&self, color: Color) -> Vec<Move> {
        let mut moves: Vec<Move> = self
            .pieces_of(color)
            .iter()
            .flat_map(|p| self.piece_moves(p))
            .collect();
        if self.rules.forced_capture && moves.iter().any(Move::is_capture) {
            moves.retain(Move::is_capture);
        }
        moves
    }

    /// Moves of one piece without the forced-capture filter.
    fn piece_moves(&self, piece: &Piece) -> MoveSet {
        let mut moves = MoveSet::default();
        if self.piece_at(piece.row, piece.col) != Some(*piece) {
            return moves;
        }
        for &d in directions(piece.color, piece.king) {
            if let Some(to) = step(piece.square(), d) {
                if self.is_vacant(to) {
                    moves.insert(Move {
                        from: piece.square(),
                        to,
                        captured: Vec::new(),
                    });
                }
            }
        }
        let mut captured = Vec::new();
        self.collect_jumps(piece, piece.square(), &mut captured, &mut moves);
        moves
    }

    /// Depth-first walk over capture chains starting at `from`.
    ///
    /// Jumped pieces stay on the board until the move is applied, so a chain can
    /// neither land on nor jump the same piece twice.
    fn collect_jumps(
        &self,
        piece: &Piece,
        from: Square,
        captured: &mut Vec<Square>,
        out: &mut MoveSet,
    ) {
        for &d in directions(piece.color, piece.king) {
            let Some(over) = step(from, d) else {
                continue;
            };
            let Some(victim) = self.cells[idx(over.0, over.1)] else {
                continue;
            };
            if victim.color == piece.color || captured.contains(&over) {
                continue;
            }
            let Some(land) = step(over, d) else {
                continue;
            };
            if !self.is_vacant(land) {
                continue;
            }

            captured.push(over);
            out.insert(Move {
                from: piece.square(),
                to: land,
                captured: captured.clone(),
            });
            // A man crowned mid-chain stops there.
            if piece.king || land.0 != piece.color.king_row() {
                self.collect_jumps(piece, land, captured, out);
            }
            captured.pop();
        }
    }

    fn has_jump(&self, piece: &Piece) -> bool {
        directions(piece.color, piece.king).iter().any(|&d| {
            let Some(over) = step(piece.square(), d) else {
                return false;
            };
            let Some(land) = step(over, d) else {
                return false;
            };
            matches!(self.cells[idx(over.0, over.1)], Some(v) if v.color != piece.color)
                && self.is_vacant(land)
        })
    }

    /// True if any piece of the color has a capture available.
    pub fn can_capture(&self, color: Color) -> bool {
        self.pieces_of(color).iter().any(|p| self.has_jump(p))
    }

    /// Move a piece to a square, crowning it on its far row.
    ///
    /// Legality is the caller's business; check [`Board::legal_moves`] first.
    pub fn apply_move(&mut self, piece: &Piece, row: usize, col: usize) {
        if row >= N || col >= N || piece.row >= N || piece.col >= N {
            return;
        }
        let Some(mut moving) = self.cells[idx(piece.row, piece.col)].take() else {
            return;
        };
        moving.row = row;
        moving.col = col;
        if !moving.king && row == moving.color.king_row() {
            moving.king = true;
            *self.kings_mut(moving.color) += 1;
        }
        self.cells[idx(row, col)] = Some(moving);
    }

    /// Take a captured piece off the board.
    pub fn remove_piece(&mut self, piece: &Piece) {
        if piece.row >= N || piece.col >= N {
            return;
        }
        let Some(removed) = self.cells[idx(piece.row, piece.col)].take() else {
            return;
        };
        *self.left_mut(removed.color) -= 1;
        if removed.king {
            *self.kings_mut(removed.color) -= 1;
        }
    }

    /// Apply a move and its captures, returning what is needed to undo it.
    ///
    /// Returns `None` if there is no piece on the source square.
    pub fn make_move(&mut self, mv: &Move) -> Option<Undo> {
        let moved = self.piece_at(mv.from.0, mv.from.1)?;
        let captured: Vec<Piece> = mv
            .captured
            .iter()
            .filter_map(|&(r, c)| self.piece_at(r, c))
            .collect();
        self.apply_move(&moved, mv.to.0, mv.to.1);
        for p in &captured {
            self.remove_piece(p);
        }
        Some(Undo {
            to: mv.to,
            moved,
            captured,
        })
    }

    /// Restore the exact position before the matching [`Board::make_move`].
    pub fn unmake_move(&mut self, undo: Undo) {
        if let Some(now) = self.cells[idx(undo.to.0, undo.to.1)].take() {
            if now.king && !undo.moved.king {
                *self.kings_mut(now.color) -= 1;
            }
        }
        self.cells[idx(undo.moved.row, undo.moved.col)] = Some(undo.moved);
        for p in undo.captured {
            self.place(p);
        }
    }

    /// One independent copy of the board per legal move of a color.
    pub fn successors(&self, color: Color) -> Vec<(Move, Board)> {
        self.all_moves(color)
            .into_iter()
            .filter_map(|mv| {
                let mut next = self.clone();
                next.make_move(&mv)?;
                Some((mv, next))
            })
            .collect()
    }

    fn material(&self, color: Color) -> i32 {
        let kings = self.kings(color) as i32;
        let men = self.count(color) as i32 - kings;
        men * MAN_VALUE + kings * KING_VALUE
    }

    /// Static score: White material minus Red material.
    pub fn evaluate(&self) -> i32 {
        self.material(Color::White) - self.material(Color::Red)
    }

    /// The side left with pieces once the other has none.
    pub fn winner(&self) -> Option<Color> {
        match (self.white_left, self.red_left) {
            (w, 0) if w > 0 => Some(Color::White),
            (0, r) if r > 0 => Some(Color::Red),
            _ => None,
        }
    }

    /// Like [`Board::winner`], but with [`Rules::no_move_loses`] a side to move
    /// with no legal move also loses.
    pub fn winner_to_move(&self, to_move: Color) -> Option<Color> {
        if let Some(color) = self.winner() {
            return Some(color);
        }
        if self.rules.no_move_loses && self.all_moves(to_move).is_empty() {
            return Some(to_move.opponent());
        }
        None
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..N {
            write!(f, "{col} ")?;
        }
        writeln!(f)?;
        for row in 0..N {
            write!(f, "{row} ")?;
            for col in 0..N {
                let ch = self.cells[idx(row, col)].map_or('.', |p| p.symbol());
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(pieces: &[Piece]) -> Board {
        let mut board = Board::empty();
        for &p in pieces {
            assert!(board.place(p), "could not place {p:?}");
        }
        board
    }

    #[test]
    fn test_initial_position() {
        let board = Board::new();
        assert_eq!(board.count(Color::White), 12);
        assert_eq!(board.count(Color::Red), 12);
        assert_eq!(board.kings(Color::White), 0);
        assert!(board.piece_at(0, 0).is_none());
        assert_eq!(board.piece_at(0, 1).map(|p| p.color), Some(Color::White));
        assert_eq!(board.piece_at(7, 0).map(|p| p.color), Some(Color::Red));
        assert!(board.piece_at(3, 0).is_none());
        assert!(board.piece_at(4, 1).is_none());
    }

    #[test]
    fn test_piece_at_out_of_range() {
        let board = Board::new();
        assert!(board.piece_at(8, 0).is_none());
        assert!(board.piece_at(0, 99).is_none());
    }

    #[test]
    fn test_stored_coordinates_match_cells() {
        let board = Board::new();
        for row in 0..N {
            for col in 0..N {
                if let Some(p) = board.piece_at(row, col) {
                    assert_eq!(p.square(), (row, col));
                }
            }
        }
    }

    #[test]
    fn test_place_rejects_light_and_occupied() {
        let mut board = Board::empty();
        assert!(!board.place(Piece::man(Color::White, 0, 0)));
        assert!(board.place(Piece::man(Color::White, 0, 1)));
        assert!(!board.place(Piece::man(Color::Red, 0, 1)));
        assert_eq!(board.count(Color::White), 1);
        assert_eq!(board.count(Color::Red), 0);
    }

    #[test]
    fn test_man_steps_forward_only() {
        let man = Piece::man(Color::White, 3, 2);
        let board = board_with(&[man]);
        let moves = board.legal_moves(&man);
        let dests: Vec<Square> = moves.destinations().collect();
        assert_eq!(dests, vec![(4, 1), (4, 3)]);
    }

    #[test]
    fn test_king_steps_all_directions() {
        let king = Piece::king(Color::Red, 3, 2);
        let board = board_with(&[king]);
        let moves = board.legal_moves(&king);
        assert_eq!(moves.len(), 4);
        for dest in [(4, 1), (4, 3), (2, 1), (2, 3)] {
            assert!(moves.contains(dest), "missing {dest:?}");
        }
    }

    #[test]
    fn test_edge_piece_has_one_step() {
        let man = Piece::man(Color::Red, 5, 0);
        let board = board_with(&[man]);
        let dests: Vec<Square> = board.legal_moves(&man).destinations().collect();
        assert_eq!(dests, vec![(4, 1)]);
    }

    #[test]
    fn test_single_jump() {
        let white = Piece::man(Color::White, 2, 1);
        let red = Piece::man(Color::Red, 3, 2);
        let board = board_with(&[white, red]);
        let moves = board.legal_moves(&white);
        let jump = moves.get((4, 3)).expect("jump should be legal");
        assert_eq!(jump.captured, vec![(3, 2)]);
        // (3,2) is occupied, so no step there.
        assert!(!moves.contains((3, 2)));
        assert!(moves.contains((3, 0)));
    }

    #[test]
    fn test_blocked_jump() {
        let white = Piece::man(Color::White, 2, 1);
        let red = Piece::man(Color::Red, 3, 2);
        let blocker = Piece::man(Color::Red, 4, 3);
        let board = board_with(&[white, red, blocker]);
        assert!(!board.legal_moves(&white).has_capture());
    }

    #[test]
    fn test_no_jump_over_own_piece() {
        let white = Piece::man(Color::White, 2, 1);
        let friend = Piece::man(Color::White, 3, 2);
        let board = board_with(&[white, friend]);
        assert!(!board.legal_moves(&white).has_capture());
    }

    #[test]
    fn test_double_jump_chain() {
        let white = Piece::man(Color::White, 0, 1);
        let r1 = Piece::man(Color::Red, 1, 2);
        let r2 = Piece::man(Color::Red, 3, 4);
        let board = board_with(&[white, r1, r2]);
        let moves = board.legal_moves(&white);

        let first = moves.get((2, 3)).expect("first landing");
        assert_eq!(first.captured, vec![(1, 2)]);
        let second = moves.get((4, 5)).expect("chain landing");
        assert_eq!(second.captured, vec![(1, 2), (3, 4)]);
    }

    #[test]
    fn test_chain_stops_on_crowning() {
        // White jumps onto row 7 and would otherwise continue backwards as a king.
        let white = Piece::man(Color::White, 5, 2);
        let r1 = Piece::man(Color::Red, 6, 3);
        let r2 = Piece::man(Color::Red, 6, 5);
        let board = board_with(&[white, r1, r2]);
        let moves = board.legal_moves(&white);
        assert!(moves.contains((7, 4)));
        assert!(!moves.contains((5, 6)));
    }

    #[test]
    fn test_king_cannot_jump_same_piece_twice() {
        let king = Piece::king(Color::White, 2, 1);
        let red = Piece::man(Color::Red, 3, 2);
        let board = board_with(&[king, red]);
        let moves = board.legal_moves(&king);
        let captures: Vec<&Move> = moves.iter().filter(|m| m.is_capture()).collect();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].captured, vec![(3, 2)]);
    }

    #[test]
    fn test_forced_capture_filters_steps() {
        let white = Piece::man(Color::White, 2, 1);
        let other = Piece::man(Color::White, 2, 5);
        let red = Piece::man(Color::Red, 3, 2);
        let mut board = board_with(&[white, other, red]);

        assert!(!board.legal_moves(&other).is_empty());
        assert_eq!(board.all_moves(Color::White).len(), 4);

        board.set_rules(Rules {
            forced_capture: true,
            ..Rules::default()
        });
        assert!(board.legal_moves(&other).is_empty());
        let white_moves = board.legal_moves(&white);
        assert_eq!(white_moves.len(), 1);
        assert!(white_moves.contains((4, 3)));
        assert_eq!(board.all_moves(Color::White).len(), 1);
    }

    #[test]
    fn test_apply_move_promotes_once() {
        let white = Piece::man(Color::White, 6, 1);
        let mut board = board_with(&[white]);
        board.apply_move(&white, 7, 2);
        let crowned = board.piece_at(7, 2).expect("piece moved");
        assert!(crowned.king);
        assert_eq!(board.kings(Color::White), 1);
        assert!(board.piece_at(6, 1).is_none());

        // Moving a king onto the far row again does not crown twice.
        board.apply_move(&crowned, 6, 3);
        let back = board.piece_at(6, 3).expect("king moved");
        board.apply_move(&back, 7, 4);
        assert_eq!(board.kings(Color::White), 1);
    }

    #[test]
    fn test_remove_piece_decrements() {
        let red = Piece::king(Color::Red, 3, 2);
        let mut board = board_with(&[red]);
        board.remove_piece(&red);
        assert_eq!(board.count(Color::Red), 0);
        assert_eq!(board.kings(Color::Red), 0);
        assert!(board.piece_at(3, 2).is_none());
    }

    #[test]
    fn test_make_unmake_restores() {
        let white = Piece::man(Color::White, 5, 2);
        let r1 = Piece::man(Color::Red, 6, 3);
        let r2 = Piece::king(Color::Red, 3, 4);
        let original = board_with(&[white, r1, r2]);
        let mut board = original.clone();

        for mv in original.all_moves(Color::White) {
            let undo = board.make_move(&mv).expect("piece on source");
            assert_ne!(board, original);
            board.unmake_move(undo);
            assert_eq!(board, original, "unmake of {mv} differs");
        }
    }

    #[test]
    fn test_evaluate_weights() {
        assert_eq!(Board::new().evaluate(), 0);
        let board = board_with(&[
            Piece::king(Color::White, 0, 1),
            Piece::man(Color::White, 0, 3),
            Piece::man(Color::Red, 7, 0),
        ]);
        assert_eq!(board.evaluate(), 2);
    }

    #[test]
    fn test_winner() {
        assert_eq!(Board::new().winner(), None);
        assert_eq!(Board::empty().winner(), None);
        let board = board_with(&[Piece::man(Color::Red, 5, 0)]);
        assert_eq!(board.winner(), Some(Color::Red));
    }

    #[test]
    fn test_no_move_loses() {
        // Red man at the bottom-left corner blocked by two White men it cannot jump.
        let red = Piece::man(Color::Red, 7, 0);
        let w1 = Piece::man(Color::White, 6, 1);
        let w2 = Piece::man(Color::White, 5, 2);
        let mut board = board_with(&[red, w1, w2]);
        assert!(board.legal_moves(&red).is_empty());
        assert_eq!(board.winner_to_move(Color::Red), None);

        board.set_rules(Rules {
            no_move_loses: true,
            ..Rules::default()
        });
        assert_eq!(board.winner_to_move(Color::Red), Some(Color::White));
        assert_eq!(board.winner_to_move(Color::White), None);
    }

    #[test]
    fn test_display() {
        let text = Board::new().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), N + 1);
        assert_eq!(lines[0].trim_end(), "  0 1 2 3 4 5 6 7");
        assert_eq!(lines[1].trim_end(), "0 . w . w . w . w");
        assert_eq!(lines[4].trim_end(), "3 . . . . . . . .");
        assert_eq!(lines[8].trim_end(), "7 r . r . r . r .");
    }
}
