//! Piece and color types.

use std::fmt;

use crate::constants::N;

/// A square on the board as a zero-based `(row, col)` pair.
pub type Square = (usize, usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Starts on rows 0-2, moves toward row 7, and plays first.
    White,
    /// Starts on rows 5-7 and moves toward row 0.
    Red,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Red,
            Color::Red => Color::White,
        }
    }

    /// Row offset of a forward step.
    pub fn forward(self) -> isize {
        match self {
            Color::White => 1,
            Color::Red => -1,
        }
    }

    /// The row on which a man of this color is crowned.
    pub fn king_row(self) -> usize {
        match self {
            Color::White => N - 1,
            Color::Red => 0,
        }
    }

    /// True for the color the search maximizes.
    pub fn is_maximizing(self) -> bool {
        self == Color::White
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Red => write!(f, "red"),
        }
    }
}

impl std::str::FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "white" | "w" => Ok(Color::White),
            "red" | "r" => Ok(Color::Red),
            other => anyhow::bail!("unknown color '{other}' (expected white or red)"),
        }
    }
}

/// A piece on the board.
///
/// The stored coordinates always match the grid cell that holds the piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub row: usize,
    pub col: usize,
    pub king: bool,
}

impl Piece {
    pub fn man(color: Color, row: usize, col: usize) -> Self {
        Self {
            color,
            row,
            col,
            king: false,
        }
    }

    pub fn king(color: Color, row: usize, col: usize) -> Self {
        Self {
            color,
            row,
            col,
            king: true,
        }
    }

    pub fn square(&self) -> Square {
        (self.row, self.col)
    }

    /// Single-character symbol used when rendering: `w`/`r` for men, `W`/`R` for kings.
    pub fn symbol(&self) -> char {
        match (self.color, self.king) {
            (Color::White, false) => 'w',
            (Color::White, true) => 'W',
            (Color::Red, false) => 'r',
            (Color::Red, true) => 'R',
        }
    }
}
