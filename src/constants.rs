//! Constants for board geometry, evaluation weights, and search parameters.

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of rows and columns on the board.
pub const N: usize = 8;

/// Number of rows each side fills at the start of a game.
pub const START_ROWS: usize = 3;

/// Pieces per side at the start of a game.
pub const PIECES_PER_SIDE: usize = START_ROWS * N / 2;

// =============================================================================
// Evaluation
// =============================================================================

/// Material value of an ordinary piece.
pub const MAN_VALUE: i32 = 1;

/// Material value of a king.
pub const KING_VALUE: i32 = 2;

/// Score used as infinity by the search. Negating it never overflows.
pub const SCORE_INF: i32 = i32::MAX;

// =============================================================================
// Search Parameters
// =============================================================================

/// Default search depth in plies.
pub const DEFAULT_DEPTH: u32 = 4;

/// Smallest depth the front-ends accept.
pub const MIN_DEPTH: u32 = 1;

/// Largest depth the front-ends accept.
pub const MAX_DEPTH: u32 = 8;

/// Move cap for AI-vs-AI games; reaching it is a draw.
pub const MAX_GAME_MOVES: usize = 200;

// =============================================================================
// Diagonal Directions
// =============================================================================

/// Row/column offsets of the four diagonals.
/// Order: forward-left, forward-right for White (down the board), then Red's.
pub const DIAGONALS: [(isize, isize); 4] = [(1, -1), (1, 1), (-1, -1), (-1, 1)];
