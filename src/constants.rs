//! Constants for board geometry, evaluation weights, and search scores.
//!
//! This module contains the fixed configuration of the draughts engine.
//! The board is a plain 8x8 grid addressed by `(row, col)`, with row 0 at the
//! top (Black's home side) and row 7 at the bottom (White's home side).

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Draughts on this variant is always played on 8x8.
pub const BOARD_SIZE: usize = 8;

/// Number of men each side starts with.
pub const INITIAL_PIECES_PER_SIDE: usize = 12;

/// Number of rows each side fills at the start of a game.
pub const HOME_ROWS: usize = 3;

/// The last rank for White men (promotion row).
pub const WHITE_PROMOTION_ROW: usize = 0;

/// The last rank for Black men (promotion row).
pub const BLACK_PROMOTION_ROW: usize = BOARD_SIZE - 1;

/// The four diagonal directions as `(d_row, d_col)`.
/// Order: NW, NE, SW, SE
pub const DIAGONALS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

// =============================================================================
// Static Evaluation Weights
// =============================================================================

/// Base material value of a man.
pub const MAN_VALUE: i32 = 100;

/// Base material value of a king.
pub const KING_VALUE: i32 = 180;

/// Bonus per row a man has advanced from its home edge.
pub const MAN_ADVANCE_WEIGHT: i32 = 4;

/// Bonus per unit of center proximity (0..=6) for a man.
pub const MAN_CENTER_WEIGHT: i32 = 3;

/// Bonus per unit of center proximity (0..=6) for a king.
pub const KING_CENTER_WEIGHT: i32 = 4;

// =============================================================================
// Search Scores
// =============================================================================

/// Score of a won position, from the engine's point of view.
pub const WIN_SCORE: i32 = 100_000;

/// Score of a lost position, from the engine's point of view.
pub const LOSS_SCORE: i32 = -100_000;

/// Half-move cap for engine self-play in the demo.
pub const DEMO_MAX_PLIES: usize = 200;
