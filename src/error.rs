//! Errors raised by the board and the rule engine.
//!
//! None of these are retried or coerced by the engine. Callers are expected
//! to submit only moves drawn from [`RuleEngine::legal_moves`] or
//! [`RuleEngine::moves_for_cell`]; a position where the side to move has no
//! moves is a normal terminal state, not an error.
//!
//! [`RuleEngine::legal_moves`]: crate::rules::RuleEngine::legal_moves
//! [`RuleEngine::moves_for_cell`]: crate::rules::RuleEngine::moves_for_cell

use thiserror::Error;

use crate::moves::Move;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    /// A cell outside `[0, 8)²` was addressed.
    #[error("cell ({row},{col}) is outside the 8x8 board")]
    InvalidCoordinate { row: isize, col: isize },

    /// A raw board contained a code that is not a known piece type.
    #[error("unknown piece code: {0}")]
    InvalidPieceCode(i32),

    /// A raw board was not 8x8.
    #[error("raw board must be 8x8, got {rows} rows (first bad row has {cols} cells)")]
    InvalidBoardShape { rows: usize, cols: usize },

    /// A move coordinate was negative.
    #[error("index {field} must be >= 0, got {value}")]
    NegativeIndex { field: &'static str, value: isize },

    /// The move is not in the current legal set, is made with the wrong
    /// side's piece, or ignores an active capture chain.
    #[error("illegal move: {0}")]
    IllegalMove(Move),

    /// The engine reached a state that correct move generation never
    /// produces (for example a capture whose target is empty or friendly).
    #[error("inconsistent state: {0}")]
    InconsistentState(String),
}
