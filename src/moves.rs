//! Single-step moves and square notation.
//!
//! A [`Move`] is one elementary step: either a quiet move or a single jump
//! over one captured piece. A multi-jump is played as a sequence of moves
//! while the rule engine keeps the capturing piece pinned.
//!
//! Square notation follows the usual draughts diagram: files `a`..`h` from
//! left to right (column 0 is `a`), ranks `8`..`1` from top to bottom (row 0
//! is rank 8). Quiet moves print as `c3-d4`, captures as `c3:e5`.

use std::fmt;

use crate::constants::BOARD_SIZE;
use crate::error::RulesError;

/// An immutable single step or single jump.
///
/// Only non-negative indices are checked here; whether a move fits on the
/// board is decided by the board and the rule engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    from_row: usize,
    from_col: usize,
    to_row: usize,
    to_col: usize,
    captured: Option<(usize, usize)>,
}

fn check_index(value: isize, field: &'static str) -> Result<usize, RulesError> {
    usize::try_from(value).map_err(|_| RulesError::NegativeIndex { field, value })
}

impl Move {
    /// A quiet move (no capture).
    pub fn quiet(
        from_row: isize,
        from_col: isize,
        to_row: isize,
        to_col: isize,
    ) -> Result<Self, RulesError> {
        Ok(Self::step(
            check_index(from_row, "from_row")?,
            check_index(from_col, "from_col")?,
            check_index(to_row, "to_row")?,
            check_index(to_col, "to_col")?,
        ))
    }

    /// A jump that removes the piece on `(captured_row, captured_col)`.
    pub fn capture(
        from_row: isize,
        from_col: isize,
        to_row: isize,
        to_col: isize,
        captured_row: isize,
        captured_col: isize,
    ) -> Result<Self, RulesError> {
        Ok(Self::jump(
            check_index(from_row, "from_row")?,
            check_index(from_col, "from_col")?,
            check_index(to_row, "to_row")?,
            check_index(to_col, "to_col")?,
            check_index(captured_row, "captured_row")?,
            check_index(captured_col, "captured_col")?,
        ))
    }

    #[inline]
    pub(crate) const fn step(
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
    ) -> Self {
        Self {
            from_row,
            from_col,
            to_row,
            to_col,
            captured: None,
        }
    }

    #[inline]
    pub(crate) const fn jump(
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
        captured_row: usize,
        captured_col: usize,
    ) -> Self {
        Self {
            from_row,
            from_col,
            to_row,
            to_col,
            captured: Some((captured_row, captured_col)),
        }
    }

    #[inline]
    pub fn from(&self) -> (usize, usize) {
        (self.from_row, self.from_col)
    }

    #[inline]
    pub fn to(&self) -> (usize, usize) {
        (self.to_row, self.to_col)
    }

    /// The captured cell, if this move is a jump.
    #[inline]
    pub fn captured(&self) -> Option<(usize, usize)> {
        self.captured
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub fn starts_at(&self, row: usize, col: usize) -> bool {
        self.from_row == row && self.from_col == col
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_capture() { ':' } else { '-' };
        write!(
            f,
            "{}{sep}{}",
            square_name(self.from_row, self.from_col),
            square_name(self.to_row, self.to_col)
        )
    }
}

/// Convert a cell to its square name (e.g. `(5, 2)` -> `"c3"`).
///
/// Cells off the 8x8 board are printed as `(row,col)`.
pub fn square_name(row: usize, col: usize) -> String {
    if row >= BOARD_SIZE || col >= BOARD_SIZE {
        return format!("({row},{col})");
    }
    let file = (b'a' + col as u8) as char;
    format!("{file}{}", BOARD_SIZE - row)
}

/// Parse a square name (e.g. `"c3"`, case-insensitive) into `(row, col)`.
pub fn parse_square(s: &str) -> Option<(usize, usize)> {
    let bytes = s.trim().as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];
    if !(b'a'..b'a' + BOARD_SIZE as u8).contains(&file) {
        return None;
    }
    if !(b'1'..b'1' + BOARD_SIZE as u8).contains(&rank) {
        return None;
    }
    let col = (file - b'a') as usize;
    let row = BOARD_SIZE - (rank - b'0') as usize;
    Some((row, col))
}

/// Parse a move string into its origin and destination cells.
///
/// Accepts `c3-d4`, `c3:e5`, `c3xe5` and the bare form `c3d4`. The capture
/// marker is not trusted; the caller resolves the pair against the legal set.
pub fn parse_move(s: &str) -> Option<((usize, usize), (usize, usize))> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '-' | ':' | 'x' | 'X'))
        .collect();
    if cleaned.len() != 4 || !cleaned.is_ascii() {
        return None;
    }
    let from = parse_square(&cleaned[..2])?;
    let to = parse_square(&cleaned[2..])?;
    Some((from, to))
}
