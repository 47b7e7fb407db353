use std::fmt;

use crate::constants::{BOARD_SIZE, HOME_ROWS};
use crate::error::RulesError;
use crate::piece::{PieceType, Player};

pub type Cell = (usize, usize);

/// Fixed 8x8 grid of pieces.
///
/// The board knows nothing about move legality; it only stores pieces and
/// answers aggregate queries. Equality and hashing cover all 64 cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[PieceType; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self {
            cells: [[PieceType::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// The standard starting position: Black men on the dark cells of rows
    /// 0..=2, White men on the dark cells of rows 5..=7.
    pub fn initial() -> Self {
        let mut board = Self::new();
        board.setup_initial();
        board
    }

    /// Build a board from raw piece codes, validating shape and every code.
    pub fn from_raw<R: AsRef<[i32]>>(raw: &[R]) -> Result<Self, RulesError> {
        if raw.len() != BOARD_SIZE {
            return Err(RulesError::InvalidBoardShape {
                rows: raw.len(),
                cols: raw.first().map_or(0, |r| r.as_ref().len()),
            });
        }
        let mut board = Self::new();
        for (r, row) in raw.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != BOARD_SIZE {
                return Err(RulesError::InvalidBoardShape {
                    rows: raw.len(),
                    cols: row.len(),
                });
            }
            for (c, &code) in row.iter().enumerate() {
                board.cells[r][c] = PieceType::from_code(code)?;
            }
        }
        Ok(board)
    }

    /// Deep export of the grid as piece codes.
    pub fn to_raw(&self) -> [[i32; BOARD_SIZE]; BOARD_SIZE] {
        let mut raw = [[0; BOARD_SIZE]; BOARD_SIZE];
        for (r, row) in self.cells.iter().enumerate() {
            for (c, piece) in row.iter().enumerate() {
                raw[r][c] = i32::from(piece.code());
            }
        }
        raw
    }

    pub fn clear(&mut self) {
        self.cells = [[PieceType::Empty; BOARD_SIZE]; BOARD_SIZE];
    }

    pub fn setup_initial(&mut self) {
        self.clear();
        for row in 0..BOARD_SIZE {
            let piece = if row < HOME_ROWS {
                PieceType::man(Player::Black)
            } else if row >= BOARD_SIZE - HOME_ROWS {
                PieceType::man(Player::White)
            } else {
                continue;
            };
            for col in 0..BOARD_SIZE {
                if Self::is_dark(row, col) {
                    self.cells[row][col] = piece;
                }
            }
        }
    }

    #[inline]
    pub fn is_inside(row: isize, col: isize) -> bool {
        (0..BOARD_SIZE as isize).contains(&row) && (0..BOARD_SIZE as isize).contains(&col)
    }

    /// Playable (dark) cells satisfy `(row + col) % 2 == 1`.
    #[inline]
    pub fn is_dark(row: usize, col: usize) -> bool {
        (row + col) % 2 == 1
    }

    /// The cell `steps` steps away from `(row, col)` along `(dr, dc)`, if it
    /// is on the board.
    #[inline]
    pub fn offset(row: usize, col: usize, (dr, dc): (isize, isize), steps: isize) -> Option<Cell> {
        let r = row as isize + dr * steps;
        let c = col as isize + dc * steps;
        Self::is_inside(r, c).then_some((r as usize, c as usize))
    }

    fn check(row: usize, col: usize) -> Result<(), RulesError> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Ok(())
        } else {
            Err(RulesError::InvalidCoordinate {
                row: row as isize,
                col: col as isize,
            })
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<PieceType, RulesError> {
        Self::check(row, col)?;
        Ok(self.cells[row][col])
    }

    pub fn set(&mut self, row: usize, col: usize, piece: PieceType) -> Result<(), RulesError> {
        Self::check(row, col)?;
        self.cells[row][col] = piece;
        Ok(())
    }

    /// Unchecked read for cells already known to be on the board.
    #[inline]
    pub(crate) fn at(&self, (row, col): Cell) -> PieceType {
        self.cells[row][col]
    }

    #[inline]
    pub(crate) fn put(&mut self, (row, col): Cell, piece: PieceType) {
        self.cells[row][col] = piece;
    }

    /// Iterate over every cell with its content, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, PieceType)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &p)| ((r, c), p)))
    }

    pub fn count_pieces(&self, player: Player) -> usize {
        self.iter().filter(|(_, p)| p.belongs_to(player)).count()
    }

    pub fn count_men(&self, player: Player) -> usize {
        self.iter()
            .filter(|(_, p)| p.is_man() && p.belongs_to(player))
            .count()
    }

    pub fn count_kings(&self, player: Player) -> usize {
        self.iter()
            .filter(|(_, p)| p.is_king() && p.belongs_to(player))
            .count()
    }

    /// Overwrite this board cell by cell from `other`.
    pub fn copy_from(&mut self, other: &Board) {
        self.cells = other.cells;
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            write!(f, "{} ", BOARD_SIZE - r)?;
            for (c, piece) in row.iter().enumerate() {
                let ch = if !Self::is_dark(r, c) {
                    ' '
                } else {
                    piece.symbol()
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for c in 0..BOARD_SIZE {
            write!(f, "{} ", (b'a' + c as u8) as char)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_setup() {
        let board = Board::initial();
        assert_eq!(board.count_pieces(Player::White), 12);
        assert_eq!(board.count_pieces(Player::Black), 12);
        assert_eq!(board.count_kings(Player::White), 0);
        for ((r, c), piece) in board.iter() {
            if !piece.is_empty() {
                assert!(Board::is_dark(r, c), "piece on light cell ({r},{c})");
            }
        }
        assert_eq!(board.get(0, 1).unwrap(), PieceType::BlackMan);
        assert_eq!(board.get(7, 0).unwrap(), PieceType::WhiteMan);
        assert_eq!(board.get(3, 0).unwrap(), PieceType::Empty);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::new();
        assert_eq!(
            board.get(8, 0),
            Err(RulesError::InvalidCoordinate { row: 8, col: 0 })
        );
        assert!(board.set(0, 8, PieceType::WhiteMan).is_err());
    }

    #[test]
    fn test_raw_roundtrip_and_validation() {
        let mut board = Board::initial();
        board.set(4, 3, PieceType::BlackKing).unwrap();
        let copy = Board::from_raw(&board.to_raw()).unwrap();
        assert_eq!(copy, board);

        let mut raw = board.to_raw();
        raw[2][3] = 9;
        assert_eq!(Board::from_raw(&raw), Err(RulesError::InvalidPieceCode(9)));

        let short: Vec<Vec<i32>> = vec![vec![0; 8]; 7];
        assert!(matches!(
            Board::from_raw(&short),
            Err(RulesError::InvalidBoardShape { rows: 7, .. })
        ));
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let board = Board::initial();
        let mut copy = board.clone();
        copy.set(5, 0, PieceType::Empty).unwrap();
        assert_ne!(copy, board);
        assert_eq!(board.count_men(Player::White), 12);
        assert_eq!(copy.count_men(Player::White), 11);
    }

    #[test]
    fn test_offset() {
        assert_eq!(Board::offset(5, 2, (-1, 1), 2), Some((3, 4)));
        assert_eq!(Board::offset(0, 0, (-1, 1), 1), None);
        assert_eq!(Board::offset(7, 7, (1, 1), 0), Some((7, 7)));
    }
}
