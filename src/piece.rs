//! Sides and piece types.
//!
//! Both are closed enumerations. `PieceType` carries a stable small integer
//! code so a board can be stored and exchanged as a grid of bytes.

use std::fmt;

use crate::error::RulesError;

/// One of the two sides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Row offset of a forward step for this side's men.
    ///
    /// White advances toward row 0, Black toward row 7.
    #[inline]
    pub const fn forward(self) -> isize {
        match self {
            Player::White => -1,
            Player::Black => 1,
        }
    }

    /// Lenient parse of a color name ("white"/"w", "black"/"b", any case).
    /// Returns `default` for anything else.
    pub fn from_color_str(value: &str, default: Player) -> Player {
        match value.trim().to_ascii_lowercase().as_str() {
            "white" | "w" => Player::White,
            "black" | "b" => Player::Black,
            _ => default,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => write!(f, "white"),
            Player::Black => write!(f, "black"),
        }
    }
}

/// Content of a single board cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceType {
    #[default]
    Empty = 0,
    WhiteMan = 1,
    WhiteKing = 2,
    BlackMan = 3,
    BlackKing = 4,
}

impl PieceType {
    /// Storage code of this piece type.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Strict decode of a storage code.
    pub fn from_code(code: i32) -> Result<Self, RulesError> {
        match code {
            0 => Ok(PieceType::Empty),
            1 => Ok(PieceType::WhiteMan),
            2 => Ok(PieceType::WhiteKing),
            3 => Ok(PieceType::BlackMan),
            4 => Ok(PieceType::BlackKing),
            other => Err(RulesError::InvalidPieceCode(other)),
        }
    }

    /// Lenient decode: unknown codes read as `Empty`.
    pub fn from_code_or_empty(code: i32) -> Self {
        Self::from_code(code).unwrap_or(PieceType::Empty)
    }

    /// The man of the given side.
    #[inline]
    pub const fn man(player: Player) -> Self {
        match player {
            Player::White => PieceType::WhiteMan,
            Player::Black => PieceType::BlackMan,
        }
    }

    /// The king of the given side.
    #[inline]
    pub const fn king(player: Player) -> Self {
        match player {
            Player::White => PieceType::WhiteKing,
            Player::Black => PieceType::BlackKing,
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, PieceType::Empty)
    }

    #[inline]
    pub const fn is_man(self) -> bool {
        matches!(self, PieceType::WhiteMan | PieceType::BlackMan)
    }

    #[inline]
    pub const fn is_king(self) -> bool {
        matches!(self, PieceType::WhiteKing | PieceType::BlackKing)
    }

    #[inline]
    pub const fn is_white(self) -> bool {
        matches!(self, PieceType::WhiteMan | PieceType::WhiteKing)
    }

    #[inline]
    pub const fn is_black(self) -> bool {
        matches!(self, PieceType::BlackMan | PieceType::BlackKing)
    }

    /// Owner of the piece, `None` for an empty cell.
    #[inline]
    pub const fn owner(self) -> Option<Player> {
        match self {
            PieceType::Empty => None,
            PieceType::WhiteMan | PieceType::WhiteKing => Some(Player::White),
            PieceType::BlackMan | PieceType::BlackKing => Some(Player::Black),
        }
    }

    #[inline]
    pub fn belongs_to(self, player: Player) -> bool {
        self.owner() == Some(player)
    }

    /// True for a live piece of the side opposing `player`.
    #[inline]
    pub fn is_opponent_of(self, player: Player) -> bool {
        self.owner() == Some(player.opposite())
    }

    /// The piece this becomes on reaching `row`: a man on its last rank is
    /// crowned, everything else is unchanged.
    pub fn promoted_at(self, row: usize) -> Self {
        use crate::constants::{BLACK_PROMOTION_ROW, WHITE_PROMOTION_ROW};
        match self {
            PieceType::WhiteMan if row == WHITE_PROMOTION_ROW => PieceType::WhiteKing,
            PieceType::BlackMan if row == BLACK_PROMOTION_ROW => PieceType::BlackKing,
            other => other,
        }
    }

    /// Single-character symbol used by the text board.
    pub const fn symbol(self) -> char {
        match self {
            PieceType::Empty => '.',
            PieceType::WhiteMan => 'w',
            PieceType::WhiteKing => 'W',
            PieceType::BlackMan => 'b',
            PieceType::BlackKing => 'B',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        assert_eq!(Player::White.opposite(), Player::Black);
        assert_eq!(Player::Black.opposite().opposite(), Player::Black);
    }

    #[test]
    fn test_codes_are_stable() {
        let all = [
            PieceType::Empty,
            PieceType::WhiteMan,
            PieceType::WhiteKing,
            PieceType::BlackMan,
            PieceType::BlackKing,
        ];
        for (i, piece) in all.iter().enumerate() {
            assert_eq!(piece.code() as usize, i);
            assert_eq!(PieceType::from_code(i as i32).unwrap(), *piece);
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(
            PieceType::from_code(7),
            Err(RulesError::InvalidPieceCode(7))
        );
        assert_eq!(PieceType::from_code_or_empty(-1), PieceType::Empty);
    }

    #[test]
    fn test_predicates() {
        assert!(PieceType::WhiteKing.is_king());
        assert!(PieceType::WhiteKing.is_white());
        assert!(!PieceType::WhiteKing.is_man());
        assert!(PieceType::BlackMan.belongs_to(Player::Black));
        assert!(!PieceType::Empty.belongs_to(Player::White));
        assert!(!PieceType::Empty.belongs_to(Player::Black));
        assert!(PieceType::BlackMan.is_opponent_of(Player::White));
        assert!(!PieceType::Empty.is_opponent_of(Player::White));
    }

    #[test]
    fn test_men_and_kings_by_side() {
        assert_eq!(PieceType::man(Player::White), PieceType::WhiteMan);
        assert_eq!(PieceType::man(Player::Black), PieceType::BlackMan);
        assert_eq!(PieceType::king(Player::Black).owner(), Some(Player::Black));
    }

    #[test]
    fn test_promotion_rows() {
        assert_eq!(PieceType::WhiteMan.promoted_at(0), PieceType::WhiteKing);
        assert_eq!(PieceType::WhiteMan.promoted_at(7), PieceType::WhiteMan);
        assert_eq!(PieceType::BlackMan.promoted_at(7), PieceType::BlackKing);
        assert_eq!(PieceType::BlackKing.promoted_at(0), PieceType::BlackKing);
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!(Player::from_color_str("B", Player::White), Player::Black);
        assert_eq!(Player::from_color_str(" White ", Player::Black), Player::White);
        assert_eq!(Player::from_color_str("red", Player::Black), Player::Black);
    }
}
