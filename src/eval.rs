//! Static position evaluation.

use crate::board::Board;
use crate::constants::{
    BOARD_SIZE, KING_CENTER_WEIGHT, KING_VALUE, MAN_ADVANCE_WEIGHT, MAN_CENTER_WEIGHT, MAN_VALUE,
};
use crate::piece::{PieceType, Player};

/// Score the board from `player`'s point of view (positive is good).
///
/// Men count material plus advancement toward promotion and center
/// proximity; kings count a larger material value plus a stronger center
/// term since they cover the whole diagonal.
pub fn evaluate(board: &Board, player: Player) -> i32 {
    board
        .iter()
        .filter(|(_, piece)| !piece.is_empty())
        .map(|((row, col), piece)| {
            let sign = if piece.belongs_to(player) { 1 } else { -1 };
            sign * piece_value(piece, row, col)
        })
        .sum()
}

fn piece_value(piece: PieceType, row: usize, col: usize) -> i32 {
    let center = center_proximity(row, col);
    if piece.is_king() {
        KING_VALUE + KING_CENTER_WEIGHT * center
    } else {
        MAN_VALUE + MAN_ADVANCE_WEIGHT * advancement(piece, row) + MAN_CENTER_WEIGHT * center
    }
}

/// Rows a man has travelled from its own back edge (0..=7).
fn advancement(piece: PieceType, row: usize) -> i32 {
    let distance = if piece.is_white() {
        BOARD_SIZE - 1 - row
    } else {
        row
    };
    distance as i32
}

/// Distance from the nearest edges, summed over both axes (0..=6).
fn center_proximity(row: usize, col: usize) -> i32 {
    let r = row.min(BOARD_SIZE - 1 - row);
    let c = col.min(BOARD_SIZE - 1 - col);
    (r + c) as i32
}
