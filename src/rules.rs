//! Placement legality under the standard Reversi bracketing rule.
//!
//! These checks only gate the placement phase; the flipping phase is
//! deliberately unconstrained by them.

use crate::board::{BOARD_SIZE, Board, in_bounds};
use crate::types::{CellState, Player, Position};

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Returns whether placing `player` at `(row, col)` brackets at least one
/// run of opponent stones. Fails closed for out-of-range or occupied cells.
pub fn is_valid_move(board: &Board, row: i32, col: i32, player: Player) -> bool {
    if !in_bounds(row, col) {
        return false;
    }
    if board.get(row as u8, col as u8) != CellState::Empty {
        return false;
    }

    let (me, opp) = board.sides(player);

    for (dr, dc) in DIRECTIONS {
        let mut r = row + dr;
        let mut c = col + dc;
        let mut found_opponent = false;

        while in_bounds(r, c) {
            let square = 1u64 << ((r as usize) * BOARD_SIZE + c as usize);
            if (opp & square) != 0 {
                found_opponent = true;
            } else if (me & square) != 0 {
                if found_opponent {
                    return true;
                }
                break;
            } else {
                break;
            }

            r += dr;
            c += dc;
        }
    }

    false
}

/// All legal placements for `player`, in row-major order.
pub fn valid_moves(board: &Board, player: Player) -> Vec<Position> {
    let mut moves = Vec::new();

    for row in 0..BOARD_SIZE as i32 {
        for col in 0..BOARD_SIZE as i32 {
            if is_valid_move(board, row, col, player) {
                moves.push(Position {
                    row: row as u8,
                    col: col as u8,
                });
            }
        }
    }

    moves
}

/// Whether `player` has any legal placement. Stops at the first hit.
pub fn has_valid_moves(board: &Board, player: Player) -> bool {
    for row in 0..BOARD_SIZE as i32 {
        for col in 0..BOARD_SIZE as i32 {
            if is_valid_move(board, row, col, player) {
                return true;
            }
        }
    }

    false
}
