use crate::types::{CellState, Player, Score};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// Board state represented by two bitboards.
///
/// A square is empty when neither bitboard has its bit set; the engine never
/// sets the same bit on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the initial board:
    /// d4=white, e4=black, d5=black, e5=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    /// Builds a board directly from bitboards. Overlapping bits are a caller
    /// contract violation.
    pub fn from_bitboards(black: u64, white: u64) -> Self {
        debug_assert_eq!(black & white, 0, "overlapping bitboards");
        Self { black, white }
    }

    /// Returns the contents of `(row, col)`. Out-of-range reads are empty.
    pub fn get(&self, row: u8, col: u8) -> CellState {
        let square = square_bit(row, col);
        if (self.black & square) != 0 {
            CellState::Black
        } else if (self.white & square) != 0 {
            CellState::White
        } else {
            CellState::Empty
        }
    }

    /// Claims `(row, col)` for `player`, releasing the other color's bit if
    /// present. Out-of-range coordinates are ignored.
    pub fn set(&mut self, row: u8, col: u8, player: Player) {
        let square = square_bit(row, col);
        match player {
            Player::Black => {
                self.black |= square;
                self.white &= !square;
            }
            Player::White => {
                self.white |= square;
                self.black &= !square;
            }
        }
    }

    /// Occupied-cell bitboards as `(mine, theirs)` for the given side.
    pub(crate) fn sides(&self, player: Player) -> (u64, u64) {
        match player {
            Player::Black => (self.black, self.white),
            Player::White => (self.white, self.black),
        }
    }

    /// Counts both colors in a single pass over the bitboards.
    pub fn score(&self) -> Score {
        Score {
            black: self.black.count_ones() as u8,
            white: self.white.count_ones() as u8,
        }
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        let score = self.score();
        NUM_SQUARES as u8 - score.black - score.white
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut cells = [0u8; NUM_SQUARES];
        for (pos, cell) in cells.iter_mut().enumerate() {
            let square = bit(pos);
            *cell = if (self.black & square) != 0 {
                1
            } else if (self.white & square) != 0 {
                2
            } else {
                0
            };
        }
        cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

fn square_bit(row: u8, col: u8) -> u64 {
    if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
        bit((row as usize) * BOARD_SIZE + col as usize)
    } else {
        0
    }
}

pub(crate) fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}
