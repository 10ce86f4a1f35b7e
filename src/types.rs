use serde::Serialize;

/// A stone color / side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

/// Contents of one board square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Black,
    White,
}

impl CellState {
    /// Wire encoding used in snapshots: 0=empty, 1=black, 2=white.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Black => 1,
            Self::White => 2,
        }
    }
}

impl From<Player> for CellState {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Self::Black,
            Player::White => Self::White,
        }
    }
}

/// Sub-state of the active player's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// One standard-rule placement is expected.
    Placement,
    /// Free flipping/unflipping until the player ends the turn.
    Flipping,
}

/// Final outcome once neither side can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Black,
    White,
    Draw,
}

/// A board coordinate, rows and columns 0..=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

/// Stone counts derived from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub black: u8,
    pub white: u8,
}

/// Public game state returned across the wasm boundary.
///
/// Field names serialize in camelCase to match the frontend store shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// Row-major cells, 0=empty, 1=black, 2=white.
    pub board: Vec<u8>,
    pub score: Score,
    pub current_turn: Player,
    pub phase: GamePhase,
    /// Cells mid flip animation; the UI acknowledges each via `clearFlipping`.
    pub flipping_cells: Vec<Position>,
    /// Cells flipped by the current player this turn (unflip candidates).
    pub flipped_cells: Vec<Position>,
    pub flip_count: u32,
    pub is_game_over: bool,
    pub winner: Option<Winner>,
}
