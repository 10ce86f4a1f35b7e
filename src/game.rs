use crate::board::{BOARD_SIZE, Board};
use crate::rules;
use crate::types::{GamePhase, GameSnapshot, Player, Position, Score, Winner};
use tracing::{debug, instrument};

/// Errors reported by the checked command variants.
///
/// The plain commands stay unchecked: the hosting UI pre-filters targets via
/// the rules module and dispatches only affordable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// The game has ended; only a reset is accepted.
    GameOver,
    /// The command does not belong to the current phase.
    WrongPhase,
    /// Coordinates outside the 8x8 board.
    OutOfRange,
    /// The placement does not bracket any opponent run.
    IllegalPlacement,
    /// A fresh flip must target a stone of the opponent's color.
    NotOpponentPiece,
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GameOver => write!(f, "game is already over"),
            Self::WrongPhase => write!(f, "command not allowed in the current phase"),
            Self::OutOfRange => write!(f, "row/col out of range"),
            Self::IllegalPlacement => write!(f, "placement does not bracket an opponent run"),
            Self::NotOpponentPiece => write!(f, "cell does not hold an opponent stone"),
        }
    }
}

impl std::error::Error for CommandError {}

/// The turn state machine for one game of anarchy reversi.
///
/// Each turn is two phases: a single rule-checked placement, then unlimited
/// free flipping (and unflipping) until the player ends the turn. Ending the
/// turn alternates players, auto-passes a stuck opponent, and detects the
/// end of the game.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    score: Score,
    current_turn: Player,
    phase: GamePhase,
    flipping_cells: Vec<Position>,
    flipped_cells: Vec<Position>,
    flip_count: u32,
    is_game_over: bool,
    winner: Option<Winner>,
}

impl GameSession {
    pub fn new() -> Self {
        let board = Board::new();
        Self {
            board,
            score: board.score(),
            current_turn: Player::Black,
            phase: GamePhase::Placement,
            flipping_cells: Vec::new(),
            flipped_cells: Vec::new(),
            flip_count: 0,
            is_game_over: false,
            winner: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn current_turn(&self) -> Player {
        self.current_turn
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn flipping_cells(&self) -> &[Position] {
        &self.flipping_cells
    }

    pub fn flipped_cells(&self) -> &[Position] {
        &self.flipped_cells
    }

    pub fn flip_count(&self) -> u32 {
        self.flip_count
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    /// Places the current player's stone at `(row, col)` and enters the
    /// flipping phase.
    ///
    /// Caller contract: the target passed the rules check. No legality
    /// re-check happens here; out-of-range coordinates and commands after
    /// game over are absorbed.
    #[instrument(skip(self), fields(player = ?self.current_turn))]
    pub fn place_piece(&mut self, row: u8, col: u8) {
        if self.is_game_over || !on_board(row, col) {
            return;
        }

        self.board.set(row, col, self.current_turn);
        self.phase = GamePhase::Flipping;
        self.score = self.board.score();
    }

    /// Flips `(row, col)` to the current player's color, or reverts it to
    /// the opponent's color when it was already flipped this turn.
    ///
    /// There is no bracketing or adjacency restriction and no limit on the
    /// number of flips; the caller filters sensible targets.
    #[instrument(skip(self), fields(player = ?self.current_turn))]
    pub fn flip_piece(&mut self, row: u8, col: u8) {
        if self.is_game_over || !on_board(row, col) {
            return;
        }

        let pos = Position { row, col };
        if let Some(idx) = self.flipped_cells.iter().position(|&p| p == pos) {
            // unflip: hand the stone back and signal the reverse animation
            self.board.set(row, col, self.current_turn.opponent());
            self.flipped_cells.remove(idx);
            self.flip_count -= 1;
            self.flipping_cells.push(pos);
        } else {
            self.board.set(row, col, self.current_turn);
            self.flipped_cells.push(pos);
            self.flipping_cells.push(pos);
            self.flip_count += 1;
        }

        self.score = self.board.score();
    }

    /// Acknowledges that the flip animation for `(row, col)` has finished.
    /// Touches only the animation signal, never the board or score.
    pub fn clear_flipping(&mut self, row: u8, col: u8) {
        let pos = Position { row, col };
        self.flipping_cells.retain(|&p| p != pos);
    }

    /// Ends the current player's turn.
    ///
    /// The turn passes to the opponent when they can place; otherwise the
    /// current player moves again (auto-pass). Independently of that, the
    /// game ends when neither color has a legal placement, with the winner
    /// decided by the stone counts at this moment.
    #[instrument(skip(self), fields(player = ?self.current_turn))]
    pub fn end_turn(&mut self) {
        let opp = self.current_turn.opponent();
        if rules::has_valid_moves(&self.board, opp) {
            self.current_turn = opp;
        } else if rules::has_valid_moves(&self.board, self.current_turn) {
            debug!(player = ?self.current_turn, "opponent has no placement, auto-pass");
        }

        if !rules::has_valid_moves(&self.board, Player::Black)
            && !rules::has_valid_moves(&self.board, Player::White)
        {
            self.is_game_over = true;
            self.winner = Some(if self.score.black > self.score.white {
                Winner::Black
            } else if self.score.white > self.score.black {
                Winner::White
            } else {
                Winner::Draw
            });
            debug!(winner = ?self.winner, "no placements remain, game over");
        }

        self.phase = GamePhase::Placement;
        self.flipping_cells.clear();
        self.flipped_cells.clear();
        self.flip_count = 0;
    }

    /// Replaces the whole session with a fresh initial game, Black to move.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Checked placement: validates phase, range, and the bracketing rule
    /// before delegating to [`Self::place_piece`].
    pub fn try_place_piece(&mut self, row: u8, col: u8) -> Result<(), CommandError> {
        if self.is_game_over {
            return Err(CommandError::GameOver);
        }
        if self.phase != GamePhase::Placement {
            return Err(CommandError::WrongPhase);
        }
        if !on_board(row, col) {
            return Err(CommandError::OutOfRange);
        }
        if !rules::is_valid_move(&self.board, row as i32, col as i32, self.current_turn) {
            return Err(CommandError::IllegalPlacement);
        }

        self.place_piece(row, col);
        Ok(())
    }

    /// Checked flip: validates phase and range, and requires a fresh flip to
    /// target an opponent stone. Unflips of cells flipped this turn are
    /// always accepted.
    pub fn try_flip_piece(&mut self, row: u8, col: u8) -> Result<(), CommandError> {
        if self.is_game_over {
            return Err(CommandError::GameOver);
        }
        if self.phase != GamePhase::Flipping {
            return Err(CommandError::WrongPhase);
        }
        if !on_board(row, col) {
            return Err(CommandError::OutOfRange);
        }

        let pos = Position { row, col };
        let is_unflip = self.flipped_cells.contains(&pos);
        if !is_unflip && self.board.get(row, col) != self.current_turn.opponent().into() {
            return Err(CommandError::NotOpponentPiece);
        }

        self.flip_piece(row, col);
        Ok(())
    }

    /// Snapshot of everything the rendering layer reads per frame.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.to_array().to_vec(),
            score: self.score,
            current_turn: self.current_turn,
            phase: self.phase,
            flipping_cells: self.flipping_cells.clone(),
            flipped_cells: self.flipped_cells.clone(),
            flip_count: self.flip_count,
            is_game_over: self.is_game_over,
            winner: self.winner,
        }
    }

    #[cfg(test)]
    fn set_state_for_test(&mut self, board: Board, current_turn: Player, phase: GamePhase) {
        self.board = board;
        self.score = board.score();
        self.current_turn = current_turn;
        self.phase = phase;
        self.flipping_cells.clear();
        self.flipped_cells.clear();
        self.flip_count = 0;
        self.is_game_over = false;
        self.winner = None;
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

fn on_board(row: u8, col: u8) -> bool {
    (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellState;

    fn pos(row: u8, col: u8) -> Position {
        Position { row, col }
    }

    /// Full board with `black_count` black stones packed first, the rest
    /// white. No empty cells, so neither side can place.
    fn full_board(black_count: u32) -> Board {
        let black = if black_count == 0 {
            0
        } else {
            u64::MAX >> (64 - black_count)
        };
        Board::from_bitboards(black, !black)
    }

    /// Black at (0,0), white at (0,1): black can place at (0,2), white has
    /// no legal placement anywhere.
    fn stuck_white_board() -> Board {
        let mut board = Board::from_bitboards(0, 0);
        board.set(0, 0, Player::Black);
        board.set(0, 1, Player::White);
        board
    }

    #[test]
    fn initial_session_is_a_fresh_placement_turn_for_black() {
        let game = GameSession::new();
        let snap = game.snapshot();

        assert_eq!(snap.current_turn, Player::Black);
        assert_eq!(snap.phase, GamePhase::Placement);
        assert_eq!(snap.score, Score { black: 2, white: 2 });
        assert!(snap.flipping_cells.is_empty());
        assert!(snap.flipped_cells.is_empty());
        assert_eq!(snap.flip_count, 0);
        assert!(!snap.is_game_over);
        assert_eq!(snap.winner, None);
    }

    #[test]
    fn place_claims_the_cell_and_enters_flipping() {
        let mut game = GameSession::new();

        game.place_piece(2, 3);

        assert_eq!(game.board().get(2, 3), CellState::Black);
        assert_eq!(game.phase(), GamePhase::Flipping);
        assert_eq!(game.score(), Score { black: 3, white: 2 });
        // still black's turn until end_turn
        assert_eq!(game.current_turn(), Player::Black);
    }

    #[test]
    fn flip_claims_an_opponent_stone_and_recounts() {
        let mut game = GameSession::new();
        game.place_piece(2, 3);

        game.flip_piece(3, 3);

        assert_eq!(game.board().get(3, 3), CellState::Black);
        assert_eq!(game.score(), Score { black: 4, white: 1 });
        assert_eq!(game.flipped_cells(), &[pos(3, 3)]);
        assert_eq!(game.flipping_cells(), &[pos(3, 3)]);
        assert_eq!(game.flip_count(), 1);
    }

    #[test]
    fn flips_are_unlimited() {
        let mut game = GameSession::new();
        game.place_piece(2, 3);

        game.flip_piece(3, 3);
        game.flip_piece(4, 4);

        assert_eq!(game.board().get(3, 3), CellState::Black);
        assert_eq!(game.board().get(4, 4), CellState::Black);
        assert_eq!(game.flip_count(), 2);
    }

    #[test]
    fn flipping_the_same_cell_again_unflips_it() {
        let mut game = GameSession::new();
        game.place_piece(2, 3);
        game.flip_piece(3, 3);

        game.flip_piece(3, 3);

        assert_eq!(game.board().get(3, 3), CellState::White);
        assert!(!game.flipped_cells().contains(&pos(3, 3)));
        assert_eq!(game.flip_count(), 0);
        assert_eq!(game.score(), Score { black: 3, white: 2 });
        // both the flip and the unflip signal an animation
        assert_eq!(game.flipping_cells(), &[pos(3, 3), pos(3, 3)]);
    }

    #[test]
    fn flip_count_tracks_net_flips() {
        let mut game = GameSession::new();
        game.place_piece(2, 3);
        assert_eq!(game.flip_count(), 0);

        game.flip_piece(3, 3);
        assert_eq!(game.flip_count(), 1);
        game.flip_piece(4, 4);
        assert_eq!(game.flip_count(), 2);
        game.flip_piece(3, 3);
        assert_eq!(game.flip_count(), 1);
        assert_eq!(game.flip_count() as usize, game.flipped_cells().len());
    }

    #[test]
    fn clear_flipping_acknowledges_one_cell_only() {
        let mut game = GameSession::new();
        game.place_piece(2, 3);
        game.flip_piece(3, 3);
        game.flip_piece(4, 4);
        let score_before = game.score();

        game.clear_flipping(3, 3);

        assert_eq!(game.flipping_cells(), &[pos(4, 4)]);
        // cosmetic only
        assert_eq!(game.score(), score_before);
        assert_eq!(game.flip_count(), 2);
        assert_eq!(game.flipped_cells(), &[pos(3, 3), pos(4, 4)]);
    }

    #[test]
    fn end_turn_alternates_and_resets_transient_state() {
        let mut game = GameSession::new();
        game.place_piece(2, 3);
        game.flip_piece(3, 3);

        game.end_turn();

        assert_eq!(game.current_turn(), Player::White);
        assert_eq!(game.phase(), GamePhase::Placement);
        assert!(game.flipping_cells().is_empty());
        assert!(game.flipped_cells().is_empty());
        assert_eq!(game.flip_count(), 0);
        // score stays consistent with the post-flip board
        assert_eq!(game.score(), game.board().score());
    }

    #[test]
    fn t03_stuck_opponent_is_auto_passed() {
        let mut game = GameSession::new();
        game.set_state_for_test(stuck_white_board(), Player::Black, GamePhase::Flipping);

        game.end_turn();

        assert_eq!(game.current_turn(), Player::Black);
        assert_eq!(game.phase(), GamePhase::Placement);
        assert!(!game.is_game_over());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn t04_no_placements_for_either_side_ends_the_game() {
        let mut game = GameSession::new();
        game.set_state_for_test(full_board(40), Player::Black, GamePhase::Flipping);

        game.end_turn();

        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(Winner::Black));
        assert_eq!(game.phase(), GamePhase::Placement);
    }

    #[test]
    fn t05_white_wins_on_higher_count() {
        let mut game = GameSession::new();
        game.set_state_for_test(full_board(20), Player::Black, GamePhase::Flipping);

        game.end_turn();

        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(Winner::White));
    }

    #[test]
    fn t06_equal_counts_draw() {
        let mut game = GameSession::new();
        game.set_state_for_test(full_board(32), Player::Black, GamePhase::Flipping);

        game.end_turn();

        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(Winner::Draw));
    }

    #[test]
    fn commands_are_inert_after_game_over() {
        let mut game = GameSession::new();
        game.set_state_for_test(full_board(40), Player::Black, GamePhase::Flipping);
        game.end_turn();
        assert!(game.is_game_over());
        let before = *game.board();

        game.place_piece(2, 3);
        game.flip_piece(3, 3);

        assert_eq!(*game.board(), before);
        assert_eq!(game.phase(), GamePhase::Placement);
        assert_eq!(game.winner(), Some(Winner::Black));
    }

    #[test]
    fn reset_restores_the_initial_game() {
        let mut game = GameSession::new();
        game.place_piece(2, 3);
        game.flip_piece(3, 3);
        game.end_turn();
        game.set_state_for_test(full_board(40), Player::White, GamePhase::Flipping);
        game.end_turn();
        assert!(game.is_game_over());

        game.reset();

        assert_eq!(game.snapshot(), GameSession::new().snapshot());
    }

    #[test]
    fn checked_place_rejects_illegal_targets() {
        let mut game = GameSession::new();

        assert_eq!(game.try_place_piece(8, 0), Err(CommandError::OutOfRange));
        assert_eq!(
            game.try_place_piece(3, 3),
            Err(CommandError::IllegalPlacement)
        );
        assert_eq!(
            game.try_place_piece(0, 0),
            Err(CommandError::IllegalPlacement)
        );

        assert_eq!(game.try_place_piece(2, 3), Ok(()));
        assert_eq!(game.phase(), GamePhase::Flipping);
        assert_eq!(game.try_place_piece(5, 4), Err(CommandError::WrongPhase));
    }

    #[test]
    fn checked_flip_requires_an_opponent_stone_except_for_unflips() {
        let mut game = GameSession::new();
        assert_eq!(game.try_flip_piece(3, 3), Err(CommandError::WrongPhase));

        game.place_piece(2, 3);
        // empty cell
        assert_eq!(game.try_flip_piece(0, 0), Err(CommandError::NotOpponentPiece));
        // own stone
        assert_eq!(game.try_flip_piece(3, 4), Err(CommandError::NotOpponentPiece));

        assert_eq!(game.try_flip_piece(3, 3), Ok(()));
        // now black, yet still accepted as an unflip
        assert_eq!(game.try_flip_piece(3, 3), Ok(()));
        assert_eq!(game.board().get(3, 3), CellState::White);
        assert_eq!(game.flip_count(), 0);
    }

    #[test]
    fn checked_commands_report_game_over() {
        let mut game = GameSession::new();
        game.set_state_for_test(full_board(40), Player::Black, GamePhase::Flipping);
        game.end_turn();

        assert_eq!(game.try_place_piece(2, 3), Err(CommandError::GameOver));
        assert_eq!(game.try_flip_piece(3, 3), Err(CommandError::GameOver));
    }

    #[test]
    fn flip_then_unflip_is_identity_on_opponent_stones() {
        let mut game = GameSession::new();
        game.place_piece(2, 3);

        // the white stones after black's opening placement
        for (row, col) in [(3u8, 3u8), (4, 4)] {
            let cell_before = game.board().get(row, col);
            let count_before = game.flip_count();

            game.flip_piece(row, col);
            game.flip_piece(row, col);

            assert_eq!(game.board().get(row, col), cell_before);
            assert_eq!(game.flip_count(), count_before);
        }
    }
}
