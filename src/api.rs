//! WebAssembly bindings consumed by the browser UI.
//!
//! The wrapper owns one [`GameSession`] plus the room metadata the frontend
//! keeps beside it. The UI dispatches the command methods and re-reads
//! [`AnarchyGame::state`] after each one; actual room synchronization over
//! the network is out of scope here.

use crate::game::GameSession;
use crate::rules;
use crate::types::Player;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct AnarchyGame {
    session: GameSession,
    room_id: Option<String>,
    player_id: Option<String>,
    is_connected: bool,
}

#[wasm_bindgen]
impl AnarchyGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            session: GameSession::new(),
            room_id: None,
            player_id: None,
            is_connected: false,
        }
    }

    #[wasm_bindgen(js_name = placePiece)]
    pub fn place_piece(&mut self, row: u8, col: u8) {
        self.session.place_piece(row, col);
    }

    #[wasm_bindgen(js_name = flipPiece)]
    pub fn flip_piece(&mut self, row: u8, col: u8) {
        self.session.flip_piece(row, col);
    }

    #[wasm_bindgen(js_name = clearFlipping)]
    pub fn clear_flipping(&mut self, row: u8, col: u8) {
        self.session.clear_flipping(row, col);
    }

    #[wasm_bindgen(js_name = endTurn)]
    pub fn end_turn(&mut self) {
        self.session.end_turn();
    }

    #[wasm_bindgen(js_name = resetGame)]
    pub fn reset_game(&mut self) {
        self.session.reset();
    }

    /// Checked placement for hosts that cannot guarantee pre-validation.
    #[wasm_bindgen(js_name = tryPlacePiece)]
    pub fn try_place_piece(&mut self, row: u8, col: u8) -> Result<(), JsValue> {
        self.session
            .try_place_piece(row, col)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Checked flip for hosts that cannot guarantee pre-validation.
    #[wasm_bindgen(js_name = tryFlipPiece)]
    pub fn try_flip_piece(&mut self, row: u8, col: u8) -> Result<(), JsValue> {
        self.session
            .try_flip_piece(row, col)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Full game state as a plain JS object.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.session.snapshot())?)
    }

    /// Legal placements for the current player, row-major.
    #[wasm_bindgen(js_name = validMoves)]
    pub fn valid_moves(&self) -> Result<JsValue, JsValue> {
        let moves = rules::valid_moves(self.session.board(), self.session.current_turn());
        Ok(serde_wasm_bindgen::to_value(&moves)?)
    }

    /// Whether `(row, col)` is a legal placement for the current player.
    #[wasm_bindgen(js_name = isValidMove)]
    pub fn is_valid_move(&self, row: i32, col: i32) -> bool {
        rules::is_valid_move(self.session.board(), row, col, self.session.current_turn())
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.session.is_game_over()
    }

    #[wasm_bindgen(js_name = currentTurnIsBlack)]
    pub fn current_turn_is_black(&self) -> bool {
        self.session.current_turn() == Player::Black
    }

    #[wasm_bindgen(js_name = setRoom)]
    pub fn set_room(&mut self, room_id: String, player_id: String) {
        self.room_id = Some(room_id);
        self.player_id = Some(player_id);
    }

    #[wasm_bindgen(js_name = setConnected)]
    pub fn set_connected(&mut self, connected: bool) {
        self.is_connected = connected;
    }

    /// Drops the room membership and starts a fresh game.
    #[wasm_bindgen(js_name = leaveRoom)]
    pub fn leave_room(&mut self) {
        self.room_id = None;
        self.player_id = None;
        self.is_connected = false;
        self.session.reset();
    }

    #[wasm_bindgen(getter, js_name = roomId)]
    pub fn room_id(&self) -> Option<String> {
        self.room_id.clone()
    }

    #[wasm_bindgen(getter, js_name = playerId)]
    pub fn player_id(&self) -> Option<String> {
        self.player_id.clone()
    }

    #[wasm_bindgen(getter, js_name = isConnected)]
    pub fn is_connected(&self) -> bool {
        self.is_connected
    }
}

impl Default for AnarchyGame {
    fn default() -> Self {
        Self::new()
    }
}
