use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod board;
pub mod coord;
pub mod direction;
pub mod error;
pub mod game;
pub mod options;
pub mod player;
pub mod types;

pub use board::{Board, Square};
pub use coord::Coord;
pub use direction::Direction;
pub use error::FelliError;
pub use game::{Choice, Chooser, Game, Phase, Presenter, Prompt};
pub use player::{Piece, Player};
pub use types::{Color, Move, PieceKey};

use crate::options::Options;
use crate::types::MoveView;

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// A movable piece as handed to JavaScript.
#[derive(Serialize)]
struct JsPiece {
    id: u8,
    coord: Coord,
}

fn js_err(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// Felli game exported to WASM. Setup and turns are driven step by step by
/// the page; every call checks that the game is in the right phase.
#[wasm_bindgen]
pub struct FelliEngine {
    game: Game,
}

#[wasm_bindgen]
impl FelliEngine {
    /// Missing names fall back to the color-derived defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(p1: Option<String>, p2: Option<String>) -> Result<FelliEngine, JsError> {
        let defaults = Options::default();
        let options = Options {
            player_a: p1.unwrap_or(defaults.player_a),
            player_b: p2.unwrap_or(defaults.player_b),
        };
        options.validate().map_err(js_err)?;

        Ok(Self {
            game: Game::new(options.player_a, options.player_b),
        })
    }

    #[wasm_bindgen(js_name = "assignColors")]
    pub fn assign_colors(&mut self, black: usize) -> Result<(), JsError> {
        self.game.assign_colors(black).map_err(js_err)
    }

    #[wasm_bindgen(js_name = "placePieces")]
    pub fn place_pieces(&mut self) -> Result<(), JsError> {
        self.game.place_pieces().map_err(js_err)
    }

    #[wasm_bindgen(js_name = "chooseFirst")]
    pub fn choose_first(&mut self, first: usize) -> Result<(), JsError> {
        self.game.choose_first(first).map_err(js_err)
    }

    /// Pieces of the active player that can move, in board order.
    #[wasm_bindgen(js_name = "movablePieces")]
    pub fn movable_pieces(&self) -> Result<JsValue, JsError> {
        let pieces: Vec<JsPiece> = self
            .game
            .movable_pieces()
            .iter()
            .filter_map(|piece| {
                piece.square().map(|coord| JsPiece {
                    id: piece.id(),
                    coord,
                })
            })
            .collect();
        serde_wasm_bindgen::to_value(&pieces).map_err(js_err)
    }

    #[wasm_bindgen(js_name = "legalMoves")]
    pub fn legal_moves(&self, piece_id: u8) -> Result<JsValue, JsError> {
        let moves: Vec<MoveView> = self
            .game
            .legal_moves(piece_id)
            .map_err(js_err)?
            .iter()
            .map(MoveView::from)
            .collect();
        serde_wasm_bindgen::to_value(&moves).map_err(js_err)
    }

    /// Plays the `move_index`-th entry of `legalMoves(piece_id)`.
    pub fn play(&mut self, piece_id: u8, move_index: usize) -> Result<(), JsError> {
        let moves = self.game.legal_moves(piece_id).map_err(js_err)?;
        let mv = moves
            .get(move_index)
            .ok_or_else(|| JsError::new("move index out of range"))?;
        self.game.play(mv).map_err(js_err)
    }

    pub fn quit(&mut self) {
        self.game.quit();
    }

    #[wasm_bindgen(js_name = "isGameOver")]
    pub fn is_game_over(&self) -> bool {
        self.game.is_over()
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.game.to_game_state()).map_err(js_err)
    }

    pub fn result(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.game.to_game_result()).map_err(js_err)
    }
}
