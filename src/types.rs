use serde::Serialize;

use crate::coord::Coord;
use crate::direction::Direction;
use crate::game::PhaseKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub const fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

/// Identifies a piece: the owning player's index (0 or 1) and the piece id,
/// which is unique only within that player's roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PieceKey {
    pub player: usize,
    pub id: u8,
}

impl PieceKey {
    pub const fn new(player: usize, id: u8) -> Self {
        Self { player, id }
    }
}

/// "Piece `piece` moves from `from` to `destination`, optionally capturing `captured`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Move {
    pub piece: PieceKey,
    pub from: Coord,
    pub destination: Coord,
    pub direction: Direction,
    pub captured: Option<PieceKey>,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// A piece resting on a square, as seen by a presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occupant {
    pub player: usize,
    pub id: u8,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SquareState {
    pub coord: Coord,
    pub occupant: Option<Occupant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerState {
    pub name: String,
    pub color: Option<Color>,
    pub piece_count: u8,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub phase: PhaseKind,
    /// `Some` only while a turn is in progress.
    pub current_player: Option<usize>,
    pub rows: Vec<Vec<SquareState>>,
    pub players: Vec<PlayerState>,
    pub is_game_over: bool,
    pub winner: Option<usize>,
}

/// A legal move flattened for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveView {
    pub piece_id: u8,
    pub from: Coord,
    pub to: Coord,
    pub captured: Option<u8>,
}

impl From<&Move> for MoveView {
    fn from(mv: &Move) -> Self {
        Self {
            piece_id: mv.piece.id,
            from: mv.from,
            to: mv.destination,
            captured: mv.captured.map(|key| key.id),
        }
    }
}

/// Final result after game over. `winner` is `None` when the game was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub winner: Option<usize>,
    pub winner_name: Option<String>,
}
