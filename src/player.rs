use crate::coord::Coord;
use crate::error::FelliError;
use crate::types::{Color, PieceKey};

/// Number of pieces each player starts with.
pub const PIECE_COUNT: u8 = 6;

/// Names used when no custom name was given. A player still carrying one of
/// these is renamed after their color once colors are assigned.
pub const DEFAULT_NAMES: [&str; 2] = ["Player A", "Player B"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    id: u8,
    owner: usize,
    color: Color,
    square: Option<Coord>,
}

impl Piece {
    fn new(id: u8, owner: usize, color: Color) -> Self {
        Self {
            id,
            owner,
            color,
            square: None,
        }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn owner(&self) -> usize {
        self.owner
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Current square, `None` until placed.
    pub fn square(&self) -> Option<Coord> {
        self.square
    }

    pub fn key(&self) -> PieceKey {
        PieceKey::new(self.owner, self.id)
    }

    /// Only the board keeps this in sync with its occupancy.
    pub(crate) fn set_square(&mut self, square: Option<Coord>) {
        self.square = square;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    index: usize,
    name: String,
    color: Option<Color>,
    pieces: Vec<Piece>,
}

impl Player {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            color: None,
            pieces: Vec::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` until colors are assigned.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Pieces still in play, ordered by id.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: u8) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.id == id)
    }

    pub(crate) fn pieces_mut(&mut self) -> &mut [Piece] {
        &mut self.pieces
    }

    pub(crate) fn piece_mut(&mut self, id: u8) -> Option<&mut Piece> {
        self.pieces.iter_mut().find(|piece| piece.id == id)
    }

    pub fn has_pieces(&self) -> bool {
        !self.pieces.is_empty()
    }

    /// Gives the player a fresh roster of [`PIECE_COUNT`] unplaced pieces.
    pub fn create_pieces(&mut self, color: Color) {
        self.pieces = (0..PIECE_COUNT)
            .map(|id| Piece::new(id, self.index, color))
            .collect();
        self.color = Some(color);

        if DEFAULT_NAMES.contains(&self.name.as_str()) {
            self.name = match color {
                Color::Black => "Blacks Player",
                Color::White => "Whites Player",
            }
            .to_string();
        }
    }

    /// Drops the piece from the roster and returns it with its square cleared.
    /// The caller owns clearing the board occupancy.
    pub fn remove_piece_by_id(&mut self, id: u8) -> Result<Piece, FelliError> {
        let pos = self
            .pieces
            .iter()
            .position(|piece| piece.id == id)
            .ok_or(FelliError::UnknownPiece {
                player: self.index,
                id,
            })?;

        let mut removed = self.pieces.remove(pos);
        removed.set_square(None);
        Ok(removed)
    }
}
