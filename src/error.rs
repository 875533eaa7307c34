use thiserror::Error;

use crate::game::PhaseKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FelliError {
    #[error("coordinate ({row}, {col}) is off the board")]
    InvalidCoord { row: i8, col: i8 },
    #[error("invalid move: {0}")]
    InvalidMove(&'static str),
    #[error("player {player} has no piece with id {id}")]
    UnknownPiece { player: usize, id: u8 },
    #[error("player index {0} out of range")]
    InvalidPlayer(usize),
    #[error("expected phase {expected:?}, found {found:?}")]
    WrongPhase { expected: PhaseKind, found: PhaseKind },
    #[error("name for {flag} must have a length between 2 and 15, got {len}")]
    InvalidName { flag: &'static str, len: usize },
}
