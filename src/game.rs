use serde::Serialize;
use tracing::{info, warn};

use crate::board::Board;
use crate::coord::Coord;
use crate::error::FelliError;
use crate::player::{DEFAULT_NAMES, PIECE_COUNT, Piece, Player};
use crate::types::{Color, GameResult, GameState, Move, Occupant, PlayerState, SquareState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingColorChoice,
    Placing,
    AwaitingFirstPlayerChoice,
    Turn(usize),
    /// `winner` is `None` when the game was abandoned.
    GameOver { winner: Option<usize> },
}

/// [`Phase`] without its payload, for error reporting and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhaseKind {
    AwaitingColorChoice,
    Placing,
    AwaitingFirstPlayerChoice,
    Turn,
    GameOver,
}

impl Phase {
    pub fn kind(self) -> PhaseKind {
        match self {
            Phase::AwaitingColorChoice => PhaseKind::AwaitingColorChoice,
            Phase::Placing => PhaseKind::Placing,
            Phase::AwaitingFirstPlayerChoice => PhaseKind::AwaitingFirstPlayerChoice,
            Phase::Turn(_) => PhaseKind::Turn,
            Phase::GameOver { .. } => PhaseKind::GameOver,
        }
    }
}

/// Answer to a [`Prompt`]: the index of one of the offered options, or a
/// refusal to choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Select(usize),
    Cancel,
}

/// A decision the game needs from outside, with the options on offer.
#[derive(Debug, Clone, Copy)]
pub enum Prompt<'a> {
    BlackPlayer { players: &'a [Player; 2] },
    FirstPlayer { players: &'a [Player; 2] },
    Piece { player: &'a Player, pieces: &'a [Piece] },
    Destination { piece: &'a Piece, moves: &'a [Move] },
}

impl Prompt<'_> {
    pub fn title(&self) -> &'static str {
        match self {
            Prompt::BlackPlayer { .. } => "Who plays with the black pieces?",
            Prompt::FirstPlayer { .. } => "Who plays first?",
            Prompt::Piece { .. } => "Select a piece to move",
            Prompt::Destination { .. } => "Select a destination",
        }
    }

    /// Number of options; a valid answer is `Select(i)` with `i < len()`.
    pub fn len(&self) -> usize {
        match self {
            Prompt::BlackPlayer { players } | Prompt::FirstPlayer { players } => players.len(),
            Prompt::Piece { pieces, .. } => pieces.len(),
            Prompt::Destination { moves, .. } => moves.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Input side of the presentation layer. Blocks until the user decides.
pub trait Chooser {
    fn choose(&mut self, prompt: &Prompt<'_>) -> Choice;
}

/// Output side of the presentation layer.
pub trait Presenter {
    fn show(&mut self, _game: &Game) {}

    fn announce_turn(&mut self, _player: &Player) {}

    fn game_over(&mut self, _winner: Option<&Player>) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}

pub struct Game {
    board: Board,
    players: [Player; 2],
    phase: Phase,
}

impl Game {
    pub fn new(name_a: impl Into<String>, name_b: impl Into<String>) -> Self {
        Self {
            board: Board::new(),
            players: [Player::new(0, name_a), Player::new(1, name_b)],
            phase: Phase::AwaitingColorChoice,
        }
    }

    pub fn with_default_names() -> Self {
        Self::new(DEFAULT_NAMES[0], DEFAULT_NAMES[1])
    }

    /// Builds a mid-game position: player 0 plays black on `black`, player 1
    /// white on `white`, ids following slice order. Pieces beyond the listed
    /// squares are out of play. `to_move` loses at once if they cannot move.
    pub fn from_position(
        black: &[Coord],
        white: &[Coord],
        to_move: usize,
    ) -> Result<Self, FelliError> {
        let mut game = Self::new("Black", "White");
        game.player(to_move)?;
        game.players[0].create_pieces(Color::Black);
        game.players[1].create_pieces(Color::White);

        for (player, squares) in game.players.iter_mut().zip([black, white]) {
            if squares.len() > PIECE_COUNT as usize {
                return Err(FelliError::InvalidMove("too many pieces for one player"));
            }
            for (piece, &coord) in player.pieces_mut().iter_mut().zip(squares) {
                game.board.place(piece, coord)?;
            }
            for id in squares.len() as u8..PIECE_COUNT {
                player.remove_piece_by_id(id)?;
            }
        }

        game.start_turn(to_move);
        Ok(game)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Result<&Player, FelliError> {
        self.players.get(index).ok_or(FelliError::InvalidPlayer(index))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. })
    }

    pub fn current_player(&self) -> Option<&Player> {
        match self.phase {
            Phase::Turn(idx) => Some(&self.players[idx]),
            _ => None,
        }
    }

    pub fn winner(&self) -> Option<&Player> {
        match self.phase {
            Phase::GameOver {
                winner: Some(idx),
            } => Some(&self.players[idx]),
            _ => None,
        }
    }

    /// Gives `black` the black pieces and the other player the white ones.
    pub fn assign_colors(&mut self, black: usize) -> Result<(), FelliError> {
        self.expect_phase(PhaseKind::AwaitingColorChoice)?;
        self.player(black)?;

        self.players[black].create_pieces(Color::Black);
        self.players[opponent_of(black)].create_pieces(Color::White);
        self.phase = Phase::Placing;
        Ok(())
    }

    pub fn place_pieces(&mut self) -> Result<(), FelliError> {
        self.expect_phase(PhaseKind::Placing)?;

        self.board.setup_pieces(&mut self.players)?;
        self.phase = Phase::AwaitingFirstPlayerChoice;
        info!(
            black = self.players.iter().position(|p| p.color() == Some(Color::Black)),
            "pieces placed"
        );
        Ok(())
    }

    pub fn choose_first(&mut self, first: usize) -> Result<(), FelliError> {
        self.expect_phase(PhaseKind::AwaitingFirstPlayerChoice)?;
        self.player(first)?;

        self.start_turn(first);
        Ok(())
    }

    /// The active player's pieces that can move, in board order.
    pub fn movable_pieces(&self) -> Vec<Piece> {
        match self.phase {
            Phase::Turn(idx) => self.movable_pieces_of(idx),
            _ => Vec::new(),
        }
    }

    /// Legal moves of one of the active player's pieces.
    pub fn legal_moves(&self, piece_id: u8) -> Result<Vec<Move>, FelliError> {
        let idx = self.active_player()?;
        let piece = self.players[idx]
            .piece(piece_id)
            .ok_or(FelliError::UnknownPiece {
                player: idx,
                id: piece_id,
            })?;
        Ok(self.board.possible_moves(piece))
    }

    /// Applies one of the active player's legal moves and passes the turn.
    pub fn play(&mut self, mv: &Move) -> Result<(), FelliError> {
        let idx = self.active_player()?;
        if mv.piece.player != idx {
            return Err(FelliError::InvalidMove("piece does not belong to the active player"));
        }
        self.board.apply_move(mv, &mut self.players)?;
        self.start_turn(opponent_of(idx));
        Ok(())
    }

    /// Abandons the game without a winner.
    pub fn quit(&mut self) {
        info!("game abandoned");
        self.phase = Phase::GameOver { winner: None };
    }

    pub fn to_game_state(&self) -> GameState {
        let rows = self
            .board
            .rows()
            .map(|row| {
                row.iter()
                    .map(|square| SquareState {
                        coord: square.coord(),
                        occupant: square.piece().zip(square.piece_color()).map(
                            |(key, color)| Occupant {
                                player: key.player,
                                id: key.id,
                                color,
                            },
                        ),
                    })
                    .collect()
            })
            .collect();

        GameState {
            phase: self.phase.kind(),
            current_player: match self.phase {
                Phase::Turn(idx) => Some(idx),
                _ => None,
            },
            rows,
            players: self
                .players
                .iter()
                .map(|player| PlayerState {
                    name: player.name().to_string(),
                    color: player.color(),
                    piece_count: player.pieces().len() as u8,
                })
                .collect(),
            is_game_over: self.is_over(),
            winner: self.winner().map(Player::index),
        }
    }

    pub fn to_game_result(&self) -> GameResult {
        let winner = self.winner();
        GameResult {
            winner: winner.map(Player::index),
            winner_name: winner.map(|player| player.name().to_string()),
        }
    }

    fn movable_pieces_of(&self, idx: usize) -> Vec<Piece> {
        let player = &self.players[idx];
        self.board
            .squares()
            .iter()
            .filter_map(|square| square.piece())
            .filter(|key| key.player == idx)
            .filter_map(|key| player.piece(key.id))
            .filter(|piece| self.board.has_any_move(piece))
            .copied()
            .collect()
    }

    /// Hands the turn to `idx`, or ends the game if they cannot move.
    fn start_turn(&mut self, idx: usize) {
        if !self.players[idx].has_pieces() || self.movable_pieces_of(idx).is_empty() {
            let winner = opponent_of(idx);
            info!(
                winner,
                name = self.players[winner].name(),
                loser_pieces = self.players[idx].pieces().len(),
                "game over"
            );
            self.phase = Phase::GameOver {
                winner: Some(winner),
            };
        } else {
            self.phase = Phase::Turn(idx);
        }
    }

    fn active_player(&self) -> Result<usize, FelliError> {
        match self.phase {
            Phase::Turn(idx) => Ok(idx),
            other => Err(FelliError::WrongPhase {
                expected: PhaseKind::Turn,
                found: other.kind(),
            }),
        }
    }

    fn expect_phase(&self, expected: PhaseKind) -> Result<(), FelliError> {
        let found = self.phase.kind();
        if found != expected {
            return Err(FelliError::WrongPhase { expected, found });
        }
        Ok(())
    }
}

/// Outcome of one player's turn as decided through the [`Chooser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Play(Move),
    Quit,
}

/// Drives a fresh game from color choice to game over.
///
/// Cancelling either setup prompt or the piece selection abandons the game;
/// cancelling the destination goes back to piece selection. Returns the
/// winner's index, `None` if the game was abandoned.
pub fn run<C, P>(
    game: &mut Game,
    chooser: &mut C,
    presenter: &mut P,
) -> Result<Option<usize>, FelliError>
where
    C: Chooser + ?Sized,
    P: Presenter + ?Sized,
{
    presenter.show(game);

    let black = ask(chooser, &Prompt::BlackPlayer {
        players: game.players(),
    });
    let Some(black) = black else {
        return Ok(finish(game, presenter));
    };
    game.assign_colors(black)?;
    game.place_pieces()?;

    let first = ask(chooser, &Prompt::FirstPlayer {
        players: game.players(),
    });
    let Some(first) = first else {
        return Ok(finish(game, presenter));
    };
    game.choose_first(first)?;

    while let Phase::Turn(idx) = game.phase() {
        presenter.show(game);
        presenter.announce_turn(&game.players()[idx]);

        match decide_turn(game, chooser)? {
            Decision::Play(mv) => game.play(&mv)?,
            Decision::Quit => game.quit(),
        }
    }

    Ok(finish(game, presenter))
}

/// Piece selection then destination selection for the active player.
pub fn decide_turn<C>(game: &Game, chooser: &mut C) -> Result<Decision, FelliError>
where
    C: Chooser + ?Sized,
{
    let idx = game.active_player()?;

    loop {
        let pieces = game.movable_pieces();
        let Some(selected) = ask(chooser, &Prompt::Piece {
            player: &game.players()[idx],
            pieces: &pieces,
        }) else {
            return Ok(Decision::Quit);
        };

        let piece = &pieces[selected];
        let moves = game.legal_moves(piece.id())?;
        if let Some(dest) = ask(chooser, &Prompt::Destination {
            piece,
            moves: &moves,
        }) {
            return Ok(Decision::Play(moves[dest]));
        }
    }
}

fn ask<C>(chooser: &mut C, prompt: &Prompt<'_>) -> Option<usize>
where
    C: Chooser + ?Sized,
{
    match chooser.choose(prompt) {
        Choice::Select(idx) if idx < prompt.len() => Some(idx),
        Choice::Select(idx) => {
            warn!(
                idx,
                options = prompt.len(),
                prompt = prompt.title(),
                "selection out of range, treated as cancel"
            );
            None
        }
        Choice::Cancel => None,
    }
}

fn finish<P>(game: &mut Game, presenter: &mut P) -> Option<usize>
where
    P: Presenter + ?Sized,
{
    if !game.is_over() {
        game.quit();
    }
    presenter.show(game);
    presenter.game_over(game.winner());
    game.winner().map(Player::index)
}

fn opponent_of(player: usize) -> usize {
    match player {
        0 => 1,
        1 => 0,
        _ => unreachable!("invalid player index: {}", player),
    }
}
