use tracing::debug;

use crate::coord::{Coord, NUM_ROWS, NUM_SQUARES, ROW_LENGTHS};
use crate::direction::Direction;
use crate::error::FelliError;
use crate::player::{Piece, Player};
use crate::types::{Color, Move, PieceKey};

const STRAIGHT: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Right,
    Direction::Left,
];
const UPPER_LEFT_MIDLINE: [Direction; 3] = [Direction::Up, Direction::DownRight, Direction::Right];
const UPPER_RIGHT_MIDLINE: [Direction; 3] = [Direction::Up, Direction::DownLeft, Direction::Left];
const LOWER_LEFT_MIDLINE: [Direction; 3] = [Direction::Down, Direction::Right, Direction::UpRight];
const LOWER_RIGHT_MIDLINE: [Direction; 3] = [Direction::Down, Direction::Left, Direction::UpLeft];

/// Directions physically traversable from `coord`. Depends on the coordinate only.
pub fn available_directions(coord: Coord) -> &'static [Direction] {
    match (coord.row, coord.col) {
        (_, 1) | (0, _) | (4, _) => &STRAIGHT,
        (1, 0) => &UPPER_LEFT_MIDLINE,
        (1, 2) => &UPPER_RIGHT_MIDLINE,
        (3, 0) => &LOWER_LEFT_MIDLINE,
        (3, 2) => &LOWER_RIGHT_MIDLINE,
        _ => &Direction::ALL,
    }
}

/// Coordinate reached by one step from `from` towards `direction`.
///
/// Rows 1 and 3 only ever reach the pivot row straight, and any path into
/// the pivot row lands on the pivot. Stepping out of the pivot uses a column
/// offset of +1 (straight) or +2/0 (diagonal) to reach the 3-wide rows.
/// The result may be off the board.
pub fn step(from: Coord, direction: Direction) -> Coord {
    let direction = if from.is_midline() {
        match direction {
            Direction::DownRight | Direction::DownLeft => Direction::Down,
            Direction::UpRight | Direction::UpLeft => Direction::Up,
            other => other,
        }
    } else {
        direction
    };

    let (dr, dc) = match direction {
        Direction::Up if from.is_pivot_row() => (-1, 1),
        Direction::Up => (-1, 0),
        Direction::Down if from.is_pivot_row() => (1, 1),
        Direction::Down => (1, 0),
        Direction::Right => (0, 1),
        Direction::Left => (0, -1),
        Direction::UpRight => (-1, 2),
        Direction::UpLeft => (-1, 0),
        Direction::DownRight => (1, 2),
        Direction::DownLeft => (1, 0),
    };

    let result = from + Coord::new(dr, dc);
    if !from.is_pivot_row() && result.is_pivot_row() {
        Coord::PIVOT
    } else {
        result
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    coord: Coord,
    occupant: Option<(PieceKey, Color)>,
}

impl Square {
    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn piece(&self) -> Option<PieceKey> {
        self.occupant.map(|(key, _)| key)
    }

    pub fn piece_color(&self) -> Option<Color> {
        self.occupant.map(|(_, color)| color)
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn available_directions(&self) -> &'static [Direction] {
        available_directions(self.coord)
    }
}

/// The cross-shaped board: 13 squares in rows of 3, 3, 1, 3, 3.
/// Topology is fixed; only occupancy changes.
///
/// Occupancy only changes through [`Board::apply_move`] or setup, never by
/// placing a detached copy of a piece:
///
/// ```compile_fail
/// use felli::{Board, Coord, Game};
///
/// let game = Game::from_position(&[Coord::new(1, 1)], &[], 0).unwrap();
/// let mut copy = game.players()[0].pieces()[0];
/// let mut board = Board::new();
/// board.place(&mut copy, Coord::new(0, 0)).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Square; NUM_SQUARES],
}

impl Board {
    pub fn new() -> Self {
        let mut squares = [Square {
            coord: Coord::PIVOT,
            occupant: None,
        }; NUM_SQUARES];
        for (square, &coord) in squares.iter_mut().zip(Coord::all()) {
            square.coord = coord;
        }
        Self { squares }
    }

    pub fn is_valid(&self, coord: Coord) -> bool {
        coord.is_on_board()
    }

    pub fn square_at(&self, coord: Coord) -> Result<&Square, FelliError> {
        if !self.is_valid(coord) {
            return Err(FelliError::InvalidCoord {
                row: coord.row,
                col: coord.col,
            });
        }
        Ok(&self.squares[coord.index()])
    }

    /// All squares in row-major order.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Squares grouped by row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Square]> + '_ {
        let mut start = 0;
        ROW_LENGTHS.iter().map(move |&len| {
            let row = &self.squares[start..start + len];
            start += len;
            row
        })
    }

    /// Legal moves for `piece`, in the order its square offers directions.
    /// An unplaced piece has none.
    pub fn possible_moves(&self, piece: &Piece) -> Vec<Move> {
        let Some(from) = piece.square() else {
            return Vec::new();
        };

        let mut moves = Vec::new();
        for &direction in available_directions(from) {
            let Some(neighbor) = self.square_in(from, direction) else {
                continue;
            };

            match neighbor.occupant {
                None => moves.push(Move {
                    piece: piece.key(),
                    from,
                    destination: neighbor.coord,
                    direction,
                    captured: None,
                }),
                Some((victim, color)) if color != piece.color() => {
                    if let Some(landing) = self.square_in(neighbor.coord, direction)
                        && landing.is_empty()
                    {
                        moves.push(Move {
                            piece: piece.key(),
                            from,
                            destination: landing.coord,
                            direction,
                            captured: Some(victim),
                        });
                    }
                }
                Some(_) => {}
            }
        }

        moves
    }

    pub fn has_any_move(&self, piece: &Piece) -> bool {
        !self.possible_moves(piece).is_empty()
    }

    /// Puts `piece` on `dest`, vacating its previous square if it had one.
    /// `piece` must be the roster entry itself so its cached square stays in
    /// sync with the board.
    pub(crate) fn place(&mut self, piece: &mut Piece, dest: Coord) -> Result<(), FelliError> {
        let target = self.square_at(dest)?;
        if target.piece().is_some_and(|key| key != piece.key()) {
            return Err(FelliError::InvalidMove("destination is occupied"));
        }

        if let Some(prev) = piece.square() {
            self.squares[prev.index()].occupant = None;
        }
        self.squares[dest.index()].occupant = Some((piece.key(), piece.color()));
        piece.set_square(Some(dest));
        Ok(())
    }

    /// Relocates the moving piece and, for a capture, removes the captured
    /// piece from the board and from its owner's roster.
    ///
    /// Only a move `possible_moves` would generate for the piece right now is
    /// accepted; anything else is rejected before anything is mutated.
    pub fn apply_move(&mut self, mv: &Move, players: &mut [Player; 2]) -> Result<(), FelliError> {
        let mover = players
            .get(mv.piece.player)
            .ok_or(FelliError::InvalidPlayer(mv.piece.player))?
            .piece(mv.piece.id)
            .ok_or(FelliError::UnknownPiece {
                player: mv.piece.player,
                id: mv.piece.id,
            })?;
        if !self.possible_moves(mover).contains(mv) {
            return Err(FelliError::InvalidMove("move is not legal in this position"));
        }
        let captured_square = mv.captured.map(|_| step(mv.from, mv.direction));

        let piece = players[mv.piece.player]
            .piece_mut(mv.piece.id)
            .ok_or(FelliError::UnknownPiece {
                player: mv.piece.player,
                id: mv.piece.id,
            })?;
        self.place(piece, mv.destination)?;
        debug!(
            player = mv.piece.player,
            piece = mv.piece.id,
            from = %mv.from,
            to = %mv.destination,
            "moved piece"
        );

        if let (Some(victim), Some(square)) = (mv.captured, captured_square) {
            self.squares[square.index()].occupant = None;
            players[victim.player].remove_piece_by_id(victim.id)?;
            debug!(player = victim.player, piece = victim.id, at = %square, "captured piece");
        }

        Ok(())
    }

    /// Places each player's roster on their side of the board: player 0 fills
    /// from the top row down, player 1 from row 3 down, square by square.
    pub fn setup_pieces(&mut self, players: &mut [Player; 2]) -> Result<(), FelliError> {
        for (player, first_row) in players.iter_mut().zip([0, NUM_ROWS - 2]) {
            let targets: Vec<Coord> = Coord::all()
                .iter()
                .copied()
                .filter(|coord| coord.row as usize >= first_row)
                .take(player.pieces().len())
                .collect();

            for (piece, dest) in player.pieces_mut().iter_mut().zip(targets) {
                self.place(piece, dest)?;
            }
        }
        Ok(())
    }

    fn square_in(&self, from: Coord, direction: Direction) -> Option<&Square> {
        self.square_at(step(from, direction)).ok()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: i8, col: i8) -> Coord {
        Coord::new(row, col)
    }

    /// Black is player 0, white player 1. Pieces beyond the given squares
    /// are dropped from the rosters.
    fn position(black: &[Coord], white: &[Coord]) -> (Board, [Player; 2]) {
        let mut board = Board::new();
        let mut players = [Player::new(0, "Black"), Player::new(1, "White")];
        players[0].create_pieces(Color::Black);
        players[1].create_pieces(Color::White);

        for (player, squares) in players.iter_mut().zip([black, white]) {
            for (id, &coord) in squares.iter().enumerate() {
                let piece = player.piece_mut(id as u8).unwrap();
                board.place(piece, coord).unwrap();
            }
            for id in squares.len() as u8..6 {
                player.remove_piece_by_id(id).unwrap();
            }
        }

        (board, players)
    }

    fn destinations(moves: &[Move]) -> Vec<Coord> {
        moves.iter().map(|mv| mv.destination).collect()
    }

    #[test]
    fn square_at_returns_square_with_matching_coord() {
        let board = Board::new();

        for &coord in Coord::all() {
            assert!(board.is_valid(coord));
            assert_eq!(board.square_at(coord).unwrap().coord(), coord);
        }
        assert_eq!(
            board.square_at(c(2, 1)),
            Err(FelliError::InvalidCoord { row: 2, col: 1 })
        );
        assert!(board.square_at(c(-1, 0)).is_err());
    }

    #[test]
    fn rows_follow_three_three_one_three_three() {
        let board = Board::new();
        let lens: Vec<usize> = board.rows().map(|row| row.len()).collect();

        assert_eq!(lens, vec![3, 3, 1, 3, 3]);
        assert_eq!(board.rows().nth(2).unwrap()[0].coord(), Coord::PIVOT);
    }

    #[test]
    fn direction_table_matches_square_classes() {
        assert_eq!(available_directions(c(0, 0)), &STRAIGHT);
        assert_eq!(available_directions(c(4, 2)), &STRAIGHT);
        assert_eq!(available_directions(c(1, 1)), &STRAIGHT);
        assert_eq!(available_directions(c(3, 1)), &STRAIGHT);
        assert_eq!(
            available_directions(c(1, 0)),
            &[Direction::Up, Direction::DownRight, Direction::Right]
        );
        assert_eq!(
            available_directions(c(1, 2)),
            &[Direction::Up, Direction::DownLeft, Direction::Left]
        );
        assert_eq!(
            available_directions(c(3, 0)),
            &[Direction::Down, Direction::Right, Direction::UpRight]
        );
        assert_eq!(
            available_directions(c(3, 2)),
            &[Direction::Down, Direction::Left, Direction::UpLeft]
        );
        assert_eq!(available_directions(Coord::PIVOT), &Direction::ALL);
    }

    #[test]
    fn step_out_of_pivot_reaches_all_eight_arm_tips() {
        let p = Coord::PIVOT;

        assert_eq!(step(p, Direction::Up), c(1, 1));
        assert_eq!(step(p, Direction::Down), c(3, 1));
        assert_eq!(step(p, Direction::UpLeft), c(1, 0));
        assert_eq!(step(p, Direction::UpRight), c(1, 2));
        assert_eq!(step(p, Direction::DownLeft), c(3, 0));
        assert_eq!(step(p, Direction::DownRight), c(3, 2));
        assert!(!step(p, Direction::Left).is_on_board());
        assert!(!step(p, Direction::Right).is_on_board());
    }

    #[test]
    fn step_into_pivot_row_always_lands_on_pivot() {
        assert_eq!(step(c(1, 0), Direction::DownRight), Coord::PIVOT);
        assert_eq!(step(c(1, 1), Direction::Down), Coord::PIVOT);
        assert_eq!(step(c(1, 2), Direction::DownLeft), Coord::PIVOT);
        assert_eq!(step(c(3, 0), Direction::UpRight), Coord::PIVOT);
        assert_eq!(step(c(3, 1), Direction::Up), Coord::PIVOT);
        assert_eq!(step(c(3, 2), Direction::UpLeft), Coord::PIVOT);
    }

    #[test]
    fn step_off_the_board_is_reported_not_clamped() {
        assert_eq!(step(c(0, 0), Direction::Up), c(-1, 0));
        assert_eq!(step(c(4, 2), Direction::Right), c(4, 3));
        assert!(!step(c(0, 0), Direction::Left).is_on_board());
    }

    #[test]
    fn step_and_back_returns_home_away_from_pivot() {
        for &from in Coord::all()
            .iter()
            .filter(|coord| coord.row == 0 || coord.row == 4)
        {
            for &dir in available_directions(from) {
                let to = step(from, dir);
                if !to.is_on_board() || to.is_pivot_row() {
                    continue;
                }
                assert_eq!(step(to, dir.opposite()), from, "{from} via {dir:?}");
            }
        }
    }

    #[test]
    fn lone_piece_on_pivot_can_reach_six_squares() {
        let (board, players) = position(&[Coord::PIVOT], &[]);
        let moves = board.possible_moves(&players[0].pieces()[0]);

        assert_eq!(
            destinations(&moves),
            vec![c(1, 1), c(3, 1), c(1, 2), c(1, 0), c(3, 2), c(3, 0)]
        );
        assert!(moves.iter().all(|mv| !mv.is_capture()));
    }

    #[test]
    fn midline_corner_jumps_over_pivot_diagonally() {
        let (board, players) = position(&[c(1, 0)], &[Coord::PIVOT]);
        let moves = board.possible_moves(&players[0].pieces()[0]);
        let captures: Vec<&Move> = moves.iter().filter(|mv| mv.is_capture()).collect();

        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].direction, Direction::DownRight);
        assert_eq!(captures[0].destination, c(3, 2));
        assert_eq!(captures[0].captured, Some(PieceKey::new(1, 0)));
        assert_eq!(destinations(&moves), vec![c(0, 0), c(3, 2), c(1, 1)]);
    }

    #[test]
    fn same_color_neighbor_blocks_direction() {
        let (board, players) = position(&[c(0, 0), c(0, 1), c(1, 0)], &[]);
        let moves = board.possible_moves(&players[0].pieces()[0]);

        assert!(moves.is_empty());
        assert!(!board.has_any_move(&players[0].pieces()[0]));
    }

    #[test]
    fn capture_requires_empty_landing_square() {
        let (board, players) = position(&[c(0, 0)], &[c(0, 1), c(0, 2), c(1, 0), Coord::PIVOT]);
        let moves = board.possible_moves(&players[0].pieces()[0]);

        assert!(moves.is_empty());
    }

    #[test]
    fn capture_never_leaps_off_the_board() {
        let (board, players) = position(&[c(0, 1)], &[c(0, 2)]);
        let moves = board.possible_moves(&players[0].pieces()[0]);

        assert!(moves.iter().all(|mv| !mv.is_capture()));
        assert_eq!(destinations(&moves), vec![c(1, 1), c(0, 0)]);
    }

    #[test]
    fn straight_jump_through_pivot_lands_in_column_one() {
        let (board, players) = position(&[c(1, 1)], &[Coord::PIVOT]);
        let moves = board.possible_moves(&players[0].pieces()[0]);
        let capture = moves.iter().find(|mv| mv.is_capture()).unwrap();

        assert_eq!(capture.direction, Direction::Down);
        assert_eq!(capture.destination, c(3, 1));
    }

    #[test]
    fn apply_capture_updates_board_and_roster() {
        let (mut board, mut players) = position(&[c(1, 0)], &[Coord::PIVOT, c(4, 0)]);
        let mv = board
            .possible_moves(&players[0].pieces()[0])
            .into_iter()
            .find(Move::is_capture)
            .unwrap();

        board.apply_move(&mv, &mut players).unwrap();

        assert!(board.square_at(c(1, 0)).unwrap().is_empty());
        assert!(board.square_at(Coord::PIVOT).unwrap().is_empty());
        assert_eq!(
            board.square_at(c(3, 2)).unwrap().piece(),
            Some(PieceKey::new(0, 0))
        );
        assert_eq!(players[0].pieces()[0].square(), Some(c(3, 2)));
        assert!(players[1].piece(0).is_none());
        assert_eq!(players[1].pieces().len(), 1);
    }

    #[test]
    fn apply_plain_move_vacates_source() {
        let (mut board, mut players) = position(&[c(1, 1)], &[]);
        let mv = board.possible_moves(&players[0].pieces()[0])[0];

        board.apply_move(&mv, &mut players).unwrap();

        assert_eq!(mv.destination, c(0, 1));
        assert!(board.square_at(c(1, 1)).unwrap().is_empty());
        assert_eq!(board.square_at(c(0, 1)).unwrap().piece(), Some(mv.piece));
    }

    #[test]
    fn apply_rejects_moves_the_rules_do_not_generate() {
        let (mut board, mut players) = position(&[c(1, 1), c(0, 0)], &[c(4, 1), c(3, 2)]);
        let before = (board.clone(), players.clone());

        let onto_friend = Move {
            piece: PieceKey::new(0, 0),
            from: c(1, 1),
            destination: c(0, 0),
            direction: Direction::Up,
            captured: None,
        };
        let wrong_source = Move {
            from: c(3, 1),
            destination: c(0, 1),
            ..onto_friend
        };
        let capture_own = Move {
            destination: c(0, 1),
            captured: Some(PieceKey::new(0, 1)),
            ..onto_friend
        };
        let step_taking_distant_piece = Move {
            destination: Coord::PIVOT,
            direction: Direction::Down,
            captured: Some(PieceKey::new(1, 0)),
            ..onto_friend
        };
        let removed_piece = Move {
            piece: PieceKey::new(0, 4),
            ..onto_friend
        };

        for mv in [onto_friend, wrong_source, capture_own, step_taking_distant_piece] {
            assert_eq!(
                board.apply_move(&mv, &mut players),
                Err(FelliError::InvalidMove("move is not legal in this position")),
                "{mv:?}"
            );
        }
        assert_eq!(
            board.apply_move(&removed_piece, &mut players),
            Err(FelliError::UnknownPiece { player: 0, id: 4 })
        );
        assert_eq!((board, players), before);
    }

    #[test]
    fn plain_step_in_opening_cannot_remove_a_far_piece() {
        let mut board = Board::new();
        let mut players = [Player::new(0, "A"), Player::new(1, "B")];
        players[0].create_pieces(Color::Black);
        players[1].create_pieces(Color::White);
        board.setup_pieces(&mut players).unwrap();

        let legal = board.possible_moves(players[0].piece(4).unwrap());
        assert_eq!(legal.len(), 1);
        let forged = Move {
            captured: Some(PieceKey::new(1, 5)),
            ..legal[0]
        };

        assert!(board.apply_move(&forged, &mut players).is_err());
        assert_eq!(players[1].pieces().len(), 6);
        assert_eq!(
            board.square_at(c(4, 2)).unwrap().piece(),
            Some(PieceKey::new(1, 5))
        );
        assert!(board.square_at(Coord::PIVOT).unwrap().is_empty());
    }

    #[test]
    fn setup_fills_two_rows_per_side() {
        let mut board = Board::new();
        let mut players = [Player::new(0, "A"), Player::new(1, "B")];
        players[0].create_pieces(Color::White);
        players[1].create_pieces(Color::Black);

        board.setup_pieces(&mut players).unwrap();

        for square in board.squares() {
            let expected = match square.coord().row {
                0 | 1 => Some(Color::White),
                2 => None,
                _ => Some(Color::Black),
            };
            assert_eq!(square.piece_color(), expected, "{}", square.coord());
        }
        assert_eq!(players[0].pieces()[5].square(), Some(c(1, 2)));
        assert_eq!(players[1].pieces()[0].square(), Some(c(3, 0)));
    }
}
