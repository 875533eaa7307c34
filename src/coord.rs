use std::fmt;
use std::ops::Add;

use once_cell::sync::Lazy;
use serde::Serialize;

/// Number of squares in each row, top to bottom. Row 2 is the pivot row.
pub const ROW_LENGTHS: [usize; NUM_ROWS] = [3, 3, 1, 3, 3];
pub const NUM_ROWS: usize = 5;
pub const NUM_SQUARES: usize = 13;
pub const PIVOT_ROW: i8 = 2;

static ALL_COORDS: Lazy<Vec<Coord>> = Lazy::new(|| {
    ROW_LENGTHS
        .iter()
        .enumerate()
        .flat_map(|(row, &len)| (0..len).map(move |col| Coord::new(row as i8, col as i8)))
        .collect()
});

/// A board coordinate. May lie off the board; see [`Coord::is_on_board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Coord {
    pub row: i8,
    pub col: i8,
}

impl Coord {
    pub const PIVOT: Coord = Coord::new(PIVOT_ROW, 0);

    #[inline]
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// `0 <= row < 5` and `0 <= col < ROW_LENGTHS[row]`.
    pub fn is_on_board(self) -> bool {
        if self.row < 0 || self.row as usize >= NUM_ROWS {
            return false;
        }
        self.col >= 0 && (self.col as usize) < ROW_LENGTHS[self.row as usize]
    }

    /// Rows 1 and 3, the rows flanking the pivot.
    #[inline]
    pub fn is_midline(self) -> bool {
        self.row == PIVOT_ROW - 1 || self.row == PIVOT_ROW + 1
    }

    #[inline]
    pub fn is_pivot_row(self) -> bool {
        self.row == PIVOT_ROW
    }

    /// Row-major index into a flat square array. Only meaningful on the board.
    pub(crate) fn index(self) -> usize {
        ROW_LENGTHS[..self.row as usize].iter().sum::<usize>() + self.col as usize
    }

    /// Every on-board coordinate in row-major order.
    pub fn all() -> &'static [Coord] {
        &ALL_COORDS
    }
}

impl Add for Coord {
    type Output = Coord;

    #[inline]
    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
