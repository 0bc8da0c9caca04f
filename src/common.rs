//! Common types: grid points, directions, shot outcomes and board errors.

use core::fmt;
use core::ops::Add;

use crate::bitboard::BitBoardError;
use crate::config::{GRID_HEIGHT, GRID_WIDTH};

/// A cell on the grid, or an offset vector relative to a ship's center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    pub x: i8,
    pub y: i8,
}

impl GridPoint {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Returns `true` if the point lies on the `GRID_WIDTH`×`GRID_HEIGHT` grid.
    pub const fn is_within_grid(self) -> bool {
        self.x >= 0 && self.x < GRID_WIDTH as i8 && self.y >= 0 && self.y < GRID_HEIGHT as i8
    }

    /// Quarter turn: `(x, y) -> (-y, x)`.
    pub const fn rotated(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Every grid point, row by row.
    pub fn all() -> impl Iterator<Item = GridPoint> {
        (0..GRID_HEIGHT as i8).flat_map(|y| (0..GRID_WIDTH as i8).map(move |x| GridPoint::new(x, y)))
    }
}

impl Add for GridPoint {
    type Output = GridPoint;

    fn add(self, rhs: GridPoint) -> GridPoint {
        GridPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unit moves reported by the navigation switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub const fn vector(self) -> GridPoint {
        match self {
            Direction::North => GridPoint::new(0, -1),
            Direction::South => GridPoint::new(0, 1),
            Direction::East => GridPoint::new(1, 0),
            Direction::West => GridPoint::new(-1, 0),
        }
    }
}

/// How one of our shots was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotOutcome {
    Hit,
    Miss,
    /// No result arrived before the result timeout; played on as a miss.
    TimedOut,
}

/// Errors returned by Board and Ship operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Underlying bitboard error.
    BitBoardError(BitBoardError),
    /// A fleet needs at least one ship.
    EmptyFleet,
    /// More ships than `MAX_SHIPS`.
    TooManyShips { count: usize },
    /// A shape without offsets.
    EmptyShape(&'static str),
    /// Two offsets of one shape cover the same cell.
    DuplicateOffset { name: &'static str, offset: GridPoint },
    /// Specified index is out of range.
    InvalidIndex,
    /// No ship is currently being placed.
    NoActiveShip,
    /// Attempted to place a ship that is already placed.
    ShipAlreadyPlaced,
    /// A ship cell lies off the grid.
    OutOfBounds(GridPoint),
    /// A ship cell is already occupied by a placed ship.
    PlacementBlocked(GridPoint),
}

impl From<BitBoardError> for BoardError {
    fn from(err: BitBoardError) -> Self {
        BoardError::BitBoardError(err)
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::BitBoardError(e) => write!(f, "BitBoard error: {}", e),
            BoardError::EmptyFleet => write!(f, "Fleet has no ships"),
            BoardError::TooManyShips { count } => {
                write!(f, "Fleet has {} ships, more than the board can hold", count)
            }
            BoardError::EmptyShape(name) => write!(f, "Ship shape {} has no offsets", name),
            BoardError::DuplicateOffset { name, offset } => {
                write!(f, "Ship shape {} repeats offset {}", name, offset)
            }
            BoardError::InvalidIndex => write!(f, "Index is out of range"),
            BoardError::NoActiveShip => write!(f, "No ship is being placed"),
            BoardError::ShipAlreadyPlaced => write!(f, "Ship is already placed on the board"),
            BoardError::OutOfBounds(p) => write!(f, "Ship cell {} is outside the grid", p),
            BoardError::PlacementBlocked(p) => write!(f, "Cell {} is already occupied", p),
        }
    }
}
