//! Ship shapes and the polyomino ships built from them.

use crate::common::{BoardError, Direction, GridPoint};
use crate::config::{DEFAULT_POS, GRID_HEIGHT, GRID_WIDTH, MAX_SHIP_OFFSETS};

/// Static description of a ship: a name and its offsets from the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipShape {
    name: &'static str,
    offsets: [GridPoint; MAX_SHIP_OFFSETS],
    len: usize,
}

impl ShipShape {
    /// Build a shape from `(dx, dy)` offsets. Panics at compile time when used
    /// in a const with more than `MAX_SHIP_OFFSETS` offsets.
    pub const fn new(name: &'static str, offsets: &[(i8, i8)]) -> Self {
        assert!(offsets.len() <= MAX_SHIP_OFFSETS, "ship shape has too many offsets");
        let mut cells = [GridPoint::new(0, 0); MAX_SHIP_OFFSETS];
        let mut i = 0;
        while i < offsets.len() {
            cells[i] = GridPoint::new(offsets[i].0, offsets[i].1);
            i += 1;
        }
        Self {
            name,
            offsets: cells,
            len: offsets.len(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn offsets(&self) -> &[GridPoint] {
        &self.offsets[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Rejects shapes without cells or with two offsets on the same cell.
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.is_empty() {
            return Err(BoardError::EmptyShape(self.name));
        }
        let offsets = self.offsets();
        for (i, a) in offsets.iter().enumerate() {
            if offsets[i + 1..].contains(a) {
                return Err(BoardError::DuplicateOffset {
                    name: self.name,
                    offset: *a,
                });
            }
        }
        Ok(())
    }
}

/// Lifecycle of a ship during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShipStatus {
    /// Waiting for its turn to be placed.
    Idle,
    /// Currently following the player's moves and rotations.
    BeingPlaced,
    /// Fixed on the board; only hit flags change from now on.
    Placed,
}

/// A rigid polyomino: a center, offsets relative to it and one hit flag per offset.
/// Sunk is derived from the hit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ship {
    shape: ShipShape,
    pos: GridPoint,
    offsets: [GridPoint; MAX_SHIP_OFFSETS],
    hits: [bool; MAX_SHIP_OFFSETS],
    status: ShipStatus,
}

impl Ship {
    /// Create an idle ship at the spawn position, nudged onto the grid.
    pub fn new(shape: ShipShape) -> Result<Self, BoardError> {
        shape.validate()?;
        let mut ship = Ship {
            shape,
            pos: DEFAULT_POS,
            offsets: shape.offsets,
            hits: [false; MAX_SHIP_OFFSETS],
            status: ShipStatus::Idle,
        };
        ship.nudge_into_grid();
        Ok(ship)
    }

    pub fn shape(&self) -> &ShipShape {
        &self.shape
    }

    pub fn name(&self) -> &'static str {
        self.shape.name
    }

    pub fn pos(&self) -> GridPoint {
        self.pos
    }

    pub fn status(&self) -> ShipStatus {
        self.status
    }

    pub fn offsets(&self) -> &[GridPoint] {
        &self.offsets[..self.shape.len]
    }

    pub fn hit_flags(&self) -> &[bool] {
        &self.hits[..self.shape.len]
    }

    /// Absolute grid cells covered by the ship.
    pub fn cells(&self) -> impl Iterator<Item = GridPoint> + '_ {
        let pos = self.pos;
        self.offsets().iter().map(move |o| pos + *o)
    }

    pub fn occupies(&self, p: GridPoint) -> bool {
        self.cells().any(|c| c == p)
    }

    pub fn is_placed(&self) -> bool {
        self.status == ShipStatus::Placed
    }

    pub fn is_sunk(&self) -> bool {
        self.hit_flags().iter().all(|&h| h)
    }

    pub(crate) fn set_status(&mut self, status: ShipStatus) {
        self.status = status;
    }

    /// Rotate a quarter turn and pull the ship back onto the grid.
    /// Placed ships never rotate; returns whether anything changed.
    pub fn rotate(&mut self) -> bool {
        if self.is_placed() {
            return false;
        }
        let len = self.shape.len;
        for o in self.offsets[..len].iter_mut() {
            *o = o.rotated();
        }
        self.nudge_into_grid();
        true
    }

    /// Translate by one cell if every cell stays on the grid.
    pub fn try_move(&mut self, dir: Direction) -> bool {
        if self.is_placed() {
            return false;
        }
        let moved = self.pos + dir.vector();
        if self.offsets().iter().all(|o| (moved + *o).is_within_grid()) {
            self.pos = moved;
            true
        } else {
            false
        }
    }

    /// Mark every offset covering `p` as hit. Returns whether any matched.
    pub fn register_impact(&mut self, p: GridPoint) -> bool {
        let pos = self.pos;
        let len = self.shape.len;
        let mut matched = false;
        for (o, hit) in self.offsets[..len].iter().zip(self.hits[..len].iter_mut()) {
            if pos + *o == p {
                *hit = true;
                matched = true;
            }
        }
        matched
    }

    /// Restore the static shape, clear hits and return to the spawn position.
    pub fn reset(&mut self) {
        self.offsets = self.shape.offsets;
        self.hits = [false; MAX_SHIP_OFFSETS];
        self.status = ShipStatus::Idle;
        self.pos = DEFAULT_POS;
        self.nudge_into_grid();
    }

    fn nudge_into_grid(&mut self) {
        let (dx, dy) = nudge(self.pos, self.offsets());
        self.pos = GridPoint::new(self.pos.x + dx, self.pos.y + dy);
    }
}

/// Shift needed to bring every `pos + offset` inside the grid.
fn nudge(pos: GridPoint, offsets: &[GridPoint]) -> (i8, i8) {
    let mut dx = 0;
    let mut dy = 0;
    for o in offsets {
        let c = pos + *o;
        if c.x < 0 {
            dx = dx.max(-c.x);
        } else if c.x >= GRID_WIDTH as i8 {
            dx = dx.min(GRID_WIDTH as i8 - 1 - c.x);
        }
        if c.y < 0 {
            dy = dy.max(-c.y);
        } else if c.y >= GRID_HEIGHT as i8 {
            dy = dy.min(GRID_HEIGHT as i8 - 1 - c.y);
        }
    }
    (dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudge_pulls_left_edge_back() {
        let offsets = [GridPoint::new(-1, 0), GridPoint::new(0, 0)];
        assert_eq!(nudge(GridPoint::new(0, 3), &offsets), (1, 0));
    }

    #[test]
    fn nudge_pulls_bottom_right_corner_back() {
        let offsets = [GridPoint::new(1, 1), GridPoint::new(0, 0)];
        assert_eq!(nudge(GridPoint::new(4, 6), &offsets), (-1, -1));
    }

    #[test]
    fn nudge_is_zero_inside_grid() {
        let offsets = [GridPoint::new(1, 1), GridPoint::new(-1, -1)];
        assert_eq!(nudge(GridPoint::new(2, 3), &offsets), (0, 0));
    }
}
