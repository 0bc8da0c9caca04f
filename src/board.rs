//! Board model: the local fleet, placement rules, the targetter and shot records.

use core::fmt;

use crate::bitboard::BitBoard;
use crate::common::{BoardError, Direction, GridPoint, ShotOutcome};
use crate::config::{DEFAULT_POS, GRID_HEIGHT, GRID_WIDTH, MAX_SHIPS};
use crate::ship::{Ship, ShipShape, ShipStatus};

/// One bit per grid cell.
pub type GridMap = BitBoard<u64, { GRID_WIDTH as usize }, { GRID_HEIGHT as usize }>;

#[inline]
fn cell(p: GridPoint) -> (usize, usize) {
    (p.x as usize, p.y as usize)
}

pub struct Board {
    ships: [Option<Ship>; MAX_SHIPS],
    ship_count: usize,
    active: Option<usize>,
    targetter: GridPoint,
    shot_hits: GridMap,
    shot_misses: GridMap,
    impacts: GridMap,
}

impl Board {
    /// Build a board for `fleet`. The first ship becomes the one being placed.
    pub fn new(fleet: &[ShipShape]) -> Result<Self, BoardError> {
        if fleet.is_empty() {
            return Err(BoardError::EmptyFleet);
        }
        if fleet.len() > MAX_SHIPS {
            return Err(BoardError::TooManyShips { count: fleet.len() });
        }
        let mut ships = [None; MAX_SHIPS];
        for (slot, shape) in ships.iter_mut().zip(fleet) {
            *slot = Some(Ship::new(*shape)?);
        }
        let mut board = Board {
            ships,
            ship_count: fleet.len(),
            active: None,
            targetter: DEFAULT_POS,
            shot_hits: GridMap::new(),
            shot_misses: GridMap::new(),
            impacts: GridMap::new(),
        };
        board.activate_next();
        Ok(board)
    }

    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships[..self.ship_count].iter().flatten()
    }

    pub fn ship(&self, index: usize) -> Option<&Ship> {
        self.ships.get(index).and_then(|s| s.as_ref())
    }

    pub fn ship_count(&self) -> usize {
        self.ship_count
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The ship currently being placed, if any.
    pub fn active_ship(&self) -> Option<&Ship> {
        self.active.and_then(|i| self.ship(i))
    }

    fn active_ship_mut(&mut self) -> Option<&mut Ship> {
        let i = self.active?;
        self.ships.get_mut(i).and_then(|s| s.as_mut())
    }

    /// True iff no placed ship covers `p`. The ship being placed never counts.
    pub fn is_point_vacant(&self, p: GridPoint) -> bool {
        !self.ships().any(|s| s.is_placed() && s.occupies(p))
    }

    /// Check that every cell of `ship` is on the grid and vacant.
    pub fn check_placement(&self, ship: &Ship) -> Result<(), BoardError> {
        for c in ship.cells() {
            if !c.is_within_grid() {
                return Err(BoardError::OutOfBounds(c));
            }
            if !self.is_point_vacant(c) {
                return Err(BoardError::PlacementBlocked(c));
            }
        }
        Ok(())
    }

    /// Fix ship `index` where it stands. On failure nothing changes.
    pub fn place_ship(&mut self, index: usize) -> Result<(), BoardError> {
        let ship = *self.ship(index).ok_or(BoardError::InvalidIndex)?;
        if ship.is_placed() {
            return Err(BoardError::ShipAlreadyPlaced);
        }
        self.check_placement(&ship)?;
        if let Some(s) = self.ships[index].as_mut() {
            s.set_status(ShipStatus::Placed);
        }
        if self.active == Some(index) {
            self.activate_next();
        }
        Ok(())
    }

    /// Place the ship being placed and move on to the next one.
    pub fn place_active(&mut self) -> Result<(), BoardError> {
        let index = self.active.ok_or(BoardError::NoActiveShip)?;
        self.place_ship(index)
    }

    pub fn rotate_active(&mut self) -> bool {
        self.active_ship_mut().map(|s| s.rotate()).unwrap_or(false)
    }

    pub fn move_active(&mut self, dir: Direction) -> bool {
        self.active_ship_mut().map(|s| s.try_move(dir)).unwrap_or(false)
    }

    pub fn all_placed(&self) -> bool {
        self.ships().all(|s| s.is_placed())
    }

    fn activate_next(&mut self) {
        self.active = None;
        for (i, slot) in self.ships[..self.ship_count].iter_mut().enumerate() {
            if let Some(s) = slot {
                if s.status() == ShipStatus::Idle {
                    s.set_status(ShipStatus::BeingPlaced);
                    self.active = Some(i);
                    return;
                }
            }
        }
    }

    pub fn targetter(&self) -> GridPoint {
        self.targetter
    }

    /// Move the aiming cursor unless it would leave the grid.
    pub fn move_targetter(&mut self, dir: Direction) -> bool {
        let next = self.targetter + dir.vector();
        if next.is_within_grid() {
            self.targetter = next;
            true
        } else {
            false
        }
    }

    pub fn reset_targetter(&mut self) {
        self.targetter = DEFAULT_POS;
    }

    /// Apply an opponent's shot: marks every matching offset of every ship.
    pub fn check_ship_hit(&mut self, p: GridPoint) -> bool {
        if p.is_within_grid() {
            let (x, y) = cell(p);
            let _ = self.impacts.set(x, y);
        }
        let mut hit = false;
        for ship in self.ships[..self.ship_count].iter_mut().flatten() {
            hit |= ship.register_impact(p);
        }
        hit
    }

    /// True iff every offset of every ship is hit.
    pub fn check_game_loss(&self) -> bool {
        self.ships().all(|s| s.is_sunk())
    }

    /// Remember how our own shot at `p` was answered.
    pub fn record_shot(&mut self, p: GridPoint, outcome: ShotOutcome) -> Result<(), BoardError> {
        let (x, y) = cell(p);
        match outcome {
            ShotOutcome::Hit => self.shot_hits.set(x, y)?,
            ShotOutcome::Miss => self.shot_misses.set(x, y)?,
            ShotOutcome::TimedOut => {}
        }
        Ok(())
    }

    /// Whether we already have a hit or miss recorded at `p`.
    pub fn has_shot_at(&self, p: GridPoint) -> bool {
        let (x, y) = cell(p);
        (self.shot_hits | self.shot_misses).get(x, y).unwrap_or(false)
    }

    /// Cells covered by placed ships.
    pub fn occupancy(&self) -> GridMap {
        let mut map = GridMap::new();
        for c in self.ships().filter(|s| s.is_placed()).flat_map(|s| s.cells()) {
            if c.is_within_grid() {
                let (x, y) = cell(c);
                let _ = map.set(x, y);
            }
        }
        map
    }

    pub fn shot_hits(&self) -> GridMap {
        self.shot_hits
    }

    pub fn shot_misses(&self) -> GridMap {
        self.shot_misses
    }

    /// Cells the opponent has fired at.
    pub fn impacts(&self) -> GridMap {
        self.impacts
    }

    /// Start a new round with the same fleet.
    pub fn reset(&mut self) {
        for ship in self.ships[..self.ship_count].iter_mut().flatten() {
            ship.reset();
        }
        self.targetter = DEFAULT_POS;
        self.shot_hits.clear_all();
        self.shot_misses.clear_all();
        self.impacts.clear_all();
        self.activate_next();
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  occupancy: {:?},\n  impacts: {:?},\n  shot_hits: {:?},\n  shot_misses: {:?},\n  active: {:?},\n  targetter: {}\n}}",
            self.occupancy(),
            self.impacts,
            self.shot_hits,
            self.shot_misses,
            self.active,
            self.targetter
        )
    }
}
