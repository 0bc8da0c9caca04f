#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::common::{Direction, GridPoint};
use crate::input::InputEvent;
use crate::session::{GameSession, Phase};

use super::Player;

/// Plays by itself: wanders ships into free spots and fires at unshot cells.
pub struct AutoPilot {
    rng: SmallRng,
    claims_first: bool,
    target: Option<GridPoint>,
}

impl AutoPilot {
    /// `claims_first` makes this player press the claim button while connecting.
    pub fn new(seed: u64, claims_first: bool) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            claims_first,
            target: None,
        }
    }

    fn placement_step(&mut self) -> InputEvent {
        match self.rng.random_range(0..10) {
            0..=2 => InputEvent::Button,
            3 => InputEvent::Push,
            _ => Direction::ALL[self.rng.random_range(0..Direction::ALL.len())].into(),
        }
    }

    fn pick_target(&mut self, board: &Board) -> GridPoint {
        let open: Vec<GridPoint> = GridPoint::all().filter(|p| !board.has_shot_at(*p)).collect();
        if open.is_empty() {
            let all: Vec<GridPoint> = GridPoint::all().collect();
            return all[self.rng.random_range(0..all.len())];
        }
        open[self.rng.random_range(0..open.len())]
    }

    fn aim_step(&mut self, board: &Board) -> InputEvent {
        let target = match self.target {
            Some(t) => t,
            None => {
                let t = self.pick_target(board);
                self.target = Some(t);
                t
            }
        };
        let at = board.targetter();
        if at.x < target.x {
            InputEvent::East
        } else if at.x > target.x {
            InputEvent::West
        } else if at.y < target.y {
            InputEvent::South
        } else if at.y > target.y {
            InputEvent::North
        } else {
            self.target = None;
            InputEvent::Push
        }
    }
}

impl Player for AutoPilot {
    fn inputs(&mut self, session: &GameSession) -> Vec<InputEvent> {
        let mut out = Vec::new();
        if !session.input_enabled() {
            // Dismiss the banner.
            out.push(InputEvent::Push);
            return out;
        }
        match session.phase() {
            Phase::Start => out.push(InputEvent::Push),
            Phase::Connecting => {
                if self.claims_first && !session.is_claiming() {
                    out.push(InputEvent::Button);
                }
            }
            Phase::PlacingShips => out.push(self.placement_step()),
            Phase::MyTurn => out.push(self.aim_step(session.board())),
            _ => {}
        }
        out
    }
}
