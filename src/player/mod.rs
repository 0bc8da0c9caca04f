//! Input sources and the node that drives a session.
//!
//! - AutoPilot: seeded random placement and targeting
//! - KeyboardPlayer: `w/a/s/d/f/b` lines from stdin
//! - PlayerNode: Player + GameSession + ReliableLink + Screen, ticked together

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

use crate::input::InputEvent;
use crate::session::GameSession;

/// Something that presses buttons.
pub trait Player: Send {
    /// Input events for the coming tick, given what the session shows.
    fn inputs(&mut self, session: &GameSession) -> Vec<InputEvent>;
}

pub mod auto;
pub use auto::AutoPilot;

#[cfg(feature = "std")]
pub mod keyboard;
#[cfg(feature = "std")]
pub use keyboard::KeyboardPlayer;

#[cfg(feature = "std")]
pub mod node;
#[cfg(feature = "std")]
pub use node::{run_pair, PairOutcome, PlayerNode};
