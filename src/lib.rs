#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod bitboard;
mod board;
mod common;
mod config;
mod input;
pub mod link;
#[cfg(feature = "std")]
mod logging;
pub mod player;
pub mod prelude;
pub mod protocol;
mod reliable;
mod screen;
mod session;
mod ship;

pub use bitboard::{BitBoard, BitBoardError};
pub use board::*;
pub use common::*;
pub use config::*;
pub use input::InputEvent;
pub use link::Link;
#[cfg(feature = "std")]
pub use link::{in_memory::{FaultModel, LoopbackLink}, tcp::TcpLink};
#[cfg(feature = "serial")]
pub use link::serial::SerialLink;
#[cfg(feature = "std")]
pub use logging::{init_logging, init_logging_with_default, LOG_ENV};
pub use player::{AutoPilot, Player};
#[cfg(feature = "std")]
pub use player::{run_pair, KeyboardPlayer, PairOutcome, PlayerNode};
pub use protocol::{Coordinate, Message, ProtocolError};
pub use reliable::{LinkPhase, LinkStats, Mailbox, ReliableLink};
pub use screen::{render, Screen};
#[cfg(feature = "std")]
pub use screen::TextDisplay;
pub use session::{GameResult, GameSession, Phase, Role};
pub use ship::*;
