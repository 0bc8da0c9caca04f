//! Commonly used types and utilities for ease of import.

pub use crate::{
    AutoPilot, Board, Direction, GameResult, GameSession, GridPoint, InputEvent, Link, LinkConfig,
    Mailbox, Message, Phase, Player, ReliableLink, Role, SessionConfig, ShotOutcome,
};

#[cfg(feature = "std")]
pub use crate::{FaultModel, LoopbackLink, PlayerNode, TcpLink, TextDisplay};
