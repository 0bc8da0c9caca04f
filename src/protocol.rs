//! Single-byte wire codes exchanged over the IR link.
//!
//! Grid coordinates occupy `0..GRID_CELLS`, control codes sit at `0x40` and
//! above, and player-one claims carry a six bit nonce in `0x80..=0xBF`.

use core::fmt;

use crate::common::GridPoint;
use crate::config::{GRID_CELLS, GRID_WIDTH};

/// Sentinel for "nothing received"; never meaningful on the wire.
pub const NO_MESSAGE: u8 = 0x40;
/// Acknowledges the most recent non-confirm byte.
pub const CONFIRM: u8 = 0x41;
pub const SEND_HIT: u8 = 0x42;
pub const SEND_MISS: u8 = 0x43;
/// Sent by the peer that just lost its last ship.
pub const SEND_GAME_OVER: u8 = 0x44;
/// Reserved sentinel, rejected on receive.
pub const MESSAGE_SENT: u8 = 0x45;
/// Base of the player-one claim range; the low six bits carry the nonce.
pub const REQUEST_PLAYER_ONE: u8 = 0x80;
pub const NONCE_MASK: u8 = 0x3F;

const CLAIM_MASK: u8 = !NONCE_MASK;

// Coordinate codes must never collide with control codes.
const _: () = assert!(GRID_CELLS <= NO_MESSAGE as usize);

/// Errors raised while decoding a received byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Byte outside every known code range.
    UnknownCode(u8),
    /// Coordinate-class byte that maps outside the grid.
    OffGridCode(u8),
    /// A point that cannot be encoded.
    OffGridPoint(GridPoint),
    /// `NO_MESSAGE` or `MESSAGE_SENT` seen on the wire.
    Sentinel(u8),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::UnknownCode(b) => write!(f, "Unknown message code {:#04x}", b),
            ProtocolError::OffGridCode(b) => {
                write!(f, "Coordinate code {:#04x} is outside the grid", b)
            }
            ProtocolError::OffGridPoint(p) => write!(f, "Point {} is outside the grid", p),
            ProtocolError::Sentinel(b) => write!(f, "Sentinel {:#04x} is not a message", b),
        }
    }
}

/// Encode a grid point as `y * GRID_WIDTH + x`.
pub fn encode_point(p: GridPoint) -> Result<u8, ProtocolError> {
    if !p.is_within_grid() {
        return Err(ProtocolError::OffGridPoint(p));
    }
    Ok(p.y as u8 * GRID_WIDTH + p.x as u8)
}

/// Inverse of [`encode_point`].
pub fn decode_point(code: u8) -> Result<GridPoint, ProtocolError> {
    if code as usize >= GRID_CELLS {
        return Err(ProtocolError::OffGridCode(code));
    }
    let x = code % GRID_WIDTH;
    let y = (code - x) / GRID_WIDTH;
    Ok(GridPoint::new(x as i8, y as i8))
}

/// A grid point known to be encodable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate(GridPoint);

impl Coordinate {
    pub fn new(p: GridPoint) -> Result<Self, ProtocolError> {
        if p.is_within_grid() {
            Ok(Coordinate(p))
        } else {
            Err(ProtocolError::OffGridPoint(p))
        }
    }

    pub fn point(self) -> GridPoint {
        self.0
    }

    fn code(self) -> u8 {
        self.0.y as u8 * GRID_WIDTH + self.0.x as u8
    }
}

/// Every message the game layer exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// A shot at the receiver's grid.
    Coordinate(Coordinate),
    Confirm,
    RequestPlayerOne { nonce: u8 },
    SendHit,
    SendMiss,
    SendGameOver,
}

impl Message {
    pub fn coordinate(p: GridPoint) -> Result<Self, ProtocolError> {
        Coordinate::new(p).map(Message::Coordinate)
    }

    /// A claim; the nonce is truncated to six bits.
    pub fn request_player_one(nonce: u8) -> Self {
        Message::RequestPlayerOne {
            nonce: nonce & NONCE_MASK,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Message::Coordinate(c) => c.code(),
            Message::Confirm => CONFIRM,
            Message::RequestPlayerOne { nonce } => REQUEST_PLAYER_ONE | (nonce & NONCE_MASK),
            Message::SendHit => SEND_HIT,
            Message::SendMiss => SEND_MISS,
            Message::SendGameOver => SEND_GAME_OVER,
        }
    }

    pub fn from_byte(byte: u8) -> Result<Self, ProtocolError> {
        match byte {
            b if (b as usize) < GRID_CELLS => Ok(Message::Coordinate(Coordinate(decode_point(b)?))),
            b if b < NO_MESSAGE => Err(ProtocolError::OffGridCode(b)),
            NO_MESSAGE | MESSAGE_SENT => Err(ProtocolError::Sentinel(byte)),
            CONFIRM => Ok(Message::Confirm),
            SEND_HIT => Ok(Message::SendHit),
            SEND_MISS => Ok(Message::SendMiss),
            SEND_GAME_OVER => Ok(Message::SendGameOver),
            b if b & CLAIM_MASK == REQUEST_PLAYER_ONE => Ok(Message::RequestPlayerOne {
                nonce: b & NONCE_MASK,
            }),
            b => Err(ProtocolError::UnknownCode(b)),
        }
    }

    /// The shot target, for coordinate-class messages.
    pub fn point(self) -> Option<GridPoint> {
        match self {
            Message::Coordinate(c) => Some(c.point()),
            _ => None,
        }
    }

    pub fn is_coordinate(self) -> bool {
        matches!(self, Message::Coordinate(_))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Coordinate(c) => write!(f, "Coordinate{}", c.point()),
            Message::Confirm => write!(f, "Confirm"),
            Message::RequestPlayerOne { nonce } => write!(f, "RequestPlayerOne(nonce={})", nonce),
            Message::SendHit => write!(f, "SendHit"),
            Message::SendMiss => write!(f, "SendMiss"),
            Message::SendGameOver => write!(f, "SendGameOver"),
        }
    }
}
