//! Discrete input events from the navigation switch and the button.

use crate::common::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum InputEvent {
    North,
    South,
    East,
    West,
    /// Navigation switch pressed: start, rotate, fire or dismiss a banner.
    Push,
    /// Auxiliary button: claim player one or place the current ship.
    Button,
}

impl InputEvent {
    pub fn direction(self) -> Option<Direction> {
        match self {
            InputEvent::North => Some(Direction::North),
            InputEvent::South => Some(Direction::South),
            InputEvent::East => Some(Direction::East),
            InputEvent::West => Some(Direction::West),
            InputEvent::Push | InputEvent::Button => None,
        }
    }

    /// Keyboard mapping: `w`/`a`/`s`/`d` move, `f` pushes, `b` presses the button.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(InputEvent::North),
            's' => Some(InputEvent::South),
            'a' => Some(InputEvent::West),
            'd' => Some(InputEvent::East),
            'f' => Some(InputEvent::Push),
            'b' => Some(InputEvent::Button),
            _ => None,
        }
    }
}

impl From<Direction> for InputEvent {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::North => InputEvent::North,
            Direction::South => InputEvent::South,
            Direction::East => InputEvent::East,
            Direction::West => InputEvent::West,
        }
    }
}
