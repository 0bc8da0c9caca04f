#![cfg(feature = "std")]

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use log::{debug, info};

use crate::input::InputEvent;
use crate::session::GameSession;

use super::Player;

/// Reads lines from stdin on a background thread; every recognised key in a
/// line becomes one input event on the next tick.
pub struct KeyboardPlayer {
    events: Receiver<InputEvent>,
}

impl KeyboardPlayer {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                for key in line.chars() {
                    match InputEvent::from_key(key) {
                        Some(event) => {
                            if tx.send(event).is_err() {
                                return;
                            }
                        }
                        None if key.is_whitespace() => {}
                        None => debug!("Ignoring key {:?}", key),
                    }
                }
            }
            info!("Keyboard input closed");
        });
        Self { events: rx }
    }
}

impl Player for KeyboardPlayer {
    fn inputs(&mut self, _session: &GameSession) -> Vec<InputEvent> {
        self.events.try_iter().collect()
    }
}
