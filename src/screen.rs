//! Presentation: the LED matrix interface and how a session is drawn on it.

use crate::common::GridPoint;
use crate::session::{GameSession, Phase};
use crate::ship::ShipStatus;

/// A 5×7 dot matrix that can also scroll a line of text.
pub trait Screen {
    fn clear(&mut self);
    fn draw_point(&mut self, p: GridPoint, on: bool);
    fn draw_text(&mut self, text: &str);
    fn refresh(&mut self);
}

/// Draw one frame of `session`.
pub fn render<S: Screen + ?Sized>(session: &GameSession, screen: &mut S) {
    screen.clear();
    if let Some(text) = session.banner() {
        screen.draw_text(text);
        screen.refresh();
        return;
    }
    let board = session.board();
    match session.phase() {
        Phase::PlacingShips | Phase::OpponentTurn | Phase::AwaitingSendConfirm => {
            for ship in board.ships() {
                if ship.status() == ShipStatus::Idle {
                    continue;
                }
                for (cell, hit) in ship.cells().zip(ship.hit_flags().iter()) {
                    if cell.is_within_grid() {
                        screen.draw_point(cell, !*hit);
                    }
                }
            }
        }
        Phase::MyTurn => {
            for (x, y) in board.shot_hits().iter_set_bits() {
                screen.draw_point(GridPoint::new(x as i8, y as i8), true);
            }
            screen.draw_point(board.targetter(), true);
        }
        _ => {}
    }
    screen.refresh();
}

#[cfg(feature = "std")]
pub use text::TextDisplay;

#[cfg(feature = "std")]
mod text {
    use std::string::String;

    use super::Screen;
    use crate::common::GridPoint;
    use crate::config::{GRID_HEIGHT, GRID_WIDTH};

    const W: usize = GRID_WIDTH as usize;
    const H: usize = GRID_HEIGHT as usize;

    /// Renders the matrix as `#`/`.` rows, with any text on the first line.
    #[derive(Debug, Default)]
    pub struct TextDisplay {
        cells: [[bool; W]; H],
        text: Option<String>,
        frame: String,
        echo: bool,
        refreshes: u64,
    }

    impl TextDisplay {
        pub fn new() -> Self {
            Self::default()
        }

        /// Print every frame that differs from the previous one to stdout.
        pub fn echoing() -> Self {
            Self {
                echo: true,
                ..Self::default()
            }
        }

        /// The last refreshed frame.
        pub fn frame(&self) -> &str {
            &self.frame
        }

        pub fn is_lit(&self, p: GridPoint) -> bool {
            p.is_within_grid() && self.cells[p.y as usize][p.x as usize]
        }

        pub fn refreshes(&self) -> u64 {
            self.refreshes
        }

        fn compose(&self) -> String {
            let mut out = String::new();
            if let Some(text) = &self.text {
                out.push_str(text);
                out.push('\n');
                return out;
            }
            for row in &self.cells {
                for &on in row {
                    out.push(if on { '#' } else { '.' });
                }
                out.push('\n');
            }
            out
        }
    }

    impl Screen for TextDisplay {
        fn clear(&mut self) {
            self.cells = [[false; W]; H];
            self.text = None;
        }

        fn draw_point(&mut self, p: GridPoint, on: bool) {
            if p.is_within_grid() {
                self.cells[p.y as usize][p.x as usize] = on;
            }
        }

        fn draw_text(&mut self, text: &str) {
            self.text = Some(String::from(text));
        }

        fn refresh(&mut self) {
            let frame = self.compose();
            self.refreshes += 1;
            if frame != self.frame {
                if self.echo {
                    println!("{}", frame);
                }
                self.frame = frame;
            }
        }
    }
}
