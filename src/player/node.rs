#![cfg(feature = "std")]

use std::boxed::Box;
use std::time::Duration;

use log::info;

use crate::link::Link;
use crate::reliable::{LinkStats, ReliableLink};
use crate::screen::{render, Screen};
use crate::session::{GameSession, Phase};

use super::Player;

/// One device: input, game, link and display ticked in that fixed order.
pub struct PlayerNode {
    player: Box<dyn Player>,
    session: GameSession,
    link: ReliableLink<Box<dyn Link + Send>>,
    screen: Option<Box<dyn Screen + Send>>,
    ticks: u64,
}

impl PlayerNode {
    /// The link runs with the session's link timing.
    pub fn new(player: Box<dyn Player>, session: GameSession, link: Box<dyn Link + Send>) -> Self {
        let link = ReliableLink::new(link, session.config().link);
        Self {
            player,
            session,
            link,
            screen: None,
            ticks: 0,
        }
    }

    pub fn with_screen(mut self, screen: Box<dyn Screen + Send>) -> Self {
        self.screen = Some(screen);
        self
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn link(&self) -> &ReliableLink<Box<dyn Link + Send>> {
        &self.link
    }

    pub fn link_stats(&self) -> LinkStats {
        self.link.stats()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one scheduler tick. Returns the new phase if the game moved on.
    pub fn tick(&mut self) -> Option<Phase> {
        let inputs = self.player.inputs(&self.session);
        let transition = self.session.tick(&inputs, &mut self.link);
        self.link.poll();
        if let Some(screen) = self.screen.as_mut() {
            render(&self.session, screen.as_mut());
        }
        self.ticks += 1;
        transition
    }

    /// Tick at `loop_rate` per second, forever or for `max_ticks`.
    pub async fn run(&mut self, max_ticks: Option<u64>) -> anyhow::Result<()> {
        let rate = self.session.config().link.loop_rate.max(1);
        let mut interval = tokio::time::interval(Duration::from_micros(1_000_000 / rate as u64));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            if max_ticks.is_some_and(|max| self.ticks >= max) {
                break;
            }
            interval.tick().await;
            self.tick();
        }
        info!("Stopped after {} ticks: {:?}", self.ticks, self.link.stats());
        Ok(())
    }
}

/// How a two-node run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PairOutcome {
    pub ticks: u64,
    /// Both nodes finished a round.
    pub finished: bool,
    /// Ticks on which both nodes were attacking at once.
    pub both_attacking_ticks: u64,
}

/// Tick `a` and `b` in lockstep until both have finished a round or
/// `max_ticks` elapse.
pub fn run_pair(a: &mut PlayerNode, b: &mut PlayerNode, max_ticks: u64) -> PairOutcome {
    let mut outcome = PairOutcome {
        ticks: 0,
        finished: false,
        both_attacking_ticks: 0,
    };
    while outcome.ticks < max_ticks {
        a.tick();
        b.tick();
        outcome.ticks += 1;
        if a.session().phase().is_attacking() && b.session().phase().is_attacking() {
            outcome.both_attacking_ticks += 1;
        }
        if a.session().rounds_played() > 0 && b.session().rounds_played() > 0 {
            outcome.finished = true;
            break;
        }
    }
    outcome
}
