//! Turn protocol: the game state machine both peers run in lockstep.
//!
//! Each peer drives one [`GameSession`] per tick with the local input events
//! and a [`Mailbox`]. The session only enqueues messages and reads the newest
//! unread one; delivery is the mailbox's business.

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::common::{BoardError, GridPoint, ShotOutcome};
use crate::config::{SessionConfig, DEFAULT_FLEET};
use crate::input::InputEvent;
use crate::protocol::{Message, NONCE_MASK};
use crate::reliable::Mailbox;
use crate::ship::ShipShape;

const NO_INPUT: &[InputEvent] = &[];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Start,
    Connecting,
    PlacingShips,
    MyTurn,
    AwaitingResult,
    OpponentTurn,
    AwaitingSendConfirm,
    GameOver,
}

impl Phase {
    /// Our move: aiming, or waiting to hear what our shot did.
    pub fn is_attacking(self) -> bool {
        matches!(self, Phase::MyTurn | Phase::AwaitingResult)
    }

    /// Their move: waiting for a shot, or for our answer to be confirmed.
    pub fn is_defending(self) -> bool {
        matches!(self, Phase::OpponentTurn | Phase::AwaitingSendConfirm)
    }

    fn banner(self) -> &'static str {
        match self {
            Phase::Start => "BATTLESHIPS",
            Phase::Connecting => "Push to connect",
            Phase::PlacingShips => "Place ships",
            Phase::MyTurn => "Your turn",
            Phase::AwaitingResult => "Waiting for hit..",
            Phase::OpponentTurn => "Opponent's turn",
            Phase::AwaitingSendConfirm => "Waiting for confirm..",
            Phase::GameOver => "Game over",
        }
    }

    /// Phases whose banner blocks input until dismissed or timed out.
    fn gates_input(self) -> bool {
        matches!(self, Phase::PlacingShips | Phase::MyTurn)
    }

    /// Phases whose banner gives way to the board after a while.
    fn banner_expires(self) -> bool {
        matches!(
            self,
            Phase::PlacingShips | Phase::MyTurn | Phase::OpponentTurn | Phase::GameOver
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    PlayerOne,
    PlayerTwo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameResult {
    Won,
    Lost,
}

/// A shot we answered. The shooter's link retransmits it until our confirm
/// gets through and acknowledges nothing meanwhile, so copies can arrive
/// until `closer`, the last message we queued, is confirmed.
#[derive(Debug, Clone, Copy)]
struct AnsweredShot {
    shot: Message,
    closer: Message,
}

/// One peer's view of the game.
pub struct GameSession {
    config: SessionConfig,
    phase: Phase,
    role: Option<Role>,
    board: Board,
    rng: SmallRng,
    nonce: u8,
    claiming: bool,
    /// Peer nonce that collided with ours; retransmissions of it are ignored.
    collided_nonce: Option<u8>,
    state_tick: u32,
    banner: Option<&'static str>,
    shot_target: Option<GridPoint>,
    last_shot: Option<(GridPoint, ShotOutcome)>,
    reply: Option<Message>,
    answered: Option<AnsweredShot>,
    result: Option<GameResult>,
    rounds_played: u32,
}

impl GameSession {
    /// A session for `fleet`. `seed` drives the player-one nonce.
    pub fn new(config: SessionConfig, fleet: &[ShipShape], seed: u64) -> Result<Self, BoardError> {
        Ok(Self {
            config,
            phase: Phase::Start,
            role: None,
            board: Board::new(fleet)?,
            rng: SmallRng::seed_from_u64(seed),
            nonce: 0,
            claiming: false,
            collided_nonce: None,
            state_tick: 0,
            banner: Some(Phase::Start.banner()),
            shot_target: None,
            last_shot: None,
            reply: None,
            answered: None,
            result: None,
            rounds_played: 0,
        })
    }

    pub fn with_default_fleet(config: SessionConfig, seed: u64) -> Result<Self, BoardError> {
        Self::new(config, &DEFAULT_FLEET, seed)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Nonce carried by our player-one claim.
    pub fn nonce(&self) -> u8 {
        self.nonce
    }

    pub fn is_claiming(&self) -> bool {
        self.claiming
    }

    /// Ticks spent in the current phase.
    pub fn state_tick(&self) -> u32 {
        self.state_tick
    }

    /// Text currently shown instead of the board, if any.
    pub fn banner(&self) -> Option<&'static str> {
        self.banner
    }

    pub fn input_enabled(&self) -> bool {
        !(self.phase.gates_input() && self.banner.is_some())
    }

    pub fn last_shot(&self) -> Option<(GridPoint, ShotOutcome)> {
        self.last_shot
    }

    /// Outcome of the most recently finished round.
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Advance one tick. Returns the new phase when a transition happened.
    pub fn tick<M: Mailbox>(&mut self, inputs: &[InputEvent], mailbox: &mut M) -> Option<Phase> {
        self.state_tick = self.state_tick.saturating_add(1);
        let inputs = self.gate_inputs(inputs);

        let next = match self.phase {
            Phase::Start => self.on_start(inputs),
            Phase::Connecting => self.on_connecting(inputs, mailbox),
            Phase::PlacingShips => self.on_placing(inputs, mailbox),
            Phase::MyTurn => self.on_my_turn(inputs, mailbox),
            Phase::AwaitingResult => self.on_awaiting_result(mailbox),
            Phase::OpponentTurn => self.on_opponent_turn(mailbox),
            Phase::AwaitingSendConfirm => self.on_awaiting_send_confirm(mailbox),
            Phase::GameOver => self.on_game_over(mailbox),
        };

        if let Some(phase) = next {
            self.enter(phase);
        }
        next
    }

    /// Drop input hidden behind a banner. A push dismisses the banner and is
    /// swallowed with the rest of the tick's input.
    fn gate_inputs<'a>(&mut self, inputs: &'a [InputEvent]) -> &'a [InputEvent] {
        if self.banner.is_none() || !self.phase.banner_expires() {
            return inputs;
        }
        if inputs.contains(&InputEvent::Push) {
            self.banner = None;
            return if self.phase.gates_input() { NO_INPUT } else { inputs };
        }
        if self.state_tick > self.config.banner_ticks {
            self.banner = None;
            return inputs;
        }
        if self.phase.gates_input() {
            NO_INPUT
        } else {
            inputs
        }
    }

    fn enter(&mut self, phase: Phase) {
        info!("{:?} -> {:?}", self.phase, phase);
        match phase {
            Phase::Connecting => {
                self.nonce = self.draw_nonce(None);
                self.claiming = false;
                self.collided_nonce = None;
            }
            Phase::PlacingShips if self.phase == Phase::GameOver => {
                self.board.reset();
                self.shot_target = None;
                self.last_shot = None;
                self.reply = None;
            }
            Phase::MyTurn => {
                self.board.reset_targetter();
                self.answered = None;
            }
            _ => {}
        }
        self.phase = phase;
        self.state_tick = 0;
        self.banner = Some(match (phase, self.result) {
            (Phase::GameOver, Some(GameResult::Won)) => "You win",
            (Phase::GameOver, Some(GameResult::Lost)) => "You lose",
            _ => phase.banner(),
        });
    }

    fn draw_nonce(&mut self, avoid: Option<u8>) -> u8 {
        loop {
            let nonce = self.rng.random_range(0..=NONCE_MASK);
            if Some(nonce) != avoid {
                return nonce;
            }
        }
    }

    /// Whether `msg` is another copy of the shot we last answered.
    fn is_stale_shot<M: Mailbox>(&mut self, msg: Message, mailbox: &M) -> bool {
        let Some(answered) = self.answered else {
            return false;
        };
        if mailbox.last_message_confirmed_delivered(answered.closer) {
            self.answered = None;
            return false;
        }
        msg == answered.shot
    }

    /// Our link acknowledges every claim, including one that arrived while
    /// our own claim was still queued. The peer then took player one on that
    /// acknowledgement, so a lower claim reaching us afterwards means we both
    /// hold it. The lower nonce keeps it while nobody has fired yet.
    fn yields_to_claim(&mut self, msg: Message) -> bool {
        let Message::RequestPlayerOne { nonce: theirs } = msg else {
            return false;
        };
        let unopened =
            self.rounds_played == 0 && self.last_shot.is_none() && self.shot_target.is_none();
        if self.role == Some(Role::PlayerOne) && unopened && theirs < self.nonce {
            info!("Peer also holds player one with nonce {} < {}, stepping down", theirs, self.nonce);
            self.role = Some(Role::PlayerTwo);
            return true;
        }
        false
    }

    fn finish(&mut self, result: GameResult) -> Option<Phase> {
        self.result = Some(result);
        self.rounds_played += 1;
        Some(Phase::GameOver)
    }

    fn on_start(&mut self, inputs: &[InputEvent]) -> Option<Phase> {
        inputs
            .contains(&InputEvent::Push)
            .then_some(Phase::Connecting)
    }

    fn on_connecting<M: Mailbox>(&mut self, inputs: &[InputEvent], mailbox: &mut M) -> Option<Phase> {
        // A foreign claim is looked at before our own button so a press in
        // the same tick cannot override a claim we already received.
        if let Some(msg) = mailbox.latest_unread_inbound() {
            mailbox.mark_consumed();
            if let Message::RequestPlayerOne { nonce: theirs } = msg {
                if Some(theirs) == self.collided_nonce {
                    debug!("Ignoring repeat of collided claim {}", theirs);
                } else if !self.claiming || theirs < self.nonce {
                    info!("Peer claimed player one (nonce {} vs {})", theirs, self.nonce);
                    self.role = Some(Role::PlayerTwo);
                    return Some(Phase::PlacingShips);
                } else if theirs == self.nonce {
                    self.collided_nonce = Some(theirs);
                    self.nonce = self.draw_nonce(Some(theirs));
                    info!("Claim nonce collision on {}, retrying with {}", theirs, self.nonce);
                    mailbox.enqueue(Message::request_player_one(self.nonce));
                } else {
                    debug!("Keeping claim {} over peer claim {}", self.nonce, theirs);
                }
            }
        }

        if self.claiming
            && mailbox.last_message_confirmed_delivered(Message::request_player_one(self.nonce))
        {
            self.role = Some(Role::PlayerOne);
            return Some(Phase::PlacingShips);
        }

        if !self.claiming && inputs.contains(&InputEvent::Button) {
            self.claiming = true;
            mailbox.enqueue(Message::request_player_one(self.nonce));
        }
        None
    }

    fn on_placing<M: Mailbox>(&mut self, inputs: &[InputEvent], mailbox: &mut M) -> Option<Phase> {
        for event in inputs {
            match event {
                InputEvent::Button => {
                    if let Err(e) = self.board.place_active() {
                        debug!("Placement rejected: {}", e);
                    }
                }
                InputEvent::Push => {
                    self.board.rotate_active();
                }
                other => {
                    if let Some(dir) = other.direction() {
                        self.board.move_active(dir);
                    }
                }
            }
        }

        // An early shot from a faster opponent stays unread for OpponentTurn.
        if let Some(msg) = mailbox.latest_unread_inbound() {
            if !msg.is_coordinate() {
                mailbox.mark_consumed();
                self.yields_to_claim(msg);
            } else if self.is_stale_shot(msg, mailbox) {
                debug!("Dropping repeat of answered {}", msg);
                mailbox.mark_consumed();
            }
        }

        if !self.board.all_placed() {
            return None;
        }
        match self.role {
            Some(Role::PlayerOne) => Some(Phase::MyTurn),
            _ => Some(Phase::OpponentTurn),
        }
    }

    fn on_my_turn<M: Mailbox>(&mut self, inputs: &[InputEvent], mailbox: &mut M) -> Option<Phase> {
        if let Some(msg) = mailbox.latest_unread_inbound() {
            mailbox.mark_consumed();
            if msg == Message::SendGameOver {
                return self.finish(GameResult::Won);
            }
            if self.yields_to_claim(msg) {
                return Some(Phase::OpponentTurn);
            }
            debug!("Discarding stale {} during our turn", msg);
        }

        for event in inputs {
            if let Some(dir) = event.direction() {
                self.board.move_targetter(dir);
            } else if *event == InputEvent::Push {
                let target = self.board.targetter();
                match Message::coordinate(target) {
                    Ok(msg) => {
                        info!("Firing at {}", target);
                        mailbox.enqueue(msg);
                        self.shot_target = Some(target);
                        return Some(Phase::AwaitingResult);
                    }
                    Err(e) => warn!("Cannot fire: {}", e),
                }
            }
        }
        None
    }

    fn on_awaiting_result<M: Mailbox>(&mut self, mailbox: &mut M) -> Option<Phase> {
        if let Some(msg) = mailbox.latest_unread_inbound() {
            mailbox.mark_consumed();
            match msg {
                Message::SendHit => return self.resolve_shot(ShotOutcome::Hit),
                Message::SendMiss => return self.resolve_shot(ShotOutcome::Miss),
                Message::SendGameOver => {
                    // Their last ship went down with this shot.
                    self.resolve_shot(ShotOutcome::Hit);
                    return self.finish(GameResult::Won);
                }
                other => debug!("Discarding stale {} while awaiting result", other),
            }
        }
        if self.state_tick > self.config.result_timeout_ticks {
            warn!("No result after {} ticks, counting as a miss", self.state_tick);
            return self.resolve_shot(ShotOutcome::TimedOut);
        }
        None
    }

    fn resolve_shot(&mut self, outcome: ShotOutcome) -> Option<Phase> {
        if let Some(target) = self.shot_target.take() {
            info!("Shot at {}: {:?}", target, outcome);
            if let Err(e) = self.board.record_shot(target, outcome) {
                warn!("Could not record shot: {}", e);
            }
            self.last_shot = Some((target, outcome));
        }
        Some(Phase::OpponentTurn)
    }

    fn on_opponent_turn<M: Mailbox>(&mut self, mailbox: &mut M) -> Option<Phase> {
        let msg = mailbox.latest_unread_inbound()?;
        mailbox.mark_consumed();
        if self.is_stale_shot(msg, mailbox) {
            debug!("Dropping repeat of answered {}", msg);
            return None;
        }
        match msg {
            Message::Coordinate(c) => {
                let impact = c.point();
                let hit = self.board.check_ship_hit(impact);
                info!("Incoming shot at {}: {}", impact, if hit { "hit" } else { "miss" });
                let reply = if hit { Message::SendHit } else { Message::SendMiss };
                mailbox.enqueue(reply);
                self.reply = Some(reply);
                self.answered = Some(AnsweredShot {
                    shot: msg,
                    closer: reply,
                });
                Some(Phase::AwaitingSendConfirm)
            }
            Message::SendGameOver => self.finish(GameResult::Won),
            other => {
                debug!("Discarding {} while waiting for a shot", other);
                None
            }
        }
    }

    fn on_awaiting_send_confirm<M: Mailbox>(&mut self, mailbox: &mut M) -> Option<Phase> {
        if self.board.check_game_loss() {
            mailbox.enqueue(Message::SendGameOver);
            if let Some(answered) = self.answered.as_mut() {
                answered.closer = Message::SendGameOver;
            }
            return self.finish(GameResult::Lost);
        }
        if let Some(msg) = mailbox.latest_unread_inbound() {
            mailbox.mark_consumed();
            if msg == Message::SendGameOver {
                return self.finish(GameResult::Won);
            }
            debug!("Discarding stale {} while awaiting confirm", msg);
        }
        match self.reply {
            Some(reply) if mailbox.last_message_confirmed_delivered(reply) => Some(Phase::MyTurn),
            Some(_) => None,
            None => Some(Phase::MyTurn),
        }
    }

    fn on_game_over<M: Mailbox>(&mut self, mailbox: &mut M) -> Option<Phase> {
        if let Some(msg) = mailbox.latest_unread_inbound() {
            if !msg.is_coordinate() || self.is_stale_shot(msg, mailbox) {
                mailbox.mark_consumed();
            }
        }
        (self.state_tick > self.config.banner_ticks).then_some(Phase::PlacingShips)
    }
}
