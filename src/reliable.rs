//! Reliable message layer: confirmation, watchdog retransmission and a
//! bounded give-up over a lossy half-duplex [`Link`].
//!
//! `poll` runs exactly one I/O phase per tick, chosen in strict priority
//! order:
//!
//! 1. [`LinkPhase::Watchdog`]: an outbound message is unconfirmed. Count the
//!    tick and retransmit on expiry. Once more than `max_resends`
//!    retransmissions went unanswered, give up. Otherwise try to read the
//!    confirmation.
//! 2. [`LinkPhase::SendConfirm`]: a received message is unacknowledged. Send
//!    a burst of `CONFIRM` bytes.
//! 3. [`LinkPhase::Transmit`]: the send cadence elapsed and a message is
//!    queued. Send it and start waiting for its confirmation.
//! 4. [`LinkPhase::Listen`]: read one byte if available.

#[cfg(not(feature = "std"))]
use alloc::collections::VecDeque;
#[cfg(feature = "std")]
use std::collections::VecDeque;

use log::{debug, trace, warn};

use crate::config::LinkConfig;
use crate::link::Link;
use crate::protocol::{Message, CONFIRM};

/// Byte times a timed link may take to become writable.
#[cfg(feature = "std")]
const WRITE_WAIT_BYTES: u32 = 2;

/// What the game layer may do with the link. Retry bookkeeping stays behind
/// this boundary.
pub trait Mailbox {
    /// Queue `msg` for delivery. Never blocks.
    fn enqueue(&mut self, msg: Message);
    /// True iff `candidate` is the most recently enqueued message and its
    /// delivery has been resolved (confirmed, or given up on).
    fn last_message_confirmed_delivered(&self, candidate: Message) -> bool;
    /// The newest received application message not yet consumed.
    fn latest_unread_inbound(&self) -> Option<Message>;
    fn mark_consumed(&mut self);
}

/// The single I/O action a tick performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkPhase {
    Watchdog,
    SendConfirm,
    Transmit,
    Listen,
}

/// Diagnostics counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkStats {
    /// Fresh transmissions.
    pub sent: u32,
    /// Application messages received, duplicates included.
    pub received: u32,
    pub confirmed: u32,
    pub retransmissions: u32,
    pub give_ups: u32,
    pub confirm_bursts: u32,
    /// Bytes that did not decode to a message.
    pub garbled: u32,
    /// Bytes lost to a write error or a link that never became ready.
    pub failed_writes: u32,
    pub queue_overflows: u32,
}

#[derive(Debug, Default)]
struct LinkSession {
    pending: VecDeque<Message>,
    last_enqueued: Option<Message>,
    in_flight: Option<Message>,
    awaiting_confirm: bool,
    last_received: Option<Message>,
    has_unread: bool,
    confirm_owed: bool,
    send_tick: u32,
    watchdog_tick: u32,
    resend_attempts: u32,
}

fn next_phase(session: &LinkSession, config: &LinkConfig) -> LinkPhase {
    if session.awaiting_confirm {
        LinkPhase::Watchdog
    } else if session.confirm_owed {
        LinkPhase::SendConfirm
    } else if session.send_tick >= config.send_cadence() && !session.pending.is_empty() {
        LinkPhase::Transmit
    } else {
        LinkPhase::Listen
    }
}

/// Owns the link and every piece of delivery state.
pub struct ReliableLink<L: Link> {
    link: L,
    config: LinkConfig,
    session: LinkSession,
    stats: LinkStats,
}

impl<L: Link> ReliableLink<L> {
    pub fn new(link: L, config: LinkConfig) -> Self {
        Self {
            link,
            config,
            session: LinkSession::default(),
            stats: LinkStats::default(),
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn into_inner(self) -> L {
        self.link
    }

    /// Whether an outbound message is on the wire and unconfirmed.
    pub fn is_awaiting_confirm(&self) -> bool {
        self.session.awaiting_confirm
    }

    pub fn pending_len(&self) -> usize {
        self.session.pending.len()
    }

    pub fn resend_attempts(&self) -> u32 {
        self.session.resend_attempts
    }

    /// The phase the next `poll` will run.
    pub fn next_phase(&self) -> LinkPhase {
        next_phase(&self.session, &self.config)
    }

    /// Run one tick. Returns the phase that ran.
    pub fn poll(&mut self) -> LinkPhase {
        let phase = self.next_phase();
        match phase {
            LinkPhase::Watchdog => self.watchdog(),
            LinkPhase::SendConfirm => self.send_confirm(),
            LinkPhase::Transmit => self.transmit(),
            LinkPhase::Listen => self.listen(),
        }
        self.session.send_tick = self.session.send_tick.saturating_add(1);
        phase
    }

    fn watchdog(&mut self) {
        let s = &mut self.session;
        s.watchdog_tick += 1;
        if s.watchdog_tick > self.config.watchdog_ticks {
            s.watchdog_tick = 0;
            s.resend_attempts += 1;
            let attempts = s.resend_attempts;
            if let Some(msg) = s.in_flight {
                debug!("Retransmitting {} (attempt {})", msg, attempts);
                self.stats.retransmissions += 1;
                self.write_byte(msg.to_byte());
            }
            if attempts > self.config.max_resends {
                let s = &mut self.session;
                warn!(
                    "Giving up on {:?} after {} retransmissions",
                    s.in_flight, attempts
                );
                s.awaiting_confirm = false;
                s.resend_attempts = 0;
                s.send_tick = 0;
                self.stats.give_ups += 1;
            }
            return;
        }
        match self.read_message() {
            Some(Message::Confirm) => {
                trace!("Confirmed {:?}", self.session.in_flight);
                let s = &mut self.session;
                s.awaiting_confirm = false;
                s.resend_attempts = 0;
                s.watchdog_tick = 0;
                // Let the rest of the peer's confirm burst drain before the next send.
                s.send_tick = 0;
                self.stats.confirmed += 1;
            }
            Some(msg) => self.store_inbound(msg),
            None => {}
        }
    }

    fn send_confirm(&mut self) {
        for _ in 0..self.config.confirm_burst {
            self.write_byte(CONFIRM);
        }
        self.session.confirm_owed = false;
        self.stats.confirm_bursts += 1;
    }

    fn transmit(&mut self) {
        let Some(msg) = self.session.pending.pop_front() else {
            return;
        };
        trace!("Sending {}", msg);
        let s = &mut self.session;
        s.in_flight = Some(msg);
        s.awaiting_confirm = true;
        s.watchdog_tick = 0;
        s.resend_attempts = 0;
        s.send_tick = 0;
        self.stats.sent += 1;
        self.write_byte(msg.to_byte());
    }

    fn listen(&mut self) {
        match self.read_message() {
            Some(Message::Confirm) => trace!("Ignoring stray confirm"),
            Some(msg) => self.store_inbound(msg),
            None => {}
        }
    }

    fn store_inbound(&mut self, msg: Message) {
        trace!("Received {}", msg);
        let s = &mut self.session;
        s.last_received = Some(msg);
        s.has_unread = true;
        s.confirm_owed = true;
        self.stats.received += 1;
    }

    /// Read and decode at most one byte. Garbled bytes are dropped unacknowledged.
    fn read_message(&mut self) -> Option<Message> {
        if !self.link.is_read_ready() {
            return None;
        }
        let byte = match self.link.get_byte() {
            Ok(b) => b,
            Err(e) => {
                debug!("Link read failed: {}", e);
                return None;
            }
        };
        match Message::from_byte(byte) {
            Ok(msg) => Some(msg),
            Err(e) => {
                debug!("Dropping garbled byte: {}", e);
                self.stats.garbled += 1;
                None
            }
        }
    }

    /// Wait until the link can take a byte, then write it. A byte that cannot
    /// be written counts as lost on the wire.
    fn write_byte(&mut self, byte: u8) -> bool {
        if !self.wait_write_ready() {
            warn!("Link not ready, dropping {:#04x}", byte);
            self.stats.failed_writes += 1;
            return false;
        }
        match self.link.put_byte(byte) {
            Ok(()) => true,
            Err(e) => {
                warn!("Link write of {:#04x} failed: {}", byte, e);
                self.stats.failed_writes += 1;
                false
            }
        }
    }
}

impl<L: Link> ReliableLink<L> {
    /// Links that know how long a byte occupies the wire are given
    /// `WRITE_WAIT_BYTES` byte times to drain; others get `write_spin_limit`
    /// polls.
    fn wait_write_ready(&mut self) -> bool {
        #[cfg(feature = "std")]
        if let Some(byte_time) = self.link.byte_time() {
            let deadline = std::time::Instant::now() + byte_time * WRITE_WAIT_BYTES;
            while !self.link.is_write_ready() {
                if std::time::Instant::now() >= deadline {
                    return false;
                }
                core::hint::spin_loop();
            }
            return true;
        }

        let mut spins = 0;
        while !self.link.is_write_ready() {
            if spins >= self.config.write_spin_limit {
                return false;
            }
            spins += 1;
            core::hint::spin_loop();
        }
        true
    }
}

impl<L: Link> Mailbox for ReliableLink<L> {
    fn enqueue(&mut self, msg: Message) {
        let s = &mut self.session;
        if s.pending.len() >= self.config.queue_capacity.max(1) {
            if let Some(dropped) = s.pending.pop_front() {
                warn!("Outbound queue full, dropping {}", dropped);
                self.stats.queue_overflows += 1;
            }
        }
        debug!("Queued {}", msg);
        s.pending.push_back(msg);
        s.last_enqueued = Some(msg);
    }

    fn last_message_confirmed_delivered(&self, candidate: Message) -> bool {
        let s = &self.session;
        s.last_enqueued == Some(candidate)
            && s.pending.is_empty()
            && !s.awaiting_confirm
            && s.in_flight == Some(candidate)
    }

    fn latest_unread_inbound(&self) -> Option<Message> {
        if self.session.has_unread {
            self.session.last_received
        } else {
            None
        }
    }

    fn mark_consumed(&mut self) {
        self.session.has_unread = false;
    }
}
