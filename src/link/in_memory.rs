#![cfg(feature = "std")]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use log::trace;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::link::Link;

/// Bytes a receiver can buffer before the sender sees "not ready".
const PIPE_CAPACITY: usize = 64;

/// Probabilistic damage applied to every byte written.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct FaultModel {
    /// Chance a byte silently disappears.
    pub loss_rate: f64,
    /// Chance a surviving byte has one bit flipped.
    pub corrupt_rate: f64,
}

impl FaultModel {
    pub fn lossless() -> Self {
        Self::default()
    }

    pub fn lossy(loss_rate: f64) -> Self {
        Self {
            loss_rate,
            corrupt_rate: 0.0,
        }
    }
}

struct Medium {
    queues: [VecDeque<u8>; 2],
    drop_next: [usize; 2],
    blackout: bool,
    faults: FaultModel,
    rng: SmallRng,
}

impl Medium {
    /// Apply the fault model to a byte written by `side`. `None` means lost.
    fn transmit(&mut self, side: usize, byte: u8) -> Option<u8> {
        if self.blackout {
            return None;
        }
        if self.drop_next[side] > 0 {
            self.drop_next[side] -= 1;
            return None;
        }
        if self.faults.loss_rate > 0.0 && self.rng.random_bool(self.faults.loss_rate.min(1.0)) {
            return None;
        }
        if self.faults.corrupt_rate > 0.0
            && self.rng.random_bool(self.faults.corrupt_rate.min(1.0))
        {
            let bit = self.rng.random_range(0..8u8);
            return Some(byte ^ (1 << bit));
        }
        Some(byte)
    }
}

/// One end of an in-memory IR link. Both ends share a medium that can drop
/// or corrupt bytes.
pub struct LoopbackLink {
    medium: Arc<Mutex<Medium>>,
    side: usize,
}

impl LoopbackLink {
    /// A lossless pair.
    pub fn pair() -> (Self, Self) {
        Self::pair_with(FaultModel::lossless(), 0)
    }

    /// A pair whose faults are drawn from a `SmallRng` seeded with `seed`.
    pub fn pair_with(faults: FaultModel, seed: u64) -> (Self, Self) {
        let medium = Arc::new(Mutex::new(Medium {
            queues: [VecDeque::new(), VecDeque::new()],
            drop_next: [0, 0],
            blackout: false,
            faults,
            rng: SmallRng::seed_from_u64(seed),
        }));
        (
            Self {
                medium: medium.clone(),
                side: 0,
            },
            Self { medium, side: 1 },
        )
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Medium>> {
        self.medium
            .lock()
            .map_err(|_| anyhow::anyhow!("Loopback medium lock poisoned"))
    }

    fn peer(&self) -> usize {
        1 - self.side
    }

    /// While on, every byte written in either direction is lost.
    pub fn set_blackout(&self, on: bool) {
        if let Ok(mut m) = self.lock() {
            m.blackout = on;
        }
    }

    /// Lose the next `count` bytes written by this end.
    pub fn drop_next(&self, count: usize) {
        if let Ok(mut m) = self.lock() {
            m.drop_next[self.side] += count;
        }
    }

    /// Bytes waiting to be read by this end.
    pub fn pending(&self) -> usize {
        self.lock().map(|m| m.queues[self.side].len()).unwrap_or(0)
    }
}

impl Link for LoopbackLink {
    fn is_write_ready(&mut self) -> bool {
        let peer = self.peer();
        self.lock()
            .map(|m| m.queues[peer].len() < PIPE_CAPACITY)
            .unwrap_or(false)
    }

    fn is_read_ready(&mut self) -> bool {
        self.pending() > 0
    }

    fn put_byte(&mut self, byte: u8) -> anyhow::Result<()> {
        let (side, peer) = (self.side, self.peer());
        let mut m = self.lock()?;
        match m.transmit(side, byte) {
            Some(b) => {
                trace!("loopback {} -> {}: {:#04x}", side, peer, b);
                m.queues[peer].push_back(b);
            }
            None => trace!("loopback {} -> {}: {:#04x} lost", side, peer, byte),
        }
        Ok(())
    }

    fn get_byte(&mut self) -> anyhow::Result<u8> {
        let side = self.side;
        self.lock()?.queues[side]
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No byte available on loopback link"))
    }
}
