//! Grid bounds, the reference fleet and runtime timing parameters.

use crate::common::GridPoint;
use crate::ship::ShipShape;

/// Columns on the LED matrix (`x` in `0..GRID_WIDTH`).
pub const GRID_WIDTH: u8 = 5;
/// Rows on the LED matrix (`y` in `0..GRID_HEIGHT`).
pub const GRID_HEIGHT: u8 = 7;
/// Number of cells, which is also the size of the coordinate code range.
pub const GRID_CELLS: usize = GRID_WIDTH as usize * GRID_HEIGHT as usize;

pub const MAX_SHIP_OFFSETS: usize = 5;
pub const MAX_SHIPS: usize = 10;

/// Where new ships spawn and where the targetter starts each turn.
pub const DEFAULT_POS: GridPoint = GridPoint::new(2, 3);

pub const L_SHIP: ShipShape = ShipShape::new("L", &[(1, 1), (1, 0), (0, 0)]);
pub const I_SHIP: ShipShape = ShipShape::new("I", &[(-1, 0), (0, 0), (1, 0)]);
pub const SHORT_SHIP: ShipShape = ShipShape::new("Short", &[(-1, 0), (0, 0)]);
pub const DOT_SHIP: ShipShape = ShipShape::new("Dot", &[(0, 0)]);

pub const DEFAULT_FLEET: [ShipShape; 4] = [L_SHIP, I_SHIP, SHORT_SHIP, DOT_SHIP];

/// Timing of the reliable message layer, in scheduler ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(default))]
pub struct LinkConfig {
    /// Scheduler ticks per second.
    pub loop_rate: u32,
    /// Fresh transmissions per second; the send cadence is `loop_rate / send_rate` ticks.
    pub send_rate: u32,
    /// Ticks without a confirmation before the outbound message is retransmitted.
    pub watchdog_ticks: u32,
    /// Retransmissions allowed to go unanswered. The expiry that exceeds
    /// this count still retransmits, then resolves delivery locally.
    pub max_resends: u32,
    /// Number of `CONFIRM` bytes sent per acknowledgement.
    pub confirm_burst: u8,
    /// Bound of the outbound FIFO.
    pub queue_capacity: usize,
    /// Busy-wait bound while a link without a known byte time reports "not
    /// ready to send".
    pub write_spin_limit: u32,
}

impl LinkConfig {
    /// Minimum ticks between two fresh transmissions.
    pub fn send_cadence(&self) -> u32 {
        (self.loop_rate / self.send_rate.max(1)).max(1)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            loop_rate: 300,
            send_rate: 20,
            watchdog_ticks: 60,
            max_resends: 5,
            confirm_burst: 3,
            queue_capacity: 10,
            write_spin_limit: 1000,
        }
    }
}

/// Timing of the turn protocol plus the link it drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(default))]
pub struct SessionConfig {
    /// Ticks spent in `AwaitingResult` before the shot counts as a miss.
    pub result_timeout_ticks: u32,
    /// Ticks a phase banner is shown before input is accepted.
    pub banner_ticks: u32,
    pub link: LinkConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            result_timeout_ticks: 10_000,
            banner_ticks: 600,
            link: LinkConfig::default(),
        }
    }
}

#[cfg(feature = "std")]
impl SessionConfig {
    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let config = serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }
}
