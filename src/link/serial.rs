#![cfg(feature = "serial")]

//! IR transceiver attached as a UART.

use std::io::{Read, Write};
use std::time::Duration;

use log::{debug, info};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::link::Link;

/// IR dongles commonly run at 2400 baud.
pub const DEFAULT_BAUD: u32 = 2400;

/// Start bit, eight data bits and a stop bit.
const BITS_PER_FRAME: u64 = 10;

pub struct SerialLink {
    port: Box<dyn SerialPort>,
    byte_time: Duration,
}

impl SerialLink {
    /// Open `path` as 8N1 without flow control.
    pub fn open(path: &str, baud_rate: u32) -> anyhow::Result<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(1))
            .open()
            .map_err(|e| anyhow::anyhow!("Failed to open serial port {}: {}", path, e))?;
        info!("Opened serial port: {} at {} baud", path, baud_rate);
        Ok(SerialLink {
            port,
            byte_time: frame_time(baud_rate),
        })
    }
}

fn frame_time(baud_rate: u32) -> Duration {
    Duration::from_micros(BITS_PER_FRAME * 1_000_000 / u64::from(baud_rate.max(1)))
}

impl Link for SerialLink {
    fn is_write_ready(&mut self) -> bool {
        // One byte in flight at a time.
        match self.port.bytes_to_write() {
            Ok(n) => n == 0,
            Err(e) => {
                debug!("serial bytes_to_write failed: {}", e);
                false
            }
        }
    }

    fn is_read_ready(&mut self) -> bool {
        self.port.bytes_to_read().map(|n| n > 0).unwrap_or(false)
    }

    fn put_byte(&mut self, byte: u8) -> anyhow::Result<()> {
        self.port
            .write_all(&[byte])
            .map_err(|e| anyhow::anyhow!("Serial write error: {}", e))
    }

    fn get_byte(&mut self) -> anyhow::Result<u8> {
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(1) => Ok(buf[0]),
            Ok(_) => Err(anyhow::anyhow!("Serial port returned no data")),
            Err(e) => Err(anyhow::anyhow!("Serial read error: {}", e)),
        }
    }

    fn byte_time(&self) -> Option<Duration> {
        Some(self.byte_time)
    }
}
