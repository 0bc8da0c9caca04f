//! Byte-level link primitives: half-duplex, one byte per slot, no framing.

/// A half-duplex byte channel polled once per tick.
pub trait Link {
    /// Whether a byte may be written now without blocking.
    fn is_write_ready(&mut self) -> bool;
    /// Whether a byte is waiting to be read.
    fn is_read_ready(&mut self) -> bool;
    fn put_byte(&mut self, byte: u8) -> anyhow::Result<()>;
    /// Read one byte. Only call after `is_read_ready` returned `true`.
    fn get_byte(&mut self) -> anyhow::Result<u8>;

    /// Time one byte occupies the wire, for links that drain at a fixed rate.
    fn byte_time(&self) -> Option<core::time::Duration> {
        None
    }
}

impl<L: Link + ?Sized> Link for alloc_box::Box<L> {
    fn is_write_ready(&mut self) -> bool {
        (**self).is_write_ready()
    }

    fn is_read_ready(&mut self) -> bool {
        (**self).is_read_ready()
    }

    fn put_byte(&mut self, byte: u8) -> anyhow::Result<()> {
        (**self).put_byte(byte)
    }

    fn get_byte(&mut self) -> anyhow::Result<u8> {
        (**self).get_byte()
    }

    fn byte_time(&self) -> Option<core::time::Duration> {
        (**self).byte_time()
    }
}

#[cfg(not(feature = "std"))]
use alloc::boxed as alloc_box;
#[cfg(feature = "std")]
use std::boxed as alloc_box;

#[cfg(feature = "std")]
pub mod in_memory;
#[cfg(feature = "serial")]
pub mod serial;
#[cfg(feature = "std")]
pub mod tcp;
