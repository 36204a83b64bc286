//! Byte source abstraction — any non-blocking serial channel.
//!
//! Concrete implementations:
//! - UART0 on the device ([`SerialAdapter`](crate::adapters::serial::SerialAdapter))
//! - an in-memory queue (host simulation and tests)
//!
//! The framer is generic over `ByteSource`, so swapping the transport
//! needs no change to the protocol logic.

use std::collections::VecDeque;

/// Non-blocking, byte-at-a-time input channel.
pub trait ByteSource {
    /// Take the next available byte, or `None` if nothing is pending.
    /// Must never block.
    fn read_byte(&mut self) -> Option<u8>;
}

impl ByteSource for VecDeque<u8> {
    fn read_byte(&mut self) -> Option<u8> {
        self.pop_front()
    }
}
