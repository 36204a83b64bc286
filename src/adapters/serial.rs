//! Command serial adapter.
//!
//! Implements [`ByteSource`] for the framer.
//!
//! - **`feature = "espidf"`** — wraps an `esp_idf_svc::hal` `UartDriver` and
//!   reads one byte per call with a zero timeout, so the control loop never
//!   blocks on the link.
//! - **host** — an in-memory receive queue fed through
//!   [`SerialAdapter::inject`], used for simulation and tests.

use crate::protocol::transport::ByteSource;

#[cfg(feature = "espidf")]
use esp_idf_svc::hal::{delay::NON_BLOCK, uart::UartDriver};

#[cfg(not(feature = "espidf"))]
use std::collections::VecDeque;

pub struct SerialAdapter {
    #[cfg(feature = "espidf")]
    uart: UartDriver<'static>,
    #[cfg(not(feature = "espidf"))]
    rx: VecDeque<u8>,
}

#[cfg(feature = "espidf")]
impl SerialAdapter {
    pub fn new(uart: UartDriver<'static>) -> Self {
        Self { uart }
    }
}

#[cfg(not(feature = "espidf"))]
impl SerialAdapter {
    pub fn new() -> Self {
        Self { rx: VecDeque::new() }
    }

    /// Queue bytes as if they had arrived on the wire.
    pub fn inject(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Bytes received but not yet consumed by the framer.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

#[cfg(not(feature = "espidf"))]
impl Default for SerialAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for SerialAdapter {
    #[cfg(feature = "espidf")]
    fn read_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.uart.read(&mut buf, NON_BLOCK) {
            Ok(1) => Some(buf[0]),
            Ok(_) => None,
            Err(e) => {
                log::warn!("serial: UART read failed: {}", e);
                None
            }
        }
    }

    #[cfg(not(feature = "espidf"))]
    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}
