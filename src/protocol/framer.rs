//! Start/end delimited message framer.
//!
//! Wire format:
//! ```text
//! ┌─────┬───────────────────────────────┬─────┐
//! │ '<' │ message (≤ 127 bytes kept)    │ '>' │
//! └─────┴───────────────────────────────┴─────┘
//! ```
//!
//! Bytes are pulled one at a time so nothing after the end delimiter is
//! consumed: the next message stays in the source for the next tick.
//! Bytes past the buffer capacity are dropped without error, and bytes
//! outside a `<...>` pair are line noise and ignored.

use heapless::Vec;

use super::transport::ByteSource;

/// Start-of-message delimiter.
pub const START_OF_MESSAGE: u8 = b'<';

/// End-of-message delimiter.
pub const END_OF_MESSAGE: u8 = b'>';

/// Size of the receive buffer, terminator slot included.
pub const FRAME_BUFFER_SIZE: usize = 128;

/// Maximum message bytes retained per frame.
pub const MAX_MESSAGE_LEN: usize = FRAME_BUFFER_SIZE - 1;

/// Streaming framer.  Does not reset itself after a complete message;
/// the consumer calls [`reset`](Self::reset) once it has copied it out.
pub struct Framer {
    started: bool,
    ended: bool,
    buffer: Vec<u8, MAX_MESSAGE_LEN>,
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer {
    pub fn new() -> Self {
        Self {
            started: false,
            ended: false,
            buffer: Vec::new(),
        }
    }

    /// Feed a single byte.  Returns `true` when the byte was an end
    /// delimiter and the caller should stop reading for this cycle.
    pub fn feed(&mut self, byte: u8) -> bool {
        match byte {
            START_OF_MESSAGE => {
                // Last start byte wins: any partial message is discarded.
                self.buffer.clear();
                self.started = true;
                self.ended = false;
                false
            }
            END_OF_MESSAGE => {
                self.ended = true;
                true
            }
            _ if self.started => {
                // Overflow bytes are dropped on purpose.
                let _ = self.buffer.push(byte);
                false
            }
            _ => false,
        }
    }

    /// Drain `source` until it runs dry or an end delimiter arrives.
    ///
    /// Returns [`is_complete`](Self::is_complete).  A complete frame that
    /// has not been reset yet blocks further consumption.
    pub fn poll(&mut self, source: &mut impl ByteSource) -> bool {
        if self.is_complete() {
            return true;
        }
        while let Some(byte) = source.read_byte() {
            if self.feed(byte) {
                break;
            }
        }
        self.is_complete()
    }

    /// Both delimiters have been seen.
    pub fn is_complete(&self) -> bool {
        self.started && self.ended
    }

    /// Message bytes collected so far (without delimiters).
    pub fn message(&self) -> &[u8] {
        &self.buffer
    }

    /// Owned copy of the message, so the framer can be reset before the
    /// message is processed.
    pub fn copy_message(&self) -> Vec<u8, MAX_MESSAGE_LEN> {
        self.buffer.clone()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear flags and buffer, ready for the next message.
    pub fn reset(&mut self) {
        self.started = false;
        self.ended = false;
        self.buffer.clear();
    }
}
