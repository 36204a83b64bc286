//! Port traits — the hexagonal boundary between controller logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (relay, SD card, event sinks) implement these traits.
//! The [`Controller`](super::service::Controller) consumes them via
//! generics, so the core never touches hardware directly.  The inbound
//! byte source lives beside the framer in
//! [`protocol::transport`](crate::protocol::transport).

use crate::fsm::context::RelayLevel;

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// One-way sink for the heater relay.
pub trait RelayPort {
    /// Drive the relay to `level`.
    fn set_output(&mut self, level: RelayLevel);

    /// Last level written.
    fn output(&self) -> RelayLevel;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The controller emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// File storage port (driven adapter: domain ↔ SD card)
// ───────────────────────────────────────────────────────────────

/// Whole-file access to the SD card by name.
///
/// Files are small and always read or written as a single blob.  There is
/// no partial-write recovery: callers that need atomicity rewrite with
/// delete-then-create and detect truncation themselves (see the integrity
/// marker in [`crate::profile`]).
pub trait FileStoragePort {
    /// Read the complete contents of `name`.
    fn read(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Create (or truncate) `name` and write `data` to it.
    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete `name`.  Returns `Ok(())` even if the file didn't exist.
    fn remove(&mut self, name: &str) -> Result<(), StorageError>;

    /// Check whether `name` exists without reading it.
    fn exists(&self, name: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`FileStoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested file does not exist.
    NotFound,
    /// The card is not mounted or was removed.
    Unavailable,
    /// Open, read, or write failed.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "file not found"),
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
