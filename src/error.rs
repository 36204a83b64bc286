//! Unified error types for the Thermocycle firmware.
//!
//! Every subsystem error is a small `Copy` enum with a `Display` impl and
//! a `From` conversion into [`Error`], so the bootstrap path and the
//! persistence helpers can funnel failures through a single type.  None
//! of these ever escape the control loop: the controller logs them and
//! keeps driving the relay.

use core::fmt;

use crate::app::ports::StorageError;
use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A serial message could not be interpreted.
    Protocol(ProtocolError),
    /// The SD card could not be read or written.
    Storage(StorageError),
    /// A persisted profile record failed its integrity check.
    Corrupt(CorruptError),
    /// The configuration file is missing, unreadable, or out of range.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protocol(e) => write!(f, "protocol: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Corrupt(e) => write!(f, "profile record: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Protocol errors
// ---------------------------------------------------------------------------

/// Reasons a framed serial message (or one of its pairs) was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// The frame does not start with `command=<type>`.
    NotACommand,
    /// The command type is not in the dispatch table.
    UnknownCommand,
    /// A pair names a key the command does not understand.
    UnknownKey,
    /// A pair carries a value outside the accepted set.
    InvalidValue,
    /// The payload ended with a key that has no value.
    DanglingKey,
    /// The frame contained bytes that are not valid UTF-8.
    NotUtf8,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotACommand => write!(f, "not a command message"),
            Self::UnknownCommand => write!(f, "unknown command type"),
            Self::UnknownKey => write!(f, "unknown key"),
            Self::InvalidValue => write!(f, "invalid value"),
            Self::DanglingKey => write!(f, "key without value"),
            Self::NotUtf8 => write!(f, "frame is not valid UTF-8"),
        }
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

// ---------------------------------------------------------------------------
// Persisted record corruption
// ---------------------------------------------------------------------------

/// A persisted profile record that must not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptError {
    /// The record does not end with the integrity marker (truncated write).
    MissingMarker,
    /// The record body is not valid UTF-8.
    NotUtf8,
}

impl fmt::Display for CorruptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMarker => write!(f, "integrity marker missing"),
            Self::NotUtf8 => write!(f, "record is not valid UTF-8"),
        }
    }
}

impl From<CorruptError> for Error {
    fn from(e: CorruptError) -> Self {
        Self::Corrupt(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
