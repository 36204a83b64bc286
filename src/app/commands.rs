//! Inbound commands to the controller.
//!
//! A [`Command`] borrows its payload from the framed message; the
//! [`Controller`](super::service::Controller) walks the payload pairs
//! itself, so only the command type is decided here.

use crate::error::{self, ProtocolError};
use crate::protocol::parser::ParsedMessage;

/// Wire name of [`Command::HeaterFunction`].
pub const HEATER_FUNCTION: &str = "HF";
/// Wire name of [`Command::ProfileUpdate`].
pub const PROFILE_UPDATE: &str = "PU";
/// Wire name of [`Command::Debug`].
pub const DEBUG: &str = "debug";
/// Wire name of [`Command::CheckEnabled`].
pub const CHECK_ENABLED: &str = "check_enabled";
/// Wire name of [`Command::RemoveDataFile`].
pub const REMOVE_DATA_FILE: &str = "remove_data_file";

/// `HF` payload key toggling the cycle.
pub const ENABLED_KEY: &str = "enabled";
/// `HF` payload key forcing a phase.
pub const PHASE_KEY: &str = "phase";

/// Where a command came from.  Only external commands are written back
/// to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOrigin {
    /// Received over the serial link.
    External,
    /// Replayed from the persisted record at boot.
    Startup,
}

/// Commands the controller understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `HF`: `enabled=true|false`, `phase=heat|preserve|rest`.
    HeaterFunction(&'a str),
    /// `PU`: `id`, `heat`, `preserve`, `rest`.
    ProfileUpdate(&'a str),
    /// Dump the full system state to the log.
    Debug,
    /// Report the enable flag.
    CheckEnabled,
    /// Delete the persisted profile.
    RemoveDataFile,
}

impl<'a> Command<'a> {
    /// Look the command type up in the dispatch table.
    pub fn from_message(message: ParsedMessage<'a>) -> error::Result<Self> {
        match message.command_type {
            HEATER_FUNCTION => Ok(Self::HeaterFunction(message.remainder)),
            PROFILE_UPDATE => Ok(Self::ProfileUpdate(message.remainder)),
            DEBUG => Ok(Self::Debug),
            CHECK_ENABLED => Ok(Self::CheckEnabled),
            REMOVE_DATA_FILE => Ok(Self::RemoveDataFile),
            _ => Err(ProtocolError::UnknownCommand.into()),
        }
    }

    /// Wire name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::HeaterFunction(_) => HEATER_FUNCTION,
            Self::ProfileUpdate(_) => PROFILE_UPDATE,
            Self::Debug => DEBUG,
            Self::CheckEnabled => CHECK_ENABLED,
            Self::RemoveDataFile => REMOVE_DATA_FILE,
        }
    }
}
