//! Outbound application events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  The serial channel has no
//! response protocol, so this is the only way state is reported back.

use crate::fsm::Phase;
use crate::profile::Profile;

/// Structured events emitted by the controller core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller has started (carries initial phase and whether the
    /// profile came from storage).
    Started { phase: Phase, profile_loaded: bool },

    /// The phase changed, by timer or by command.
    PhaseChanged { from: Phase, to: Phase },

    /// The cycle was enabled (`true`) or disabled (`false`).
    EnabledChanged(bool),

    /// One or more profile fields changed.
    ProfileUpdated(Profile),

    /// The profile record was rewritten on the card.
    ProfileSaved(Profile),

    /// The profile record was deleted from the card.
    DataFileRemoved,

    /// Full state dump requested by `debug`.
    Snapshot(StateSnapshot),

    /// Reply to `check_enabled`.
    EnabledReport(bool),
}

/// A point-in-time view of the whole system state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSnapshot {
    pub enabled: bool,
    pub phase: Phase,
    /// Milliseconds spent in `phase` so far.
    pub phase_elapsed_ms: u64,
    pub profile: Profile,
    pub storage_available: bool,
}
