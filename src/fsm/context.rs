//! Inputs and outputs of the phase handlers.
//!
//! `PhaseContext` is the read-only view a phase's `on_update` handler gets
//! each tick: how long the phase has run and the durations from the active
//! profile.  `RelayLevel` is the single actuator output a phase declares.

use crate::profile::Profile;

// ---------------------------------------------------------------------------
// Relay output
// ---------------------------------------------------------------------------

/// Two-level relay signal.  There is no PWM or variable duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayLevel {
    /// Coil driven, heater current flowing.
    Energized,
    /// Coil released, heater off.  Safe default.
    #[default]
    DeEnergized,
}

impl RelayLevel {
    pub fn is_energized(self) -> bool {
        matches!(self, Self::Energized)
    }
}

// ---------------------------------------------------------------------------
// PhaseContext
// ---------------------------------------------------------------------------

/// Snapshot handed to every phase handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseContext {
    /// Milliseconds since the current phase was entered.
    pub elapsed_ms: u64,
    /// Heating phase length (ms).
    pub heat_ms: u32,
    /// Preserving phase length (ms).
    pub preserve_ms: u32,
    /// Resting phase length (ms).
    pub rest_ms: u32,
}

impl PhaseContext {
    pub fn new(elapsed_ms: u64, profile: &Profile) -> Self {
        Self {
            elapsed_ms,
            heat_ms: profile.heat_ms,
            preserve_ms: profile.preserve_ms,
            rest_ms: profile.rest_ms,
        }
    }

    /// `true` once at least `duration_ms` has elapsed in the phase.
    pub fn has_elapsed(&self, duration_ms: u32) -> bool {
        self.elapsed_ms >= u64::from(duration_ms)
    }
}
