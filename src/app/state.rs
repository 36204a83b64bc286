//! The single owned aggregate of everything the controller mutates.

use crate::fsm::states::build_phase_table;
use crate::fsm::{Phase, PhaseMachine};
use crate::profile::{Profile, load_default};

use super::events::StateSnapshot;

/// Enable flag, phase and timing (inside the machine), the active profile,
/// and whether the SD card is usable this session.
pub struct SystemState {
    pub machine: PhaseMachine,
    pub profile: Profile,
    /// Fixed at construction; gates every persistence operation.
    storage_available: bool,
}

impl SystemState {
    /// Enabled, in Heating since `now_ms`, default profile.
    pub fn new(storage_available: bool, now_ms: u64) -> Self {
        Self {
            machine: PhaseMachine::new(build_phase_table(), Phase::Heating, now_ms),
            profile: load_default(),
            storage_available,
        }
    }

    pub fn storage_available(&self) -> bool {
        self.storage_available
    }

    pub fn snapshot(&self, now_ms: u64) -> StateSnapshot {
        StateSnapshot {
            enabled: self.machine.is_enabled(),
            phase: self.machine.phase(),
            phase_elapsed_ms: self.machine.elapsed_ms(now_ms),
            profile: self.profile,
            storage_available: self.storage_available,
        }
    }
}
