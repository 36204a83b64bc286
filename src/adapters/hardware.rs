//! Hardware adapter — bridges the relay driver to the domain port trait.
//!
//! This is the only module the controller drives actuators through.  It is
//! generic over the pin so the same adapter runs against an `esp_idf_svc::hal`
//! `PinDriver` on the device and a mock pin on the host.

use embedded_hal::digital::OutputPin;

use crate::app::ports::RelayPort;
use crate::drivers::relay::RelayDriver;
use crate::fsm::context::RelayLevel;

/// Concrete adapter exposing the heater relay through [`RelayPort`].
pub struct HardwareAdapter<P: OutputPin> {
    relay: RelayDriver<P>,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(relay: RelayDriver<P>) -> Self {
        Self { relay }
    }
}

// ── RelayPort implementation ──────────────────────────────────

impl<P: OutputPin> RelayPort for HardwareAdapter<P> {
    fn set_output(&mut self, level: RelayLevel) {
        if level != self.relay.level() {
            log::debug!("relay: {:?} -> {:?}", self.relay.level(), level);
        }
        self.relay.set(level);
    }

    fn output(&self) -> RelayLevel {
        self.relay.level()
    }
}
