//! Heater relay driver.
//!
//! A dumb actuator over any `embedded_hal` [`OutputPin`].  Translates the
//! logical [`RelayLevel`] into a pin level according to the module's
//! polarity (most opto-isolated relay boards are active-low).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: wraps an `esp_idf_svc::hal` `PinDriver` in output mode.
//! On host/test: any in-memory `OutputPin` implementation.

use embedded_hal::digital::{Error as _, OutputPin};
use log::warn;

use crate::fsm::context::RelayLevel;

pub struct RelayDriver<P: OutputPin> {
    pin: P,
    active_low: bool,
    level: RelayLevel,
}

impl<P: OutputPin> RelayDriver<P> {
    /// Take ownership of `pin` and drive the relay off immediately.
    pub fn new(pin: P, active_low: bool) -> Self {
        let mut driver = Self {
            pin,
            active_low,
            level: RelayLevel::DeEnergized,
        };
        driver.set(RelayLevel::DeEnergized);
        driver
    }

    pub fn set(&mut self, level: RelayLevel) {
        // Pin HIGH energises an active-high module; invert for active-low.
        let high = level.is_energized() != self.active_low;
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match result {
            Ok(()) => self.level = level,
            Err(e) => warn!(
                "relay: pin write failed ({:?}), level stays {:?}",
                e.kind(),
                self.level
            ),
        }
    }

    /// Last level successfully written to the pin.
    pub fn level(&self) -> RelayLevel {
        self.level
    }
}
