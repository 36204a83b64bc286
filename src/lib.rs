//! Thermocycle firmware library.
//!
//! Exposes the controller core, protocol and adapters for the firmware
//! binary and for host-side integration testing.  All ESP-IDF-specific
//! code is guarded by `#[cfg(feature = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod profile;
pub mod protocol;

pub mod adapters;
pub mod drivers;
