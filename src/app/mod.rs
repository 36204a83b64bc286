//! Application core — pure controller logic, zero I/O.
//!
//! This module contains the rules of the heater: command dispatch, phase
//! control and profile persistence policy.  All interaction with hardware
//! and storage happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod state;
