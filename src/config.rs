//! Controller configuration parameters
//!
//! Board-level settings for the Thermocycle controller.  Defaults match
//! the reference wiring; any of them can be overridden by dropping a
//! `config.json` file at the root of the SD card.  The heating profile is
//! **not** part of this struct: it has its own persisted record (see
//! [`crate::profile`]) and is changed at runtime over the serial link.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{FileStoragePort, StorageError};
use crate::error::{self, Error};

/// Name of the optional override file at the storage root.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Relay ---
    /// GPIO driving the relay coil transistor.
    pub relay_gpio: i32,
    /// `true` when pulling the pin LOW closes the relay (current passing).
    pub relay_active_low: bool,

    // --- Timing ---
    /// Pause between control-loop ticks (milliseconds).
    pub control_loop_interval_ms: u32,

    // --- Serial ---
    /// Baud rate of the command UART.
    pub serial_baud: u32,

    // --- Storage ---
    /// File holding the persisted heating profile.
    pub data_file_name: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Relay
            relay_gpio: crate::pins::RELAY_GPIO,
            relay_active_low: crate::pins::RELAY_ACTIVE_LOW,

            // Timing
            control_loop_interval_ms: 10, // 100 Hz

            // Serial
            serial_baud: 9600,

            // Storage
            data_file_name: String::from(crate::profile::DATA_FILE_NAME),
        }
    }
}

/// Errors from loading or validating a [`ControllerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config file on the card.
    NotFound,
    /// The file exists but could not be read or deserialised.
    Corrupted,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl ControllerConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=48).contains(&self.relay_gpio) {
            return Err(ConfigError::ValidationFailed("relay_gpio must be 0–48"));
        }
        if !(1..=1000).contains(&self.control_loop_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "control_loop_interval_ms must be 1–1000",
            ));
        }
        if !(1200..=921_600).contains(&self.serial_baud) {
            return Err(ConfigError::ValidationFailed(
                "serial_baud must be 1200–921600",
            ));
        }
        if self.data_file_name.is_empty() || self.data_file_name.contains(['/', '\\']) {
            return Err(ConfigError::ValidationFailed(
                "data_file_name must be a plain, non-empty file name",
            ));
        }
        if self.data_file_name == CONFIG_FILE_NAME {
            return Err(ConfigError::ValidationFailed(
                "data_file_name must differ from the config file",
            ));
        }
        Ok(())
    }

    /// Load and validate the override file from `storage`.
    pub fn load_from(storage: &impl FileStoragePort) -> error::Result<Self> {
        let bytes = match storage.read(CONFIG_FILE_NAME) {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound) => return Err(ConfigError::NotFound.into()),
            Err(e) => {
                warn!("Config: read failed: {}", e);
                return Err(ConfigError::Corrupted.into());
            }
        };
        let cfg: Self = serde_json::from_slice(&bytes).map_err(|e| {
            warn!("Config: {} is not valid JSON: {}", CONFIG_FILE_NAME, e);
            ConfigError::Corrupted
        })?;
        cfg.validate()?;
        info!("Config: loaded overrides from {}", CONFIG_FILE_NAME);
        Ok(cfg)
    }

    /// Load the override file, falling back to defaults on any failure.
    pub fn load_or_default(storage: &impl FileStoragePort) -> Self {
        match Self::load_from(storage) {
            Ok(cfg) => cfg,
            Err(Error::Config(ConfigError::NotFound)) => {
                info!("Config: no {}, using defaults", CONFIG_FILE_NAME);
                Self::default()
            }
            Err(e) => {
                warn!("{} rejected ({}), using defaults", CONFIG_FILE_NAME, e);
                Self::default()
            }
        }
    }
}
