//! GPIO / peripheral pin assignments for the heater controller board.
//!
//! Single source of truth for the numbers that are not tied to a typed
//! `esp_idf_svc::hal` peripheral.  The relay pin can be overridden from
//! `config.json`, so it is carried as a raw GPIO number.
//!
//! Fixed wiring (taken as typed peripherals in `main`):
//!
//! | Signal     | GPIO | Peripheral |
//! |------------|------|------------|
//! | SD SCK     | 12   | SPI2       |
//! | SD MOSI    | 11   | SPI2       |
//! | SD MISO    | 13   | SPI2       |
//! | SD CS      | 10   | SPI2       |
//! | Command TX | 43   | UART0      |
//! | Command RX | 44   | UART0      |

// ---------------------------------------------------------------------------
// Heater relay
// ---------------------------------------------------------------------------

/// Digital output driving the heater relay coil.
pub const RELAY_GPIO: i32 = 7;
/// The relay module energises its coil when the input is pulled LOW.
pub const RELAY_ACTIVE_LOW: bool = true;

// ---------------------------------------------------------------------------
// SD card
// ---------------------------------------------------------------------------

/// VFS mount point of the FAT volume.
pub const SD_MOUNT_POINT: &str = "/sdcard";
/// Maximum simultaneously open files on the volume.
pub const SD_MAX_OPEN_FILES: usize = 4;
