//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements      | Connects to              |
//! |------------|-----------------|--------------------------|
//! | `hardware` | RelayPort       | Relay GPIO (embedded-hal)|
//! | `log_sink` | EventSink       | Serial log output        |
//! | `sd_card`  | FileStoragePort | FAT volume via VFS / fs  |
//! | `serial`   | ByteSource      | Command UART             |
//! | `time`     | —               | ESP32 system timer       |

pub mod hardware;
pub mod log_sink;
pub mod sd_card;
pub mod serial;
pub mod time;
