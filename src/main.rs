//! Thermocycle Firmware — Main Entry Point
//!
//! Hexagonal architecture with a fixed-rate polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter  LogEventSink  SdCardAdapter  SerialAdapter   │
//! │  (RelayPort)      (EventSink)   (FileStorage)  (ByteSource)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Controller (pure logic)                   │    │
//! │  │  Framer · Parser · Profile store · Phase machine       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::fs::fatfs::Fatfs;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyOutputPin, Gpio10, Gpio11, Gpio12, Gpio13, PinDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::sd::spi::SdSpiHostDriver;
use esp_idf_svc::hal::sd::{SdCardConfiguration, SdCardDriver};
use esp_idf_svc::hal::spi::config::DriverConfig;
use esp_idf_svc::hal::spi::{Dma, SPI2, SpiDriver};
use esp_idf_svc::hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::io::vfs::MountedFatfs;

use thermocycle::adapters::hardware::HardwareAdapter;
use thermocycle::adapters::log_sink::LogEventSink;
use thermocycle::adapters::sd_card::SdCardAdapter;
use thermocycle::adapters::serial::SerialAdapter;
use thermocycle::adapters::time::Esp32TimeAdapter;
use thermocycle::app::service::Controller;
use thermocycle::config::ControllerConfig;
use thermocycle::drivers::relay::RelayDriver;
use thermocycle::pins;

// ── SD card bring-up ──────────────────────────────────────────

/// Mount the FAT volume at [`pins::SD_MOUNT_POINT`].  The returned guard
/// must stay alive for as long as the volume is used.
fn mount_sd_card(
    spi: SPI2,
    sck: Gpio12,
    mosi: Gpio11,
    miso: Gpio13,
    cs: Gpio10,
) -> Result<impl Sized> {
    let spi_driver = SpiDriver::new(
        spi,
        sck,
        mosi,
        Some(miso),
        &DriverConfig::default().dma(Dma::Auto(4096)),
    )?;
    let sd_card_driver = SdCardDriver::new_spi(
        SdSpiHostDriver::new(
            spi_driver,
            Some(cs),
            AnyIOPin::none(),
            AnyIOPin::none(),
            AnyIOPin::none(),
            None,
        )?,
        &SdCardConfiguration::new(),
    )?;
    let mounted = MountedFatfs::mount(
        Fatfs::new_sdcard(0, sd_card_driver)?,
        pins::SD_MOUNT_POINT,
        pins::SD_MAX_OPEN_FILES,
    )?;
    Ok(mounted)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Thermocycle v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let peripherals = Peripherals::take()?;
    let gpio = peripherals.pins;

    // ── 2. Storage (optional for the whole session) ───────────
    let sd_guard = match mount_sd_card(
        peripherals.spi2,
        gpio.gpio12,
        gpio.gpio11,
        gpio.gpio13,
        gpio.gpio10,
    ) {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("SD mount failed ({}), running without persistence", e);
            None
        }
    };
    let mut storage = SdCardAdapter::new(pins::SD_MOUNT_POINT);
    let storage_available = sd_guard.is_some() && storage.probe().is_ok();

    // ── 3. Config from card (or defaults) ─────────────────────
    let config = if storage_available {
        ControllerConfig::load_or_default(&storage)
    } else {
        ControllerConfig::default()
    };

    // ── 4. Construct adapters ─────────────────────────────────
    // SAFETY: relay_gpio was range-checked by ControllerConfig::validate
    // and no other driver claims that pin.
    let relay_pin = PinDriver::output(unsafe { AnyOutputPin::new(config.relay_gpio) })?;
    let mut hw = HardwareAdapter::new(RelayDriver::new(relay_pin, config.relay_active_low));

    let uart = UartDriver::new(
        peripherals.uart0,
        gpio.gpio43,
        gpio.gpio44,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::new().baudrate(Hertz(config.serial_baud)),
    )?;
    let mut serial = SerialAdapter::new(uart);
    let mut log_sink = LogEventSink::new();
    let clock = Esp32TimeAdapter::new();

    // ── 5. Construct controller ───────────────────────────────
    let mut controller = Controller::new(&config, storage_available, clock.uptime_ms());
    controller.start(&mut hw, &mut storage, &mut log_sink, clock.uptime_ms());

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        controller.tick(
            &mut serial,
            &mut hw,
            &mut storage,
            &mut log_sink,
            clock.uptime_ms(),
        );
        FreeRtos::delay_ms(config.control_loop_interval_ms);
    }
}
