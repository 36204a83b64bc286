//! End-to-end tests over the real filesystem adapter.
//!
//! A tempdir stands in for the mounted SD volume.

use std::fs;

use thermocycle::adapters::sd_card::SdCardAdapter;
use thermocycle::adapters::serial::SerialAdapter;
use thermocycle::app::service::Controller;
use thermocycle::config::{CONFIG_FILE_NAME, ControllerConfig};
use thermocycle::profile::DATA_FILE_NAME;

use crate::mock_hw::{MockRelay, RecordingSink};

fn boot(dir: &std::path::Path) -> (Controller, SdCardAdapter) {
    let mut storage = SdCardAdapter::new(dir);
    let available = storage.probe().is_ok();
    let config = if available {
        ControllerConfig::load_or_default(&storage)
    } else {
        ControllerConfig::default()
    };
    let mut ctl = Controller::new(&config, available, 0);
    ctl.start(&mut MockRelay::new(), &mut storage, &mut RecordingSink::new(), 0);
    (ctl, storage)
}

fn send(ctl: &mut Controller, storage: &mut SdCardAdapter, frame: &[u8]) {
    let mut serial = SerialAdapter::new();
    serial.inject(frame);
    ctl.tick(
        &mut serial,
        &mut MockRelay::new(),
        storage,
        &mut RecordingSink::new(),
        1,
    );
}

#[test]
fn profile_round_trips_through_card() {
    let dir = tempfile::tempdir().unwrap();

    let (mut ctl, mut storage) = boot(dir.path());
    send(&mut ctl, &mut storage, b"<command=PU,id=3,heat=1500>");

    let on_disk = fs::read(dir.path().join(DATA_FILE_NAME)).unwrap();
    assert_eq!(on_disk, b"id=3,heat=1500,preserve=3000,rest=2000~");

    let (ctl, _) = boot(dir.path());
    assert_eq!(ctl.profile().id, 3);
    assert_eq!(ctl.profile().heat_ms, 1_500);
}

#[test]
fn truncated_file_on_card_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(DATA_FILE_NAME), b"id=3,heat=15").unwrap();

    let (ctl, _) = boot(dir.path());
    assert_eq!(ctl.profile(), thermocycle::profile::load_default());
}

#[test]
fn missing_mount_runs_without_storage() {
    let dir = tempfile::tempdir().unwrap();
    let (mut ctl, mut storage) = boot(&dir.path().join("sdcard"));
    assert!(!ctl.storage_available());

    send(&mut ctl, &mut storage, b"<command=PU,heat=10>");
    assert_eq!(ctl.profile().heat_ms, 10);
    assert!(!dir.path().join("sdcard").exists());
}

#[test]
fn config_file_renames_data_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        br#"{ "data_file_name": "profile.txt" }"#,
    )
    .unwrap();
    fs::write(dir.path().join("profile.txt"), b"id=42~").unwrap();

    let (mut ctl, mut storage) = boot(dir.path());
    assert_eq!(ctl.profile().id, 42);

    send(&mut ctl, &mut storage, b"<command=remove_data_file>");
    assert!(!dir.path().join("profile.txt").exists());
    assert!(!dir.path().join(DATA_FILE_NAME).exists());
}

#[test]
fn invalid_config_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        br#"{ "control_loop_interval_ms": 0 }"#,
    )
    .unwrap();

    let storage = SdCardAdapter::new(dir.path());
    assert_eq!(ControllerConfig::load_or_default(&storage), ControllerConfig::default());
}
