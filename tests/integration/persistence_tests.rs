//! Integration tests for profile persistence through the Controller.
//!
//! Uses the recording [`MemStorage`] so tests can assert on the exact
//! sequence of storage calls, including the calls that must *not* happen.

use thermocycle::app::events::AppEvent;
use thermocycle::fsm::Phase;
use thermocycle::profile::{DATA_FILE_NAME, Profile, load_default};

use crate::controller_tests::Rig;
use crate::mock_hw::{MemStorage, StorageCall};

const T0: u64 = 1_000;
const STORED: &[u8] = b"id=7,heat=3000,preserve=2000,rest=1000~";

fn stored_profile() -> Profile {
    Profile {
        id: 7,
        heat_ms: 3_000,
        preserve_ms: 2_000,
        rest_ms: 1_000,
    }
}

// ── Startup load ──────────────────────────────────────────────

#[test]
fn startup_loads_stored_profile_without_write_back() {
    let rig = Rig::new(MemStorage::with_file(DATA_FILE_NAME, STORED), true);

    assert_eq!(rig.ctl.profile(), stored_profile());
    assert_eq!(rig.storage.writes(), 0);
    assert!(
        !rig.storage
            .calls()
            .iter()
            .any(|c| matches!(c, StorageCall::Remove(_))),
        "startup must never rewrite the record"
    );
    assert_eq!(
        rig.sink.last(),
        Some(&AppEvent::Started {
            phase: Phase::Heating,
            profile_loaded: true,
        })
    );
}

#[test]
fn stored_heat_duration_drives_first_phase() {
    let mut rig = Rig::new(MemStorage::with_file(DATA_FILE_NAME, STORED), true);
    rig.tick(T0 + 2_999);
    assert_eq!(rig.ctl.phase(), Phase::Heating);
    rig.tick(T0 + 3_000);
    assert_eq!(rig.ctl.phase(), Phase::Resting);
}

#[test]
fn startup_partial_record_keeps_defaults_for_missing_fields() {
    let rig = Rig::new(MemStorage::with_file(DATA_FILE_NAME, b"heat=9000~"), true);
    let p = rig.ctl.profile();
    assert_eq!(p.heat_ms, 9_000);
    assert_eq!(p.rest_ms, load_default().rest_ms);
}

#[test]
fn startup_rejects_unusable_records() {
    for contents in [
        &b"id=7,heat=3000,preserve=2000,rest=1000"[..],
        b"id=7,heat=3000~\n",
        b"",
        b"id=\xff~",
    ] {
        let rig = Rig::new(MemStorage::with_file(DATA_FILE_NAME, contents), true);
        assert_eq!(rig.ctl.profile(), load_default(), "record {:?}", contents);
        assert_eq!(
            rig.sink.last(),
            Some(&AppEvent::Started {
                phase: Phase::Heating,
                profile_loaded: false,
            })
        );
        assert_eq!(rig.storage.writes(), 0);
    }
}

#[test]
fn startup_without_file_uses_defaults() {
    let rig = Rig::new(MemStorage::new(), true);
    assert_eq!(rig.ctl.profile(), load_default());
    assert_eq!(
        rig.storage.calls(),
        vec![StorageCall::Exists(DATA_FILE_NAME.to_string())]
    );
}

// ── Storage unavailable ───────────────────────────────────────

#[test]
fn unavailable_storage_sees_no_calls() {
    let mut rig = Rig::new(MemStorage::with_file(DATA_FILE_NAME, STORED), false);
    assert_eq!(rig.ctl.profile(), load_default());

    rig.send(b"<command=PU,heat=1000>", T0 + 1);
    rig.send(b"<command=remove_data_file>", T0 + 2);
    rig.send(b"<command=debug>", T0 + 3);

    assert!(rig.storage.calls().is_empty());
    assert_eq!(rig.ctl.profile().heat_ms, 1_000);
    assert_eq!(rig.storage.file(DATA_FILE_NAME), Some(STORED));
}

// ── External PU write-back ────────────────────────────────────

#[test]
fn external_pu_rewrites_record() {
    let mut rig = Rig::new(MemStorage::new(), true);
    rig.storage.clear_calls();

    rig.send(b"<command=PU,heat=1000,preserve=500>", T0 + 1);

    let record = b"id=1,heat=1000,preserve=500,rest=2000~".to_vec();
    assert_eq!(
        rig.storage.calls(),
        vec![
            StorageCall::Remove(DATA_FILE_NAME.to_string()),
            StorageCall::Write(DATA_FILE_NAME.to_string(), record.clone()),
        ]
    );
    assert_eq!(rig.storage.file(DATA_FILE_NAME), Some(record.as_slice()));
    assert_eq!(rig.sink.last(), Some(&AppEvent::ProfileSaved(rig.ctl.profile())));
}

#[test]
fn every_external_pu_is_written() {
    let mut rig = Rig::new(MemStorage::new(), true);
    rig.send(b"<command=PU,id=2>", T0 + 1);
    rig.send(b"<command=PU,id=2>", T0 + 2);
    assert_eq!(rig.storage.writes(), 2);
}

#[test]
fn write_failure_keeps_in_memory_profile() {
    let mut storage = MemStorage::with_file(DATA_FILE_NAME, STORED);
    storage.fail_writes = true;
    let mut rig = Rig::new(storage, true);
    assert_eq!(rig.ctl.profile(), stored_profile());

    rig.send(b"<command=PU,rest=4444>", T0 + 1);

    assert_eq!(rig.ctl.profile().rest_ms, 4_444);
    assert!(
        !rig.sink
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::ProfileSaved(_)))
    );
}

#[test]
fn saved_profile_survives_restart() {
    let mut rig = Rig::new(MemStorage::new(), true);
    rig.send(b"<command=PU,id=5,heat=8000,preserve=100,rest=60000>", T0 + 1);
    let saved = rig.ctl.profile();

    let rebooted = Rig::new(rig.storage, true);
    assert_eq!(rebooted.ctl.profile(), saved);
    assert_eq!(rebooted.storage.writes(), 1);
}

// ── remove_data_file ──────────────────────────────────────────

#[test]
fn remove_data_file_deletes_record() {
    let mut rig = Rig::new(MemStorage::with_file(DATA_FILE_NAME, STORED), true);
    rig.tick(T0 + 3_000);
    assert_eq!(rig.ctl.phase(), Phase::Resting);

    rig.send(b"<command=remove_data_file>", T0 + 3_001);

    assert_eq!(rig.storage.file(DATA_FILE_NAME), None);
    assert_eq!(rig.sink.last(), Some(&AppEvent::DataFileRemoved));
    // The running profile and phase are untouched.
    assert_eq!(rig.ctl.profile(), stored_profile());
    assert_eq!(rig.ctl.phase(), Phase::Resting);

    let rebooted = Rig::new(rig.storage, true);
    assert_eq!(rebooted.ctl.profile(), load_default());
}

#[test]
fn remove_data_file_without_record_succeeds() {
    let mut rig = Rig::new(MemStorage::new(), true);
    rig.send(b"<command=remove_data_file>", T0 + 1);
    assert_eq!(rig.sink.last(), Some(&AppEvent::DataFileRemoved));
}

#[test]
fn remove_data_file_while_disabled() {
    let mut rig = Rig::new(MemStorage::with_file(DATA_FILE_NAME, STORED), true);
    rig.send(b"<command=HF,enabled=false>", T0 + 1);
    rig.send(b"<command=remove_data_file>", T0 + 2);
    assert_eq!(rig.storage.file(DATA_FILE_NAME), None);
}
