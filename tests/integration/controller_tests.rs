//! Integration tests for the serial → Controller → relay pipeline.
//!
//! Frames are injected into the host [`SerialAdapter`] and pushed through
//! `Controller::tick`, exactly as the firmware loop does, so framing,
//! parsing, dispatch and the phase timer are exercised together.

use thermocycle::adapters::serial::SerialAdapter;
use thermocycle::app::events::AppEvent;
use thermocycle::app::service::Controller;
use thermocycle::config::ControllerConfig;
use thermocycle::fsm::Phase;
use thermocycle::fsm::context::RelayLevel;

use crate::mock_hw::{MemStorage, MockRelay, RecordingSink};

const T0: u64 = 1_000;

pub struct Rig {
    pub ctl: Controller,
    pub serial: SerialAdapter,
    pub hw: MockRelay,
    pub storage: MemStorage,
    pub sink: RecordingSink,
}

impl Rig {
    pub fn new(storage: MemStorage, storage_available: bool) -> Self {
        let mut rig = Self {
            ctl: Controller::new(&ControllerConfig::default(), storage_available, T0),
            serial: SerialAdapter::new(),
            hw: MockRelay::new(),
            storage,
            sink: RecordingSink::new(),
        };
        rig.ctl.start(&mut rig.hw, &mut rig.storage, &mut rig.sink, T0);
        rig
    }

    pub fn tick(&mut self, now_ms: u64) {
        self.ctl.tick(
            &mut self.serial,
            &mut self.hw,
            &mut self.storage,
            &mut self.sink,
            now_ms,
        );
    }

    /// Inject `bytes` and run a single tick.
    pub fn send(&mut self, bytes: &[u8], now_ms: u64) {
        self.serial.inject(bytes);
        self.tick(now_ms);
    }
}

fn rig() -> Rig {
    Rig::new(MemStorage::new(), false)
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_enters_heating_with_relay_energized() {
    let rig = rig();
    assert_eq!(rig.ctl.phase(), Phase::Heating);
    assert!(rig.ctl.is_enabled());
    assert_eq!(rig.ctl.phase_entered_at_ms(), T0);
    assert_eq!(rig.hw.last_call(), Some(RelayLevel::Energized));
    assert_eq!(
        rig.sink.events,
        vec![AppEvent::Started {
            phase: Phase::Heating,
            profile_loaded: false,
        }]
    );
}

// ── Phase timer ───────────────────────────────────────────────

#[test]
fn heating_ends_exactly_at_heat_duration() {
    let mut rig = rig();
    rig.sink.clear();

    rig.tick(T0 + 4_999);
    assert_eq!(rig.ctl.phase(), Phase::Heating);
    assert!(rig.sink.events.is_empty());

    rig.tick(T0 + 5_000);
    assert_eq!(rig.ctl.phase(), Phase::Resting);
    assert_eq!(rig.hw.last_call(), Some(RelayLevel::DeEnergized));
    assert_eq!(
        rig.sink.events,
        vec![AppEvent::PhaseChanged {
            from: Phase::Heating,
            to: Phase::Resting,
        }]
    );
}

#[test]
fn cycle_alternates_resting_and_preserving() {
    let mut rig = rig();
    let mut now = T0 + 5_000;
    rig.tick(now);
    assert_eq!(rig.ctl.phase(), Phase::Resting);

    for _ in 0..5 {
        now += 2_000;
        rig.tick(now);
        assert_eq!(rig.ctl.phase(), Phase::Preserving);
        assert!(rig.hw.energized());

        now += 3_000;
        rig.tick(now);
        assert_eq!(rig.ctl.phase(), Phase::Resting);
        assert!(!rig.hw.energized());
    }
}

#[test]
fn at_most_one_transition_per_tick() {
    let mut rig = rig();
    rig.sink.clear();
    rig.tick(T0 + 1_000_000);
    assert_eq!(rig.ctl.phase(), Phase::Resting);
    assert_eq!(rig.sink.events.len(), 1);
}

// ── HF ────────────────────────────────────────────────────────

#[test]
fn hf_disable_releases_relay_and_keeps_phase() {
    let mut rig = rig();
    rig.send(b"<command=HF,enabled=false>", T0 + 100);

    assert!(!rig.ctl.is_enabled());
    assert_eq!(rig.ctl.phase(), Phase::Heating);
    assert_eq!(rig.hw.last_call(), Some(RelayLevel::DeEnergized));
    assert_eq!(rig.sink.last(), Some(&AppEvent::EnabledChanged(false)));

    // No transitions while disabled.
    rig.tick(T0 + 60_000);
    assert_eq!(rig.ctl.phase(), Phase::Heating);
    assert!(!rig.hw.energized());
}

#[test]
fn enable_resumes_with_stale_timestamp() {
    let mut rig = rig();
    rig.send(b"<command=HF,enabled=false>", T0 + 100);
    let relay_calls = rig.hw.calls.len();

    rig.send(b"<command=HF,enabled=true>", T0 + 200);
    assert!(rig.ctl.is_enabled());
    assert_eq!(rig.ctl.phase(), Phase::Heating);
    // Enabling does not touch the relay.
    assert_eq!(rig.hw.calls.len(), relay_calls);
    assert_eq!(rig.ctl.phase_entered_at_ms(), T0);

    // Heat ran out while disabled: the next tick moves on.
    rig.tick(T0 + 5_000);
    assert_eq!(rig.ctl.phase(), Phase::Resting);
}

#[test]
fn hf_phase_jumps_and_restarts_timer() {
    let mut rig = rig();
    rig.send(b"<command=HF,phase=preserve>", T0 + 700);

    assert_eq!(rig.ctl.phase(), Phase::Preserving);
    assert_eq!(rig.ctl.phase_entered_at_ms(), T0 + 700);
    assert_eq!(rig.hw.last_call(), Some(RelayLevel::Energized));
    assert_eq!(
        rig.sink.last(),
        Some(&AppEvent::PhaseChanged {
            from: Phase::Heating,
            to: Phase::Preserving,
        })
    );

    rig.tick(T0 + 700 + 2_999);
    assert_eq!(rig.ctl.phase(), Phase::Preserving);
    rig.tick(T0 + 700 + 3_000);
    assert_eq!(rig.ctl.phase(), Phase::Resting);
}

#[test]
fn hf_phase_rest_releases_relay() {
    let mut rig = rig();
    rig.send(b"<command=HF,phase=rest>", T0 + 10);
    assert_eq!(rig.ctl.phase(), Phase::Resting);
    assert_eq!(rig.hw.last_call(), Some(RelayLevel::DeEnergized));
}

#[test]
fn hf_phase_can_reenter_heating_by_command() {
    let mut rig = rig();
    rig.tick(T0 + 5_000);
    assert_eq!(rig.ctl.phase(), Phase::Resting);

    rig.send(b"<command=HF,phase=heat>", T0 + 5_100);
    assert_eq!(rig.ctl.phase(), Phase::Heating);
    assert!(rig.hw.energized());
}

#[test]
fn hf_pairs_apply_in_order() {
    let mut rig = rig();
    rig.send(b"<command=HF,enabled=false,enabled=true,phase=rest>", T0 + 10);
    assert!(rig.ctl.is_enabled());
    assert_eq!(rig.ctl.phase(), Phase::Resting);
}

#[test]
fn hf_phase_while_disabled_is_ignored() {
    let mut rig = rig();
    rig.send(b"<command=HF,enabled=false>", T0 + 10);
    rig.send(b"<command=HF,phase=preserve>", T0 + 20);
    assert_eq!(rig.ctl.phase(), Phase::Heating);
    assert!(!rig.hw.energized());
}

#[test]
fn hf_bad_keys_and_values_change_nothing() {
    let mut rig = rig();
    let relay_calls = rig.hw.calls.len();
    rig.sink.clear();

    rig.send(b"<command=HF,enabled=maybe,phase=boil,power=9,enabled>", T0 + 10);

    assert!(rig.ctl.is_enabled());
    assert_eq!(rig.ctl.phase(), Phase::Heating);
    assert_eq!(rig.hw.calls.len(), relay_calls);
    assert!(rig.sink.events.is_empty());
}

// ── PU ────────────────────────────────────────────────────────

#[test]
fn pu_updates_named_fields_only() {
    let mut rig = rig();
    rig.send(b"<command=PU,heat=1000,preserve=500>", T0 + 10);

    let p = rig.ctl.profile();
    assert_eq!(p.heat_ms, 1_000);
    assert_eq!(p.preserve_ms, 500);
    assert_eq!(p.rest_ms, 2_000);
    assert_eq!(p.id, 1);
    assert_eq!(rig.sink.last(), Some(&AppEvent::ProfileUpdated(p)));
}

#[test]
fn pu_last_write_wins() {
    let mut rig = rig();
    rig.send(b"<command=PU,rest=100,rest=250>", T0 + 10);
    assert_eq!(rig.ctl.profile().rest_ms, 250);
}

#[test]
fn pu_dangling_key_keeps_earlier_pairs() {
    let mut rig = rig();
    rig.send(b"<command=PU,heat=700,rest>", T0 + 10);
    assert_eq!(rig.ctl.profile().heat_ms, 700);
    assert_eq!(rig.ctl.profile().rest_ms, 2_000);
}

#[test]
fn pu_shortened_heat_applies_to_running_phase() {
    let mut rig = rig();
    rig.send(b"<command=PU,heat=1000>", T0 + 10);
    rig.tick(T0 + 1_000);
    assert_eq!(rig.ctl.phase(), Phase::Resting);
}

#[test]
fn pu_non_numeric_value_becomes_zero() {
    let mut rig = rig();
    rig.send(b"<command=PU,preserve=abc>", T0 + 10);
    assert_eq!(rig.ctl.profile().preserve_ms, 0);
}

// ── Queries ───────────────────────────────────────────────────

#[test]
fn debug_emits_snapshot_without_side_effects() {
    let mut rig = rig();
    let relay_calls = rig.hw.calls.len();
    rig.send(b"<command=debug>", T0 + 1_234);

    let Some(AppEvent::Snapshot(s)) = rig.sink.last() else {
        panic!("expected a snapshot, got {:?}", rig.sink.last());
    };
    assert!(s.enabled);
    assert_eq!(s.phase, Phase::Heating);
    assert_eq!(s.phase_elapsed_ms, 1_234);
    assert_eq!(s.profile, rig.ctl.profile());
    assert!(!s.storage_available);
    assert_eq!(rig.hw.calls.len(), relay_calls);
}

#[test]
fn check_enabled_reports_flag() {
    let mut rig = rig();
    rig.send(b"<command=check_enabled>", T0 + 1);
    assert_eq!(rig.sink.last(), Some(&AppEvent::EnabledReport(true)));

    rig.send(b"<command=HF,enabled=false>", T0 + 2);
    rig.send(b"<command=check_enabled>", T0 + 3);
    assert_eq!(rig.sink.last(), Some(&AppEvent::EnabledReport(false)));
}

// ── Malformed input ───────────────────────────────────────────

#[test]
fn unknown_and_foreign_frames_are_ignored() {
    let mut rig = rig();
    let relay_calls = rig.hw.calls.len();
    rig.sink.clear();

    for frame in [
        &b"<command=reboot,now=1>"[..],
        b"<command=>",
        b"<foo=bar>",
        b"<>",
        b"<\xff\xfe>",
    ] {
        rig.send(frame, T0 + 10);
    }

    assert!(rig.sink.events.is_empty());
    assert_eq!(rig.hw.calls.len(), relay_calls);
    assert_eq!(rig.ctl.profile(), thermocycle::profile::load_default());
}

#[test]
fn noise_around_frames_is_discarded() {
    let mut rig = rig();
    rig.serial.inject(b"garbage>>\r\n<command=PU,id=9>");

    // Every stray end byte ends a read cycle.
    rig.tick(T0 + 1);
    rig.tick(T0 + 2);
    assert_eq!(rig.ctl.profile().id, 1);

    rig.tick(T0 + 3);
    assert_eq!(rig.ctl.profile().id, 9);
}

#[test]
fn one_command_per_tick() {
    let mut rig = rig();
    rig.serial.inject(b"<command=PU,id=2><command=PU,id=3>");

    rig.tick(T0 + 1);
    assert_eq!(rig.ctl.profile().id, 2);
    assert!(rig.serial.pending() > 0);

    rig.tick(T0 + 2);
    assert_eq!(rig.ctl.profile().id, 3);
    assert_eq!(rig.serial.pending(), 0);
}

#[test]
fn split_frame_completes_on_later_tick() {
    let mut rig = rig();
    rig.send(b"<command=PU,", T0 + 1);
    assert_eq!(rig.ctl.profile().id, 1);
    rig.send(b"id=4>", T0 + 2);
    assert_eq!(rig.ctl.profile().id, 4);
}

#[test]
fn oversized_frame_is_truncated_not_fatal() {
    let mut rig = rig();
    let mut frame = b"<command=PU,heat=1234,".to_vec();
    frame.resize(200, b'x');
    frame.push(b'>');

    rig.send(&frame, T0 + 1);
    assert_eq!(rig.ctl.profile().heat_ms, 1_234);
}

#[test]
fn multibyte_character_cut_by_truncation_keeps_earlier_pairs() {
    let mut rig = rig();
    let mut frame = b"<command=PU,heat=1234,xy=".to_vec();
    frame.extend_from_slice("é".repeat(60).as_bytes());
    frame.push(b'>');

    rig.send(&frame, T0 + 1);
    assert_eq!(rig.ctl.profile().heat_ms, 1_234);
}

#[test]
fn invalid_byte_spoils_only_its_own_pair() {
    let mut rig = rig();
    rig.send(b"<command=PU,heat=1234,id=\xff,rest=300>", T0 + 1);

    let profile = rig.ctl.profile();
    assert_eq!(profile.heat_ms, 1_234);
    assert_eq!(profile.id, 0);
    assert_eq!(profile.rest_ms, 300);
}
