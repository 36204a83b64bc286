//! Controller — the hexagonal core.
//!
//! [`Controller`] owns the [`SystemState`] and the serial [`Framer`].  It
//! turns framed commands into state changes and drives the relay, storage
//! and event sink through port traits injected at call sites, so the whole
//! service is testable with mock adapters.
//!
//! ```text
//!  ByteSource ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │        Controller        │
//!  RelayPort  ◀── │ Framer · Parser · Phases │ ◀─▶ FileStoragePort
//!                 └──────────────────────────┘
//! ```
//!
//! Nothing in here returns an error to the caller: protocol and storage
//! failures are logged and the relay keeps cycling.

use std::borrow::Cow;

use log::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::error::{self, ProtocolError};
use crate::fsm::Phase;
use crate::profile::{self, Profile};
use crate::protocol::framer::Framer;
use crate::protocol::parser::{Token, pairs, parse_message};
use crate::protocol::transport::ByteSource;

use super::commands::{Command, CommandOrigin, ENABLED_KEY, PHASE_KEY};
use super::events::{AppEvent, StateSnapshot};
use super::ports::{EventSink, FileStoragePort, RelayPort};
use super::state::SystemState;

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

/// Composes framer, parser, profile store and phase machine.
pub struct Controller {
    state: SystemState,
    framer: Framer,
    /// Persisted profile file on the card.
    data_file_name: String,
}

impl Controller {
    /// Construct the controller: enabled, Heating since `now_ms`, default
    /// profile.
    ///
    /// Does **not** touch hardware — call [`start`](Self::start) next.
    pub fn new(config: &ControllerConfig, storage_available: bool, now_ms: u64) -> Self {
        Self {
            state: SystemState::new(storage_available, now_ms),
            framer: Framer::new(),
            data_file_name: config.data_file_name.clone(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Load the persisted profile (if any), then enter Heating.
    pub fn start(
        &mut self,
        hw: &mut impl RelayPort,
        storage: &mut impl FileStoragePort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        let profile_loaded = self.load_persisted_profile(hw, storage, sink, now_ms);

        let relay = self.state.machine.enter_phase(Phase::Heating, now_ms);
        hw.set_output(relay);

        let phase = self.state.machine.phase();
        sink.emit(&AppEvent::Started {
            phase,
            profile_loaded,
        });
        info!(
            "Controller started in {} (profile id={}, storage {})",
            phase,
            self.state.profile.id,
            if self.state.storage_available() {
                "available"
            } else {
                "unavailable"
            }
        );
    }

    /// Replay the stored record as a startup-origin profile update.
    /// Returns `true` if a valid record was applied.
    fn load_persisted_profile(
        &mut self,
        hw: &mut impl RelayPort,
        storage: &mut impl FileStoragePort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) -> bool {
        if !self.state.storage_available() {
            info!("Profile: storage unavailable, using defaults");
            return false;
        }
        if !storage.exists(&self.data_file_name) {
            info!("Profile: no {} on card, using defaults", self.data_file_name);
            return false;
        }
        let payload = match self.read_stored_payload(storage) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Profile: {} rejected ({}), using defaults", self.data_file_name, e);
                return false;
            }
        };
        self.handle_command(
            Command::ProfileUpdate(&payload),
            CommandOrigin::Startup,
            hw,
            storage,
            sink,
            now_ms,
        );
        true
    }

    /// The stored record body, marker checked and stripped.
    fn read_stored_payload(&self, storage: &impl FileStoragePort) -> error::Result<String> {
        let bytes = profile::read_record(storage, &self.data_file_name)?;
        Ok(profile::record_payload(&bytes)?.to_owned())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: frame input → dispatch at most one
    /// command → evaluate the phase timer once.
    pub fn tick(
        &mut self,
        serial: &mut impl ByteSource,
        hw: &mut impl RelayPort,
        storage: &mut impl FileStoragePort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        // 1. Framing
        if self.framer.poll(serial) {
            let frame = self.framer.copy_message();
            self.framer.reset();

            // 2. Dispatch.  Invalid bytes (line noise, or a multi-byte
            // character split by truncation) only spoil the pair they sit in.
            let message = String::from_utf8_lossy(&frame);
            if matches!(message, Cow::Owned(_)) {
                debug!("Frame {:?}: {}", message, ProtocolError::NotUtf8);
            }
            self.dispatch_message(
                &message,
                CommandOrigin::External,
                hw,
                storage,
                sink,
                now_ms,
            );
        }

        // 3. Phase timer
        if let Some(t) = self.state.machine.tick(&self.state.profile, now_ms) {
            hw.set_output(t.relay);
            sink.emit(&AppEvent::PhaseChanged {
                from: t.from,
                to: t.to,
            });
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Parse a framed message and dispatch it.  Non-command frames and
    /// unknown command types are logged and dropped.
    pub fn dispatch_message(
        &mut self,
        message: &str,
        origin: CommandOrigin,
        hw: &mut impl RelayPort,
        storage: &mut impl FileStoragePort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        let Some(parsed) = parse_message(message) else {
            debug!("Ignoring frame {:?}: {}", message, ProtocolError::NotACommand);
            return;
        };
        match Command::from_message(parsed) {
            Ok(cmd) => self.handle_command(cmd, origin, hw, storage, sink, now_ms),
            Err(e) => warn!("Message type {:?} dropped: {}", parsed.command_type, e),
        }
    }

    /// Execute a decoded command.
    pub fn handle_command(
        &mut self,
        cmd: Command<'_>,
        origin: CommandOrigin,
        hw: &mut impl RelayPort,
        storage: &mut impl FileStoragePort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        debug!("Command {} ({:?})", cmd.name(), origin);
        match cmd {
            Command::HeaterFunction(payload) => self.heater_function(payload, hw, sink, now_ms),
            Command::ProfileUpdate(payload) => self.profile_update(payload, origin, storage, sink),
            Command::Debug => sink.emit(&AppEvent::Snapshot(self.snapshot(now_ms))),
            Command::CheckEnabled => {
                sink.emit(&AppEvent::EnabledReport(self.state.machine.is_enabled()));
            }
            Command::RemoveDataFile => self.remove_data_file(storage, sink),
        }
    }

    fn heater_function(
        &mut self,
        payload: &str,
        hw: &mut impl RelayPort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        for token in pairs(payload) {
            match token {
                Token::Pair {
                    key: ENABLED_KEY,
                    value,
                } => match value {
                    "true" => self.enable(sink),
                    "false" => self.disable(hw, sink),
                    other => warn!("HF enabled={:?}: {}", other, ProtocolError::InvalidValue),
                },
                Token::Pair {
                    key: PHASE_KEY,
                    value,
                } => match Phase::from_token(value) {
                    Some(phase) => {
                        self.enter_phase(phase, hw, sink, now_ms);
                    }
                    None => warn!("HF phase={:?}: {}", value, ProtocolError::InvalidValue),
                },
                Token::Pair { key, .. } => warn!("HF {:?}: {}", key, ProtocolError::UnknownKey),
                Token::Dangling(key) => warn!("HF {:?}: {}", key, ProtocolError::DanglingKey),
            }
        }
    }

    fn profile_update(
        &mut self,
        payload: &str,
        origin: CommandOrigin,
        storage: &mut impl FileStoragePort,
        sink: &mut impl EventSink,
    ) {
        let before = self.state.profile;
        for token in pairs(payload) {
            match token {
                Token::Pair { key, value } => {
                    self.state.profile = profile::apply_field(self.state.profile, key, value);
                }
                Token::Dangling(key) => warn!("PU {:?}: {}", key, ProtocolError::DanglingKey),
            }
        }
        if self.state.profile != before {
            sink.emit(&AppEvent::ProfileUpdated(self.state.profile));
        }
        if origin == CommandOrigin::External {
            self.persist_profile(storage, sink);
        }
    }

    // ── Phase control ─────────────────────────────────────────

    /// Jump straight to `phase`, bypassing the timer.
    ///
    /// Rejected while disabled: phases only change while the cycle runs.
    /// Returns `true` if the phase was entered.
    pub fn enter_phase(
        &mut self,
        phase: Phase,
        hw: &mut impl RelayPort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) -> bool {
        if !self.state.machine.is_enabled() {
            warn!("Phase {} ignored: controller is disabled", phase);
            return false;
        }
        let from = self.state.machine.phase();
        let relay = self.state.machine.enter_phase(phase, now_ms);
        hw.set_output(relay);
        sink.emit(&AppEvent::PhaseChanged { from, to: phase });
        true
    }

    /// Resume the cycle.  The relay is left alone until the next transition.
    pub fn enable(&mut self, sink: &mut impl EventSink) {
        self.state.machine.enable();
        info!("Controller enabled");
        sink.emit(&AppEvent::EnabledChanged(true));
    }

    /// Stop the cycle and release the relay.  The phase is kept.
    pub fn disable(&mut self, hw: &mut impl RelayPort, sink: &mut impl EventSink) {
        let relay = self.state.machine.disable();
        hw.set_output(relay);
        info!("Controller disabled");
        sink.emit(&AppEvent::EnabledChanged(false));
    }

    // ── Persistence ───────────────────────────────────────────

    fn persist_profile(&mut self, storage: &mut impl FileStoragePort, sink: &mut impl EventSink) {
        if !self.state.storage_available() {
            debug!("Profile not persisted: storage unavailable");
            return;
        }
        match profile::save(storage, &self.data_file_name, &self.state.profile) {
            Ok(()) => sink.emit(&AppEvent::ProfileSaved(self.state.profile)),
            Err(e) => warn!("Profile persist failed ({}), keeping in-memory profile", e),
        }
    }

    fn remove_data_file(&mut self, storage: &mut impl FileStoragePort, sink: &mut impl EventSink) {
        if !self.state.storage_available() {
            warn!("Cannot remove {}: storage unavailable", self.data_file_name);
            return;
        }
        match storage.remove(&self.data_file_name) {
            Ok(()) => {
                info!("Removed {}", self.data_file_name);
                sink.emit(&AppEvent::DataFileRemoved);
            }
            Err(e) => warn!("Removing {} failed: {}", self.data_file_name, e),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.machine.phase()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.machine.is_enabled()
    }

    /// The active in-memory profile.
    pub fn profile(&self) -> Profile {
        self.state.profile
    }

    pub fn storage_available(&self) -> bool {
        self.state.storage_available()
    }

    /// Monotonic timestamp of the last phase entry.
    pub fn phase_entered_at_ms(&self) -> u64 {
        self.state.machine.entered_at_ms()
    }

    pub fn snapshot(&self, now_ms: u64) -> StateSnapshot {
        self.state.snapshot(now_ms)
    }
}
