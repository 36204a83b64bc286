//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (which shares the command UART in production).  Each event is
//! rendered as one tagged line so the output can be grepped on the host.

use log::info;

use crate::app::events::{AppEvent, StateSnapshot};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// One-line rendering of a state dump.
pub fn format_snapshot(s: &StateSnapshot) -> String {
    format!(
        "enabled={} phase={} elapsed={}ms | id={} heat={}ms preserve={}ms rest={}ms | storage={}",
        s.enabled,
        s.phase,
        s.phase_elapsed_ms,
        s.profile.id,
        s.profile.heat_ms,
        s.profile.preserve_ms,
        s.profile.rest_ms,
        if s.storage_available { "OK" } else { "NONE" },
    )
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                phase,
                profile_loaded,
            } => {
                info!(
                    "START | phase={} | profile={}",
                    phase,
                    if *profile_loaded { "stored" } else { "default" }
                );
            }
            AppEvent::PhaseChanged { from, to } => {
                info!("PHASE | {} -> {}", from, to);
            }
            AppEvent::EnabledChanged(enabled) => {
                info!("HEATER | enabled={}", enabled);
            }
            AppEvent::ProfileUpdated(p) => {
                info!(
                    "PROFILE | id={} heat={}ms preserve={}ms rest={}ms",
                    p.id, p.heat_ms, p.preserve_ms, p.rest_ms
                );
            }
            AppEvent::ProfileSaved(p) => {
                info!("STORE | profile id={} saved", p.id);
            }
            AppEvent::DataFileRemoved => {
                info!("STORE | data file removed");
            }
            AppEvent::Snapshot(s) => {
                info!("DEBUG | {}", format_snapshot(s));
            }
            AppEvent::EnabledReport(enabled) => {
                info!("ENABLED | {}", enabled);
            }
        }
    }
}
