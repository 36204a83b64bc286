//! Table-driven phase machine.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  PhaseTable                                          │
//! │  ┌────────────┬─────────────┬──────────────────────┐ │
//! │  │ Phase      │ relay       │ on_update            │ │
//! │  ├────────────┼─────────────┼──────────────────────┤ │
//! │  │ Heating    │ Energized   │ fn(ctx)->Option<>    │ │
//! │  │ Preserving │ Energized   │ fn(ctx)->Option<>    │ │
//! │  │ Resting    │ DeEnergized │ fn(ctx)->Option<>    │ │
//! │  └────────────┴─────────────┴──────────────────────┘ │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick (while enabled) the engine calls `on_update` for the
//! **current** phase with the time spent in it.  If the handler returns
//! `Some(next)`, the engine enters `next`: it swaps the current pointer,
//! restamps the entry time and hands back the relay level for the caller
//! to apply.  The machine never touches hardware itself.

pub mod context;
pub mod states;

use context::{PhaseContext, RelayLevel};
use log::info;

use crate::profile::Profile;

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// The three timed operating phases.
/// Must stay in sync with the table built in [`states::build_phase_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    Heating = 0,
    Preserving = 1,
    Resting = 2,
}

impl Phase {
    /// Total number of phases — used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert a table index back to `Phase`.
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(Self::Heating),
            1 => Some(Self::Preserving),
            2 => Some(Self::Resting),
            _ => None,
        }
    }

    /// Parse the wire name used by `phase=<token>` (`heat`, `preserve`, `rest`).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "heat" => Some(Self::Heating),
            "preserve" => Some(Self::Preserving),
            "rest" => Some(Self::Resting),
            _ => None,
        }
    }

    /// Wire name of this phase.
    pub fn token(self) -> &'static str {
        match self {
            Self::Heating => "heat",
            Self::Preserving => "preserve",
            Self::Resting => "rest",
        }
    }
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

// ---------------------------------------------------------------------------
// Phase descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type PhaseUpdateFn = fn(&PhaseContext) -> Option<Phase>;

/// Static descriptor for a single phase.
pub struct PhaseDescriptor {
    pub id: Phase,
    pub name: &'static str,
    /// Relay level driven on entry.
    pub relay: RelayLevel,
    pub on_update: PhaseUpdateFn,
}

/// A transition the machine performed, with the relay level to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    pub relay: RelayLevel,
}

// ---------------------------------------------------------------------------
// Phase machine
// ---------------------------------------------------------------------------

/// Owns the current phase, the enable flag and the phase entry timestamp.
pub struct PhaseMachine {
    /// Fixed-size table indexed by `Phase as usize`.
    table: [PhaseDescriptor; Phase::COUNT],
    current: Phase,
    enabled: bool,
    /// Monotonic time (ms) at which `current` was entered.
    entered_at_ms: u64,
}

impl PhaseMachine {
    /// Construct an enabled machine sitting in `initial`, entered at `now_ms`.
    ///
    /// No relay level is produced here; the owner calls [`enter_phase`]
    /// when it is ready to drive hardware.
    ///
    /// [`enter_phase`]: Self::enter_phase
    pub fn new(table: [PhaseDescriptor; Phase::COUNT], initial: Phase, now_ms: u64) -> Self {
        Self {
            table,
            current: initial,
            enabled: true,
            entered_at_ms: now_ms,
        }
    }

    /// Enter `phase` now and return the relay level it requires.
    ///
    /// Re-entering the current phase restarts its timer.
    pub fn enter_phase(&mut self, phase: Phase, now_ms: u64) -> RelayLevel {
        let row = &self.table[phase as usize];
        info!(
            "Phase enter: {} -> {}",
            self.table[self.current as usize].name, row.name
        );
        self.current = phase;
        self.entered_at_ms = now_ms;
        row.relay
    }

    /// Evaluate the current phase's timer once.
    ///
    /// Does nothing while disabled.  At most one transition per call.
    pub fn tick(&mut self, profile: &Profile, now_ms: u64) -> Option<Transition> {
        if !self.enabled {
            return None;
        }
        let ctx = PhaseContext::new(self.elapsed_ms(now_ms), profile);
        let next = (self.table[self.current as usize].on_update)(&ctx)?;
        let from = self.current;
        let relay = self.enter_phase(next, now_ms);
        Some(Transition {
            from,
            to: next,
            relay,
        })
    }

    /// Stop the cycle.  The phase is kept; the returned level (always
    /// de-energized) must be applied by the caller.
    pub fn disable(&mut self) -> RelayLevel {
        self.enabled = false;
        RelayLevel::DeEnergized
    }

    /// Resume the cycle.  No side effects: the relay stays as it is until
    /// the next transition, and time spent disabled counts toward it.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.current
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Monotonic timestamp (ms) of the last phase entry.
    pub fn entered_at_ms(&self) -> u64 {
        self.entered_at_ms
    }

    /// Milliseconds spent in the current phase as of `now_ms`.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.entered_at_ms)
    }

    /// Relay level the current phase requires.
    pub fn phase_relay(&self) -> RelayLevel {
        self.table[self.current as usize].relay
    }
}
