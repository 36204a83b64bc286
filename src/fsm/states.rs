//! Concrete phase handler functions and table builder.
//!
//! Each phase is one row: a name, the relay level it drives on entry, and
//! a plain `fn` pointer that decides the next phase from elapsed time.
//!
//! ```text
//!  HEATING ──[heat elapsed]──▶ RESTING ──[rest elapsed]──▶ PRESERVING
//!                                 ▲                             │
//!                                 └─────[preserve elapsed]──────┘
//! ```
//!
//! Heating is one-shot: no handler ever returns it.  It is only entered
//! at startup or by an explicit `phase=heat` command.

use super::context::{PhaseContext, RelayLevel};
use super::{Phase, PhaseDescriptor};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static phase table.  Called once at startup.
pub fn build_phase_table() -> [PhaseDescriptor; Phase::COUNT] {
    [
        // Index 0 — Heating
        PhaseDescriptor {
            id: Phase::Heating,
            name: "Heating",
            relay: RelayLevel::Energized,
            on_update: heating_update,
        },
        // Index 1 — Preserving
        PhaseDescriptor {
            id: Phase::Preserving,
            name: "Preserving",
            relay: RelayLevel::Energized,
            on_update: preserving_update,
        },
        // Index 2 — Resting
        PhaseDescriptor {
            id: Phase::Resting,
            name: "Resting",
            relay: RelayLevel::DeEnergized,
            on_update: resting_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Handlers
// ═══════════════════════════════════════════════════════════════════════════

fn heating_update(ctx: &PhaseContext) -> Option<Phase> {
    ctx.has_elapsed(ctx.heat_ms).then_some(Phase::Resting)
}

fn preserving_update(ctx: &PhaseContext) -> Option<Phase> {
    ctx.has_elapsed(ctx.preserve_ms).then_some(Phase::Resting)
}

fn resting_update(ctx: &PhaseContext) -> Option<Phase> {
    ctx.has_elapsed(ctx.rest_ms).then_some(Phase::Preserving)
}
