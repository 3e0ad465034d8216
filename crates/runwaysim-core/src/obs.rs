//! Structured observability hooks for the simulation lifecycle.
//!
//! This module provides:
//! - A simulation-scoped tracing span via the `SimulationSpan` RAII guard
//! - Emission functions for key lifecycle events: start, dependency
//!   inference, broken cycles, finish
//!
//! Events are emitted at `info!` level unless noted. Set `RUST_LOG` to
//! adjust verbosity.

use std::time::Duration;

use tracing::{debug, info, warn};

/// RAII guard that enters a simulation-scoped span for its lifetime.
///
/// # Example
///
/// ```ignore
/// let _span = SimulationSpan::enter(42, 800);
/// // every event below is tagged with seed = 42, trials = 800
/// ```
pub struct SimulationSpan {
    _span: tracing::span::EnteredSpan,
}

impl SimulationSpan {
    pub fn enter(seed: u32, trials: u32) -> Self {
        let span = tracing::info_span!("runwaysim.simulation", seed, trials);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: simulation started.
pub fn emit_simulation_started(modules: usize, team: usize, deadline_days: u32, runway_months: u32) {
    info!(
        event = "simulation.started",
        modules,
        team,
        deadline_days,
        runway_months,
    );
}

/// Emit event: dependencies were inferred from categories.
pub fn emit_dependencies_inferred(modules: usize, edges: usize) {
    debug!(event = "dependencies.inferred", modules, edges);
}

/// Emit event: back-edges dropped while ordering (warning level).
pub fn emit_cycle_skipped(back_edges: usize) {
    warn!(event = "dependencies.cycle_skipped", back_edges);
}

/// Emit event: simulation finished with headline numbers.
pub fn emit_simulation_finished(
    elapsed: Duration,
    trials: usize,
    on_time_probability: f64,
    p50_days: u32,
    p90_days: u32,
) {
    info!(
        event = "simulation.finished",
        duration_ms = duration_ms(elapsed),
        trials,
        on_time_probability,
        p50_days,
        p90_days,
    );
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
