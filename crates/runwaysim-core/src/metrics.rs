//! Global atomic counters for runwaysim observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single `tracing::info!`
//! event (e.g. at the end of a CLI invocation).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters.
pub struct Metrics {
    simulations_run: AtomicU64,
    trials_executed: AtomicU64,
    cycles_broken: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            simulations_run: AtomicU64::new(0),
            trials_executed: AtomicU64::new(0),
            cycles_broken: AtomicU64::new(0),
        }
    }

    pub fn inc_simulations(&self) {
        self.simulations_run.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "simulations_run", "counter incremented");
    }

    /// Add a batch of executed trials.
    pub fn add_trials(&self, n: u64) {
        self.trials_executed.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "trials_executed", n, "counter incremented");
    }

    /// Add back-edges dropped while ordering a dependency graph.
    pub fn add_cycles_broken(&self, n: u64) {
        if n == 0 {
            return;
        }
        self.cycles_broken.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "cycles_broken", n, "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            simulations_run = self.simulations_run(),
            trials_executed = self.trials_executed(),
            cycles_broken = self.cycles_broken(),
        );
    }

    pub fn simulations_run(&self) -> u64 {
        self.simulations_run.load(Ordering::Relaxed)
    }

    pub fn trials_executed(&self) -> u64 {
        self.trials_executed.load(Ordering::Relaxed)
    }

    pub fn cycles_broken(&self) -> u64 {
        self.cycles_broken.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.simulations_run.store(0, Ordering::Relaxed);
        self.trials_executed.store(0, Ordering::Relaxed);
        self.cycles_broken.store(0, Ordering::Relaxed);
    }
}
