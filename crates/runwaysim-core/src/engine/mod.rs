//! Monte Carlo simulation engine.
//!
//! [`Simulator::run`] is the single entry point: it validates the input,
//! fills in category-inferred dependencies, fixes the execution order once,
//! then runs every trial sequentially off one seeded [`Mulberry32`] stream
//! and folds the outcomes into a [`SimulationResult`].
//!
//! The same input and config always produce the same result, bit for bit.

pub mod aggregate;
pub mod classify;
pub mod trial;

use std::time::Instant;

use crate::config::SimulationConfig;
use crate::domain::error::Result;
use crate::domain::input::SimulationInput;
use crate::domain::module::Role;
use crate::domain::result::SimulationResult;
use crate::graph::{infer_dependencies, topological_order};
use crate::metrics::METRICS;
use crate::obs;
use crate::rng::Mulberry32;

pub use aggregate::{Aggregator, FrequencyTable};
pub use classify::{classify_failure_mode, FailureMode};
pub use trial::{ModuleProfile, Trial, TrialEngine};

/// Runs simulations under a fixed [`SimulationConfig`].
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    /// Build a simulator, rejecting an inconsistent config.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run `input.trial_count` seeded trials and aggregate them.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Validation` when the input breaks an invariant
    /// (empty modules or team, zero trials, duplicate ids, ...). No trial is
    /// run in that case.
    pub fn run(&self, input: &SimulationInput) -> Result<SimulationResult> {
        input.validate()?;

        let _span = obs::SimulationSpan::enter(input.seed, input.trial_count);
        let started = Instant::now();
        obs::emit_simulation_started(
            input.modules.len(),
            input.team.len(),
            input.deadline_days,
            input.runway_months,
        );

        let modules = infer_dependencies(&input.modules, &self.config);
        if !input.modules.iter().any(|m| m.has_explicit_dependencies()) {
            let edges = modules.iter().map(|m| m.dependency_ids().len()).sum();
            obs::emit_dependencies_inferred(modules.len(), edges);
        }

        let order = topological_order(&modules);
        if order.skipped_back_edges() > 0 {
            obs::emit_cycle_skipped(order.skipped_back_edges());
            METRICS.add_cycles_broken(order.skipped_back_edges() as u64);
        }

        let engine = TrialEngine::new(
            &self.config,
            &order,
            &input.team,
            input.deadline_days,
            input.runway_months,
        );
        let primary_roles: Vec<Role> = engine.profiles().iter().map(|p| p.primary_role).collect();

        let mut rng = Mulberry32::new(input.seed);
        let mut aggregator = Aggregator::new(
            &input.team,
            input.deadline_days,
            engine.runway_days(),
            input.trial_count,
        );
        for _ in 0..input.trial_count {
            let trial = engine.run_trial(&mut rng);
            aggregator.record(&trial, engine.module_id(trial.bottleneck()), &primary_roles);
        }

        let trials = aggregator.trials_recorded();
        let result = aggregator.finish(&self.config);

        METRICS.inc_simulations();
        METRICS.add_trials(trials as u64);
        obs::emit_simulation_finished(
            started.elapsed(),
            trials,
            result.on_time_probability,
            result.p50_days,
            result.p90_days,
        );

        Ok(result)
    }
}

/// Run a simulation with the default model parameters.
pub fn run_simulation(input: &SimulationInput) -> Result<SimulationResult> {
    Simulator::default().run(input)
}
