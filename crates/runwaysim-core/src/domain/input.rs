//! Simulation input and caller-side normalization.
//!
//! [`SimulationRequest`] is the loose shape a scenario file or an upstream
//! service hands over: optional knobs, possibly out of range. Calling
//! [`SimulationRequest::normalize`] applies the intake defaults and bounds
//! and yields a [`SimulationInput`], which the engine validates once more
//! before running.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::module::{Module, TeamMember};

pub const MIN_TRIALS: u32 = 100;
pub const MAX_TRIALS: u32 = 2000;
pub const DEFAULT_TRIALS: u32 = 800;
pub const DEFAULT_SEED: u32 = 42;
pub const DEFAULT_DEADLINE_DAYS: u32 = 90;
pub const MIN_DEADLINE_DAYS: u32 = 7;
pub const DEFAULT_RUNWAY_MONTHS: u32 = 6;
pub const MIN_RUNWAY_MONTHS: u32 = 1;

/// Fully-specified, bounded simulation input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    pub modules: Vec<Module>,
    pub team: Vec<TeamMember>,
    pub deadline_days: u32,
    pub runway_months: u32,
    pub seed: u32,
    pub trial_count: u32,
}

impl SimulationInput {
    /// Check the invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptyModules` / `EmptyTeam`: nothing to simulate.
    /// - `ValidationError::ZeroTrials`: no trials requested.
    /// - `ValidationError::NonPositiveDeadline` / `NonPositiveRunway`.
    /// - `ValidationError::EmptyModuleId` / `DuplicateModuleId`: ids must be
    ///   non-empty and unique.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.modules.is_empty() {
            return Err(ValidationError::EmptyModules);
        }
        if self.team.is_empty() {
            return Err(ValidationError::EmptyTeam);
        }
        if self.trial_count == 0 {
            return Err(ValidationError::ZeroTrials);
        }
        if self.deadline_days == 0 {
            return Err(ValidationError::NonPositiveDeadline);
        }
        if self.runway_months == 0 {
            return Err(ValidationError::NonPositiveRunway);
        }

        let mut seen = HashSet::with_capacity(self.modules.len());
        for module in &self.modules {
            if module.id.trim().is_empty() {
                return Err(ValidationError::EmptyModuleId);
            }
            if !seen.insert(module.id.as_str()) {
                return Err(ValidationError::DuplicateModuleId {
                    id: module.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Loose scenario description as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub team: Vec<TeamMember>,
    #[serde(default)]
    pub deadline_days: Option<u32>,
    #[serde(default)]
    pub runway_months: Option<u32>,
    #[serde(default)]
    pub seed: Option<i64>,
    #[serde(default)]
    pub trial_count: Option<u32>,
}

impl SimulationRequest {
    /// Apply intake defaults and bounds.
    ///
    /// - trial count: default 800 (also for 0), clamped to `[100, 2000]`
    /// - seed: wrapped to 32 bits, default 42 (also when it wraps to 0)
    /// - deadline: default 90 (also for 0), at least 7 days
    /// - runway: default 6 (also for 0), at least 1 month
    pub fn normalize(self) -> SimulationInput {
        let trial_count = match self.trial_count {
            Some(n) if n > 0 => n.clamp(MIN_TRIALS, MAX_TRIALS),
            _ => DEFAULT_TRIALS,
        };
        let seed = match self.seed.map(|s| s as u32) {
            Some(s) if s != 0 => s,
            _ => DEFAULT_SEED,
        };
        let deadline_days = match self.deadline_days {
            Some(d) if d > 0 => d.max(MIN_DEADLINE_DAYS),
            _ => DEFAULT_DEADLINE_DAYS,
        };
        let runway_months = match self.runway_months {
            Some(m) if m > 0 => m.max(MIN_RUNWAY_MONTHS),
            _ => DEFAULT_RUNWAY_MONTHS,
        };

        SimulationInput {
            modules: self.modules,
            team: self.team,
            deadline_days,
            runway_months,
            seed,
            trial_count,
        }
    }
}
