//! Engine configuration.
//!
//! Every constant the trial engine consults lives here: staffing tables,
//! category precedence, and the weights of each risk dimension. The
//! [`Default`] values are the calibrated model; a JSON file may override
//! any subset of fields.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::error::{Result, SimError};
use crate::domain::module::{Category, Level, Role};

/// Precedence assigned to a category missing from the table.
const UNKNOWN_PRECEDENCE: u8 = 99;

/// Fallback preferred roles for a category missing from the table.
const FALLBACK_ROLES: &[Role] = &[Role::Backend];

/// Speed multiplier per seniority level (lower is faster).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelMultipliers {
    pub junior: f64,
    pub mid: f64,
    pub senior: f64,
}

impl Default for LevelMultipliers {
    fn default() -> Self {
        Self {
            junior: 1.35,
            mid: 1.0,
            senior: 0.78,
        }
    }
}

impl LevelMultipliers {
    pub fn get(&self, level: Level) -> f64 {
        match level {
            Level::Junior => self.junior,
            Level::Mid => self.mid,
            Level::Senior => self.senior,
        }
    }
}

/// Weight of each risk dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    /// Baseline noise, scaled by [`SimulationConfig::execution_variance_scale`].
    pub execution_variance: f64,
    /// Scope growth, scaled by [`SimulationConfig::scope_creep_amplitude`].
    pub scope_creep: f64,
    /// Per-dependency delay, scaled by [`SimulationConfig::vendor_delay_max_days`].
    pub vendor_delay: f64,
    /// Late-stage compression once runway pressure kicks in.
    pub runway_exhaustion: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            execution_variance: 0.20,
            scope_creep: 0.15,
            vendor_delay: 0.12,
            runway_exhaustion: 0.10,
        }
    }
}

/// Tunable constants for one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Base days per complexity point.
    pub base_days_per_complexity: f64,
    pub level_multipliers: LevelMultipliers,
    /// Level multiplier applied when nobody on the team can take a module.
    pub unstaffed_multiplier: f64,
    /// Roles able to work on each category; the first entry is the primary
    /// role that accrues workload.
    pub category_roles: BTreeMap<Category, Vec<Role>>,
    /// Tier used for dependency inference; lower tiers come first.
    pub category_precedence: BTreeMap<Category, u8>,
    pub std_dev_ratio: f64,
    pub std_dev_floor: f64,
    pub execution_variance_scale: f64,
    pub scope_creep_base_probability: f64,
    pub scope_creep_per_uncertainty: f64,
    pub scope_creep_amplitude: f64,
    pub vendor_delay_probability: f64,
    pub vendor_delay_max_days: f64,
    /// Risk-driver tags that can amplify a module's duration.
    pub high_risk_drivers: Vec<String>,
    pub risk_driver_probability: f64,
    pub risk_driver_step: f64,
    /// Lower clamp bound as a fraction of base duration.
    pub min_duration_ratio: f64,
    /// Upper clamp bound as a multiple of base duration.
    pub max_duration_ratio: f64,
    /// Share of runway beyond which late-stage compression applies.
    pub runway_pressure_threshold: f64,
    pub days_per_runway_month: f64,
    /// Capacity denominator for roles nobody on the team holds.
    pub unstaffed_role_capacity: f64,
    /// Length of the bottleneck and failure-mode tables.
    pub top_k: usize,
    pub risk_weights: RiskWeights,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let category_roles = BTreeMap::from([
            (Category::Frontend, vec![Role::Frontend]),
            (Category::Backend, vec![Role::Backend]),
            (Category::Data, vec![Role::Data, Role::Backend]),
            (Category::Infra, vec![Role::Infra, Role::Backend]),
            (Category::Business, vec![Role::Business]),
            (Category::Legal, vec![Role::Legal, Role::Business]),
        ]);
        let category_precedence = BTreeMap::from([
            (Category::Legal, 0),
            (Category::Infra, 1),
            (Category::Backend, 2),
            (Category::Data, 3),
            (Category::Frontend, 4),
            (Category::Business, 5),
        ]);

        Self {
            base_days_per_complexity: 8.0,
            level_multipliers: LevelMultipliers::default(),
            unstaffed_multiplier: 1.2,
            category_roles,
            category_precedence,
            std_dev_ratio: 0.15,
            std_dev_floor: 0.5,
            execution_variance_scale: 10.0,
            scope_creep_base_probability: 0.05,
            scope_creep_per_uncertainty: 0.08,
            scope_creep_amplitude: 4.0,
            vendor_delay_probability: 0.25,
            vendor_delay_max_days: 10.0,
            high_risk_drivers: ["compliance", "security", "unknown_requirements", "integration"]
                .into_iter()
                .map(String::from)
                .collect(),
            risk_driver_probability: 0.3,
            risk_driver_step: 0.12,
            min_duration_ratio: 0.4,
            max_duration_ratio: 5.0,
            runway_pressure_threshold: 0.8,
            days_per_runway_month: 30.0,
            unstaffed_role_capacity: 0.5,
            top_k: 5,
            risk_weights: RiskWeights::default(),
        }
    }
}

impl SimulationConfig {
    /// Load a config from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would make the model meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(SimError::InvalidConfig("top_k must be positive".into()));
        }
        if !is_positive(self.base_days_per_complexity) {
            return Err(SimError::InvalidConfig(
                "base_days_per_complexity must be positive".into(),
            ));
        }
        if !is_positive(self.days_per_runway_month) {
            return Err(SimError::InvalidConfig(
                "days_per_runway_month must be positive".into(),
            ));
        }
        if !is_positive(self.unstaffed_role_capacity) {
            return Err(SimError::InvalidConfig(
                "unstaffed_role_capacity must be positive".into(),
            ));
        }
        if self.min_duration_ratio > self.max_duration_ratio {
            return Err(SimError::InvalidConfig(format!(
                "min_duration_ratio {} exceeds max_duration_ratio {}",
                self.min_duration_ratio, self.max_duration_ratio
            )));
        }
        if self.category_roles.values().any(Vec::is_empty) {
            return Err(SimError::InvalidConfig(
                "every category needs at least one preferred role".into(),
            ));
        }
        Ok(())
    }

    /// Roles able to work on `category`, primary role first.
    pub fn preferred_roles(&self, category: Category) -> &[Role] {
        self.category_roles
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(FALLBACK_ROLES)
    }

    /// Role that accrues the workload of a `category` module.
    pub fn primary_role(&self, category: Category) -> Role {
        self.preferred_roles(category)
            .first()
            .copied()
            .unwrap_or(Role::Backend)
    }

    pub fn precedence(&self, category: Category) -> u8 {
        self.category_precedence
            .get(&category)
            .copied()
            .unwrap_or(UNKNOWN_PRECEDENCE)
    }

    pub fn is_high_risk(&self, driver: &str) -> bool {
        self.high_risk_drivers.iter().any(|d| d == driver)
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
