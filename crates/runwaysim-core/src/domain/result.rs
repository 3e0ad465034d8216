//! Aggregated simulation output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::module::Role;

/// One entry of a frequency table, ordered most frequent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCount {
    pub key: String,
    pub count: u32,
}

impl RankedCount {
    pub fn new(key: impl Into<String>, count: u32) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

/// Outcome of a full Monte Carlo run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Share of trials finishing on or before the deadline (4 decimals).
    pub on_time_probability: f64,
    /// Share of trials finishing within the runway (4 decimals).
    pub within_runway_probability: f64,
    pub p50_days: u32,
    pub p90_days: u32,
    /// Mean finish day (1 decimal).
    pub mean_days: f64,
    /// Finish day of every trial, in trial order.
    pub finish_days: Vec<u32>,
    pub top_bottlenecks: Vec<RankedCount>,
    pub top_failure_modes: Vec<RankedCount>,
    /// Average workload over capacity per role (3 decimals); above 1.0 means
    /// the role is over-allocated before the deadline.
    pub role_overload: BTreeMap<Role, f64>,
}

impl SimulationResult {
    pub fn trial_count(&self) -> usize {
        self.finish_days.len()
    }

    /// Most frequent bottleneck module id, if any trial ran.
    pub fn top_bottleneck(&self) -> Option<&str> {
        self.top_bottlenecks.first().map(|r| r.key.as_str())
    }

    /// Role with the highest overload ratio. Ties go to the first role in
    /// enum order.
    pub fn most_overloaded_role(&self) -> Option<(Role, f64)> {
        self.role_overload
            .iter()
            .fold(None, |best: Option<(Role, f64)>, (role, ratio)| match best {
                Some((_, b)) if b >= *ratio => best,
                _ => Some((*role, *ratio)),
            })
    }
}
