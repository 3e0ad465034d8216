//! Persistable record of one simulation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::digest::compute_digest;
use crate::domain::error::Result;
use crate::domain::input::SimulationInput;
use crate::domain::result::SimulationResult;

/// A completed simulation together with the input that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationRun {
    /// Unique identifier for this run.
    pub run_id: Uuid,

    /// When the run was recorded.
    pub created_at: DateTime<Utc>,

    /// SHA-256 of the canonical JSON of `input`.
    pub input_digest: String,

    pub input: SimulationInput,

    pub result: SimulationResult,
}

impl SimulationRun {
    /// Record a run. Fails only if the input cannot be canonicalized.
    pub fn new(input: SimulationInput, result: SimulationResult) -> Result<Self> {
        let input_digest = compute_digest(&input)?;
        Ok(Self {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            input_digest,
            input,
            result,
        })
    }

    /// File name used when the run is written to disk.
    pub fn file_name(&self) -> String {
        format!("run-{}.json", self.run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::module::{Category, Level, Module, Role, TeamMember};
    use crate::engine::run_simulation;

    fn input(seed: u32) -> SimulationInput {
        SimulationInput {
            modules: vec![Module::new("M1", Category::Backend, 3, 1)],
            team: vec![TeamMember::new("a", Role::Backend, Level::Mid)],
            deadline_days: 90,
            runway_months: 6,
            seed,
            trial_count: 100,
        }
    }

    #[test]
    fn test_identical_inputs_share_digest() {
        let a = input(42);
        let b = input(42);
        let ra = SimulationRun::new(a.clone(), run_simulation(&a).expect("run")).expect("record");
        let rb = SimulationRun::new(b.clone(), run_simulation(&b).expect("run")).expect("record");
        assert_eq!(ra.input_digest, rb.input_digest);
        assert_ne!(ra.run_id, rb.run_id);
    }

    #[test]
    fn test_different_seed_changes_digest() {
        let a = input(1);
        let b = input(2);
        let ra = SimulationRun::new(a.clone(), run_simulation(&a).expect("run")).expect("record");
        let rb = SimulationRun::new(b.clone(), run_simulation(&b).expect("run")).expect("record");
        assert_ne!(ra.input_digest, rb.input_digest);
    }

    #[test]
    fn test_serde_roundtrip() {
        let i = input(7);
        let run = SimulationRun::new(i.clone(), run_simulation(&i).expect("run")).expect("record");
        let json = serde_json::to_string(&run).expect("serialize");
        let back: SimulationRun = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.run_id, run.run_id);
        assert_eq!(back.input, run.input);
        assert_eq!(back.input_digest, run.input_digest);
        assert_eq!(back.result.finish_days, run.result.finish_days);
        assert!(run.file_name().starts_with("run-"));
    }
}
