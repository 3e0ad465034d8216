//! runwaysim core library
//!
//! Seeded Monte Carlo simulation of a project's execution: given a module
//! decomposition, a team roster, a deadline and a funding runway, estimate
//! the finish-date distribution, the likely bottlenecks and failure modes,
//! and per-role overload.
//!
//! ```ignore
//! use runwaysim_core::{run_simulation, SimulationRequest};
//!
//! let input = request.normalize();
//! let result = run_simulation(&input)?;
//! println!("p90 = {} days", result.p90_days);
//! ```

pub mod config;
pub mod domain;
pub mod engine;
pub mod graph;
pub mod metrics;
pub mod obs;
pub mod reporting;
pub mod rng;
pub mod run;
pub mod telemetry;

pub use config::{LevelMultipliers, RiskWeights, SimulationConfig};

pub use domain::{
    Category, Level, Module, RankedCount, Result, Role, SimError, SimulationInput,
    SimulationRequest, SimulationResult, TeamMember, ValidationError,
};

pub use engine::{classify_failure_mode, run_simulation, FailureMode, Simulator};

pub use graph::{critical_path, infer_dependencies, topological_order, CriticalPath, ExecutionOrder};

pub use reporting::{
    finish_histogram, read_result_json, render_result_md, write_result_json, HeadlineSummary,
    HistogramBin, RiskBand,
};

pub use rng::{percentile, Mulberry32};

pub use run::SimulationRun;

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
