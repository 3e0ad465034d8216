//! Domain models for runwaysim.
//!
//! Canonical definitions for the core entities:
//! - `Module` / `TeamMember`: the project decomposition and roster
//! - `SimulationInput`: bounded input handed to the engine
//! - `SimulationResult`: aggregated trial outcomes

pub mod digest;
pub mod error;
pub mod input;
pub mod module;
pub mod result;

pub use error::{Result, SimError, ValidationError};
pub use input::{SimulationInput, SimulationRequest};
pub use module::{Category, Level, Module, Role, TeamMember};
pub use result::{RankedCount, SimulationResult};
