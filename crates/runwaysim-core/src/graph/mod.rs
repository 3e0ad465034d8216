//! Module dependency graph: inference, ordering and critical path.
//!
//! Provides:
//! - [`resolver::infer_dependencies`]: tiered DAG from module categories
//! - [`order::topological_order`] / [`order::ExecutionOrder`]: fixed, cycle-tolerant iteration order
//! - [`critical_path::critical_path`]: earliest-finish scheduling and bottleneck selection

pub mod critical_path;
pub mod order;
pub mod resolver;

pub use critical_path::{critical_path, CriticalPath};
pub use order::{topological_order, ExecutionOrder};
pub use resolver::infer_dependencies;
