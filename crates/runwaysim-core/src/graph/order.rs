//! Cycle-tolerant topological ordering.
//!
//! Modules are visited depth-first in input order, dependencies before
//! dependents. A dependency that is still on the active DFS path closes a
//! cycle; that back-edge is skipped rather than reported, so malformed
//! graphs still produce a usable order. Dependencies naming unknown ids are
//! ignored.
//!
//! The resulting [`ExecutionOrder`] is computed once per simulation and
//! shared read-only by every trial.

use std::collections::{HashMap, HashSet};

use crate::domain::module::Module;

/// Modules in a fixed iteration order with dependencies pre-resolved to
/// positions within that order.
#[derive(Debug, Clone)]
pub struct ExecutionOrder {
    modules: Vec<Module>,
    /// `dependencies[i]` holds the positions of module `i`'s known
    /// dependencies, in declaration order.
    dependencies: Vec<Vec<usize>>,
    skipped_back_edges: usize,
}

impl ExecutionOrder {
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Positions of the dependencies of the module at `position`.
    pub fn dependencies_of(&self, position: usize) -> &[usize] {
        &self.dependencies[position]
    }

    /// Ids in iteration order.
    pub fn ids(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.id.as_str()).collect()
    }

    /// Number of back-edges dropped while ordering.
    pub fn skipped_back_edges(&self) -> usize {
        self.skipped_back_edges
    }
}

struct Visitor<'a> {
    by_id: HashMap<&'a str, &'a Module>,
    visited: HashSet<&'a str>,
    active: HashSet<&'a str>,
    ordered: Vec<&'a Module>,
    skipped_back_edges: usize,
}

impl<'a> Visitor<'a> {
    fn visit(&mut self, id: &'a str) {
        if self.visited.contains(id) {
            return;
        }
        if self.active.contains(id) {
            self.skipped_back_edges += 1;
            tracing::debug!(module_id = %id, "dependency cycle: back-edge skipped");
            return;
        }
        let Some(module) = self.by_id.get(id).copied() else {
            return;
        };
        self.active.insert(id);
        for dep in module.dependency_ids() {
            self.visit(dep.as_str());
        }
        self.ordered.push(module);
        self.active.remove(id);
        self.visited.insert(id);
    }
}

/// Compute the fixed iteration order for `modules`.
///
/// Every module appears exactly once. For an acyclic graph every module
/// follows all of its dependencies.
pub fn topological_order(modules: &[Module]) -> ExecutionOrder {
    let mut visitor = Visitor {
        by_id: modules.iter().map(|m| (m.id.as_str(), m)).collect(),
        visited: HashSet::with_capacity(modules.len()),
        active: HashSet::new(),
        ordered: Vec::with_capacity(modules.len()),
        skipped_back_edges: 0,
    };
    for module in modules {
        visitor.visit(module.id.as_str());
    }

    let position: HashMap<&str, usize> = visitor
        .ordered
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id.as_str(), i))
        .collect();

    let dependencies = visitor
        .ordered
        .iter()
        .map(|m| {
            m.dependency_ids()
                .iter()
                .filter_map(|dep| position.get(dep.as_str()).copied())
                .collect()
        })
        .collect();

    ExecutionOrder {
        modules: visitor.ordered.into_iter().cloned().collect(),
        dependencies,
        skipped_back_edges: visitor.skipped_back_edges,
    }
}
