//! Dependency inference from module categories.
//!
//! When a project arrives without any explicit dependencies, modules are
//! tiered by category precedence (legal → infra → backend → data → frontend
//! → business by default) and every module depends on every module in a
//! strictly lower tier. The result is a complete tiered DAG rather than a
//! sparse chain.

use crate::config::SimulationConfig;
use crate::domain::module::Module;

/// Return the module list with dependencies filled in.
///
/// If any module already declares a non-empty dependency list, the input is
/// returned as-is (cloned): partial explicit wiring disables inference for
/// every module. Otherwise modules come back stably sorted by tier, each
/// depending on all lower-tier modules in that sorted order.
///
/// Never mutates `modules`.
pub fn infer_dependencies(modules: &[Module], config: &SimulationConfig) -> Vec<Module> {
    if modules.iter().any(Module::has_explicit_dependencies) {
        return modules.to_vec();
    }

    let mut sorted: Vec<&Module> = modules.iter().collect();
    sorted.sort_by_key(|m| config.precedence(m.category));

    sorted
        .iter()
        .map(|module| {
            let tier = config.precedence(module.category);
            let deps: Vec<String> = sorted
                .iter()
                .filter(|other| config.precedence(other.category) < tier)
                .map(|other| other.id.clone())
                .collect();
            Module {
                dependencies: Some(deps),
                ..(*module).clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::module::Category;

    fn ids(modules: &[Module]) -> Vec<&str> {
        modules.iter().map(|m| m.id.as_str()).collect()
    }

    fn deps_of<'a>(modules: &'a [Module], id: &str) -> Vec<&'a str> {
        modules
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.dependency_ids().iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn sample() -> Vec<Module> {
        vec![
            Module::new("ui", Category::Frontend, 2, 2),
            Module::new("api", Category::Backend, 3, 2),
            Module::new("tos", Category::Legal, 1, 1),
            Module::new("db", Category::Infra, 2, 3),
            Module::new("api2", Category::Backend, 2, 2),
            Module::new("sales", Category::Business, 1, 4),
        ]
    }

    #[test]
    fn test_sorted_by_tier_stably() {
        let out = infer_dependencies(&sample(), &SimulationConfig::default());
        assert_eq!(ids(&out), vec!["tos", "db", "api", "api2", "ui", "sales"]);
    }

    #[test]
    fn test_complete_tiered_dag() {
        let out = infer_dependencies(&sample(), &SimulationConfig::default());
        assert!(deps_of(&out, "tos").is_empty());
        assert_eq!(deps_of(&out, "db"), vec!["tos"]);
        assert_eq!(deps_of(&out, "api"), vec!["tos", "db"]);
        // Same tier never depends on itself.
        assert_eq!(deps_of(&out, "api2"), vec!["tos", "db"]);
        assert_eq!(deps_of(&out, "ui"), vec!["tos", "db", "api", "api2"]);
        assert_eq!(deps_of(&out, "sales"), vec!["tos", "db", "api", "api2", "ui"]);
    }

    #[test]
    fn test_inferred_ids_reference_existing_modules() {
        let out = infer_dependencies(&sample(), &SimulationConfig::default());
        for module in &out {
            for dep in module.dependency_ids() {
                assert!(out.iter().any(|m| &m.id == dep), "dangling dep {dep}");
            }
        }
    }

    #[test]
    fn test_any_explicit_dependency_disables_inference() {
        let mut modules = sample();
        modules[0] = modules[0].clone().with_dependencies(["api"]);
        let out = infer_dependencies(&modules, &SimulationConfig::default());
        assert_eq!(out, modules);
        assert!(deps_of(&out, "sales").is_empty());
    }

    #[test]
    fn test_empty_dependency_list_counts_as_absent() {
        let mut modules = sample();
        modules[1] = modules[1].clone().with_dependencies(Vec::<String>::new());
        let out = infer_dependencies(&modules, &SimulationConfig::default());
        assert_eq!(deps_of(&out, "api"), vec!["tos", "db"]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let modules = sample();
        let before = modules.clone();
        let _ = infer_dependencies(&modules, &SimulationConfig::default());
        assert_eq!(modules, before);
        assert!(modules.iter().all(|m| m.dependencies.is_none()));
    }
}
