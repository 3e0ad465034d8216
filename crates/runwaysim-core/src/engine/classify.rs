//! Failure-mode attribution for a single trial.

use std::fmt;

/// Why a trial missed (or met) its targets.
///
/// Only the [`Display`](fmt::Display) label leaves the engine; aggregated
/// tables are keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailureMode {
    /// Finished after the money ran out. Dominates every other mode.
    RunwayExhaustion,
    /// Missed the deadline with both scope creep and a vendor delay.
    ScopeCreepAndVendorDelay,
    ScopeCreep,
    VendorDelay,
    /// Missed the deadline with no risk event; blamed on the critical module.
    Bottleneck(String),
    OnTime,
}

impl FailureMode {
    pub fn is_on_time(&self) -> bool {
        matches!(self, FailureMode::OnTime)
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureMode::RunwayExhaustion => f.write_str("runway_exhaustion"),
            FailureMode::ScopeCreepAndVendorDelay => f.write_str("scope_creep+vendor_delay"),
            FailureMode::ScopeCreep => f.write_str("scope_creep"),
            FailureMode::VendorDelay => f.write_str("vendor_delay"),
            FailureMode::Bottleneck(id) => write!(f, "bottleneck:{id}"),
            FailureMode::OnTime => f.write_str("on_time"),
        }
    }
}

/// Classify a trial outcome.
///
/// Runway exhaustion is checked first, then the deadline; a deadline miss is
/// attributed to the risk events seen during the trial, falling back to the
/// bottleneck module.
pub fn classify_failure_mode(
    finish_days: u32,
    deadline_days: u32,
    runway_days: f64,
    bottleneck_id: &str,
    saw_scope_creep: bool,
    saw_vendor_delay: bool,
) -> FailureMode {
    if f64::from(finish_days) > runway_days {
        return FailureMode::RunwayExhaustion;
    }
    if finish_days > deadline_days {
        return match (saw_scope_creep, saw_vendor_delay) {
            (true, true) => FailureMode::ScopeCreepAndVendorDelay,
            (true, false) => FailureMode::ScopeCreep,
            (false, true) => FailureMode::VendorDelay,
            (false, false) => FailureMode::Bottleneck(bottleneck_id.to_string()),
        };
    }
    FailureMode::OnTime
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runway_exhaustion_takes_priority() {
        let mode = classify_failure_mode(200, 90, 180.0, "M1", true, true);
        assert_eq!(mode, FailureMode::RunwayExhaustion);
        assert_eq!(mode.to_string(), "runway_exhaustion");
    }

    #[test]
    fn test_deadline_miss_attribution() {
        let cases = [
            (true, true, "scope_creep+vendor_delay"),
            (true, false, "scope_creep"),
            (false, true, "vendor_delay"),
            (false, false, "bottleneck:M4"),
        ];
        for (scope, vendor, label) in cases {
            let mode = classify_failure_mode(100, 90, 180.0, "M4", scope, vendor);
            assert_eq!(mode.to_string(), label);
        }
    }

    #[test]
    fn test_labels_key_the_aggregated_tables() {
        let labels: Vec<String> = [
            FailureMode::RunwayExhaustion,
            FailureMode::ScopeCreepAndVendorDelay,
            FailureMode::ScopeCreep,
            FailureMode::VendorDelay,
            FailureMode::Bottleneck("M6".to_string()),
            FailureMode::OnTime,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(
            labels,
            vec![
                "runway_exhaustion",
                "scope_creep+vendor_delay",
                "scope_creep",
                "vendor_delay",
                "bottleneck:M6",
                "on_time",
            ]
        );
    }

    #[test]
    fn test_on_time_at_deadline_boundary() {
        let mode = classify_failure_mode(90, 90, 180.0, "M1", true, true);
        assert!(mode.is_on_time());
        assert_eq!(mode.to_string(), "on_time");
    }

    #[test]
    fn test_exactly_runway_is_deadline_miss_not_exhaustion() {
        let mode = classify_failure_mode(180, 90, 180.0, "M2", false, false);
        assert_eq!(mode, FailureMode::Bottleneck("M2".to_string()));
    }
}
