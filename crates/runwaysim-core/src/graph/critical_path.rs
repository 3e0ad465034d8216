//! Earliest-finish (longest path) scheduling over an [`ExecutionOrder`].

use super::order::ExecutionOrder;

/// Finish times within this distance of the maximum count as critical.
const CRITICAL_EPSILON: f64 = 0.01;

/// Critical-path summary of one set of module durations.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalPath {
    /// Project length in days, at least 1.
    pub total_days: f64,
    /// Position (in the execution order) of the bottleneck module.
    pub bottleneck: usize,
    /// Earliest finish per position.
    pub earliest_finish: Vec<f64>,
}

/// Compute earliest finish per module, total project days and the
/// bottleneck.
///
/// `durations` is indexed by position in `order`. A dependency positioned at
/// or after its dependent (a broken cycle edge) contributes nothing, and a
/// non-positive or non-finite duration counts as one day.
///
/// The bottleneck is the critical module (finish within 0.01 of the
/// maximum) with the largest own duration; ties go to the earliest position.
pub fn critical_path(order: &ExecutionOrder, durations: &[f64]) -> CriticalPath {
    debug_assert_eq!(order.len(), durations.len());

    let mut earliest_finish: Vec<f64> = Vec::with_capacity(durations.len());
    for (position, &duration) in durations.iter().enumerate() {
        let start = order
            .dependencies_of(position)
            .iter()
            .filter(|&&dep| dep < position)
            .map(|&dep| earliest_finish[dep])
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        let own = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            1.0
        };
        earliest_finish.push(start + own);
    }

    let total_days = earliest_finish
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(1.0_f64, f64::max);

    let mut bottleneck = 0;
    let mut longest = -1.0_f64;
    for (position, finish) in earliest_finish.iter().enumerate() {
        if (finish - total_days).abs() < CRITICAL_EPSILON && durations[position] > longest {
            longest = durations[position];
            bottleneck = position;
        }
    }

    CriticalPath {
        total_days,
        bottleneck,
        earliest_finish,
    }
}
