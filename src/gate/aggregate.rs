// Aggregate comparison of the two snapshot totals
//
// Uses only the "total" records computed upstream. Exclusions do not adjust
// the aggregate.

use crate::snapshot::FileCoverageRecord;
use serde::Serialize;

/// Signed change of the aggregate percentages (negative = regression)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateDelta {
    pub statements_pct: f64,
    pub branches_pct: f64,
}

impl AggregateDelta {
    /// Delta between two total records, missing metrics reading as 0
    pub fn between(candidate_total: &FileCoverageRecord, base_total: &FileCoverageRecord) -> Self {
        Self {
            statements_pct: candidate_total.statements_pct() - base_total.statements_pct(),
            branches_pct: candidate_total.branches_pct() - base_total.branches_pct(),
        }
    }
}

/// Aggregate delta plus whether it breached the general tolerance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateComparison {
    pub delta: AggregateDelta,
    pub exceeded: bool,
}

/// Compare the two total records against the general tolerance
///
/// The tolerance is exceeded when either delta is strictly below
/// `-general_tolerance`.
///
/// # Example
/// ```
/// use covgate::gate::compare_aggregate;
/// use covgate::snapshot::FileCoverageRecord;
///
/// let base = FileCoverageRecord::with_pcts(80.0, 70.0);
/// let candidate = FileCoverageRecord::with_pcts(79.9, 70.0);
///
/// let comparison = compare_aggregate(&candidate, &base, 0.03);
/// assert!(comparison.exceeded);
/// ```
pub fn compare_aggregate(
    candidate_total: &FileCoverageRecord,
    base_total: &FileCoverageRecord,
    general_tolerance: f64,
) -> AggregateComparison {
    let delta = AggregateDelta::between(candidate_total, base_total);
    let exceeded =
        delta.statements_pct < -general_tolerance || delta.branches_pct < -general_tolerance;

    AggregateComparison { delta, exceeded }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_drop_within_tolerance() {
        let base = FileCoverageRecord::with_pcts(80.0, 70.0);
        let candidate = FileCoverageRecord::with_pcts(79.98, 70.0);

        let comparison = compare_aggregate(&candidate, &base, 0.03);
        assert!(!comparison.exceeded);
        assert!((comparison.delta.statements_pct + 0.02).abs() < 1e-9);
        assert_eq!(comparison.delta.branches_pct, 0.0);
    }

    #[test]
    fn test_drop_beyond_tolerance() {
        let base = FileCoverageRecord::with_pcts(80.0, 70.0);
        let candidate = FileCoverageRecord::with_pcts(79.9, 70.0);

        let comparison = compare_aggregate(&candidate, &base, 0.03);
        assert!(comparison.exceeded);
    }

    #[test]
    fn test_branches_alone_can_exceed() {
        let base = FileCoverageRecord::with_pcts(80.0, 70.0);
        let candidate = FileCoverageRecord::with_pcts(85.0, 69.0);

        assert!(compare_aggregate(&candidate, &base, 0.5).exceeded);
    }

    #[test]
    fn test_drop_equal_to_tolerance_passes() {
        let base = FileCoverageRecord::with_pcts(80.0, 70.0);
        let candidate = FileCoverageRecord::with_pcts(79.5, 69.5);

        assert!(!compare_aggregate(&candidate, &base, 0.5).exceeded);
    }

    #[test]
    fn test_improvement_never_exceeds() {
        let base = FileCoverageRecord::with_pcts(50.0, 50.0);
        let candidate = FileCoverageRecord::with_pcts(60.0, 55.0);

        let comparison = compare_aggregate(&candidate, &base, 0.0);
        assert!(!comparison.exceeded);
        assert_eq!(comparison.delta.statements_pct, 10.0);
        assert_eq!(comparison.delta.branches_pct, 5.0);
    }

    #[test]
    fn test_missing_total_metrics_read_as_zero() {
        let base = FileCoverageRecord::with_pcts(10.0, 10.0);
        let candidate = FileCoverageRecord::default();

        let comparison = compare_aggregate(&candidate, &base, 0.03);
        assert!(comparison.exceeded);
        assert_eq!(comparison.delta.statements_pct, -10.0);
    }
}
