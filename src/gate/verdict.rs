// Gate verdict for a base/candidate snapshot pair
//
// Runs the per-file comparison over every candidate file and the aggregate
// comparison over the two totals, then merges both into one verdict and a
// rendered report. Pure: no I/O, no state carried between runs.

use crate::config::GateConfig;
use crate::gate::aggregate::{compare_aggregate, AggregateComparison};
use crate::gate::file::{evaluate_file, FileClass, FileIssue};
use crate::gate::report::build_report;
use crate::snapshot::CoverageSnapshot;
use serde::Serialize;

/// Full result of one gate run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateOutcome {
    /// Any file issue or an aggregate tolerance breach
    pub has_issues: bool,

    /// Markdown report, empty when `has_issues` is false
    #[serde(rename = "coverageReport")]
    pub report: String,

    pub aggregate: AggregateComparison,

    /// Issues in candidate snapshot key order
    pub issues: Vec<FileIssue>,

    /// Excluded candidate files in key order
    pub excluded: Vec<String>,

    /// Candidate files evaluated, excluded ones included
    pub files_checked: usize,
}

impl GateOutcome {
    /// One-line summary for logs
    pub fn summary_line(&self) -> String {
        format!(
            "{} files checked, {} excluded, {} with issues, aggregate {} (statements {:+.2}, branches {:+.2})",
            self.files_checked,
            self.excluded.len(),
            self.issues.len(),
            if self.aggregate.exceeded {
                "beyond tolerance"
            } else {
                "within tolerance"
            },
            self.aggregate.delta.statements_pct,
            self.aggregate.delta.branches_pct
        )
    }
}

/// Compare a candidate snapshot against a base snapshot
///
/// Files present only in the base snapshot (deletions) are never evaluated.
///
/// # Example
/// ```
/// use covgate::config::GateConfig;
/// use covgate::gate::run;
/// use covgate::snapshot::{CoverageSnapshot, FileCoverageRecord};
///
/// let base = CoverageSnapshot::new(
///     FileCoverageRecord::with_pcts(80.0, 70.0),
///     vec![("src/a.ts".to_string(), FileCoverageRecord::with_pcts(90.0, 70.0))],
/// );
/// let candidate = CoverageSnapshot::new(
///     FileCoverageRecord::with_pcts(80.0, 70.0),
///     vec![("src/a.ts".to_string(), FileCoverageRecord::with_pcts(89.0, 70.0))],
/// );
///
/// let outcome = run(&candidate, &base, &GateConfig::default());
/// assert!(!outcome.has_issues);
/// assert_eq!(outcome.report, "");
/// ```
pub fn run(candidate: &CoverageSnapshot, base: &CoverageSnapshot, config: &GateConfig) -> GateOutcome {
    let mut issues = Vec::new();
    let mut excluded = Vec::new();
    let mut files_checked = 0;

    for (path, record) in candidate.files() {
        files_checked += 1;
        let outcome = evaluate_file(record, base.get(path), path, config);

        match outcome.class {
            FileClass::Excluded => {
                tracing::debug!("Excluded {}", path);
                excluded.push(path.to_string());
            }
            class => tracing::trace!("Checked {} as {:?}", path, class),
        }

        if let Some(issue) = outcome.issue {
            issues.push(issue);
        }
    }

    let aggregate = compare_aggregate(
        candidate.total(),
        base.total(),
        config.general_coverage_tolerance,
    );

    let has_issues = !issues.is_empty() || aggregate.exceeded;
    let report = build_report(&aggregate.delta, aggregate.exceeded, &issues);

    GateOutcome {
        has_issues,
        report,
        aggregate,
        issues,
        excluded,
        files_checked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::FileCoverageRecord;

    fn snapshot(total: (f64, f64), files: &[(&str, f64, f64)]) -> CoverageSnapshot {
        CoverageSnapshot::new(
            FileCoverageRecord::with_pcts(total.0, total.1),
            files
                .iter()
                .map(|(p, s, b)| (p.to_string(), FileCoverageRecord::with_pcts(*s, *b))),
        )
    }

    #[test]
    fn test_run_clean() {
        let base = snapshot((80.0, 70.0), &[("src/a.ts", 90.0, 80.0)]);
        let candidate = snapshot((80.0, 70.0), &[("src/a.ts", 90.0, 80.0)]);

        let outcome = run(&candidate, &base, &GateConfig::default());
        assert!(!outcome.has_issues);
        assert!(outcome.report.is_empty());
        assert_eq!(outcome.files_checked, 1);
    }

    #[test]
    fn test_run_collects_issues_in_candidate_order() {
        let base = snapshot((80.0, 70.0), &[("src/a.ts", 90.0, 80.0), ("src/z.ts", 90.0, 80.0)]);
        let candidate = snapshot(
            (80.0, 70.0),
            &[("src/z.ts", 50.0, 80.0), ("src/new.ts", 0.0, 0.0), ("src/a.ts", 50.0, 80.0)],
        );

        let outcome = run(&candidate, &base, &GateConfig::default());
        let names: Vec<&str> = outcome.issues.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["src/z.ts", "src/new.ts", "src/a.ts"]);
        assert!(outcome.has_issues);
        assert!(!outcome.aggregate.exceeded);
    }

    #[test]
    fn test_run_aggregate_only() {
        let base = snapshot((80.0, 70.0), &[]);
        let candidate = snapshot((79.9, 70.0), &[]);

        let outcome = run(&candidate, &base, &GateConfig::default());
        assert!(outcome.has_issues);
        assert!(outcome.issues.is_empty());
        assert!(outcome.report.contains("| Statements | -0.10% |"));
    }

    #[test]
    fn test_run_ignores_deleted_files() {
        let base = snapshot((80.0, 70.0), &[("src/gone.ts", 100.0, 100.0)]);
        let candidate = snapshot((80.0, 70.0), &[]);

        let outcome = run(&candidate, &base, &GateConfig::default());
        assert!(!outcome.has_issues);
        assert_eq!(outcome.files_checked, 0);
    }

    #[test]
    fn test_summary_line() {
        let base = snapshot((80.0, 70.0), &[]);
        let candidate = snapshot((81.0, 70.0), &[("src/new.ts", 100.0, 100.0)]);

        let outcome = run(&candidate, &base, &GateConfig::default());
        assert_eq!(
            outcome.summary_line(),
            "1 files checked, 0 excluded, 0 with issues, aggregate within tolerance \
             (statements +1.00, branches +0.00)"
        );
    }
}
