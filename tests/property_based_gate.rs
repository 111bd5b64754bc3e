//! Property-based tests for the coverage gate
//!
//! Covers the behaviors that must hold for any snapshot pair:
//! 1. Idempotence of a run
//! 2. Excluded files never produce issues
//! 3. The per-file tolerance boundary is exclusive
//! 4. Deleted files are silent
//! 5. A run without issues renders an empty report

use covgate::config::GateConfig;
use covgate::exclusion::ExclusionRules;
use covgate::gate::{compare_file, run};
use covgate::snapshot::{CoverageSnapshot, FileCoverageRecord};
use proptest::prelude::*;

fn pct() -> impl Strategy<Value = f64> {
    // Two-decimal percentages as the reporters write them
    (0u32..=10_000).prop_map(|n| f64::from(n) / 100.0)
}

fn files() -> impl Strategy<Value = Vec<(String, f64, f64)>> {
    prop::collection::vec(("[a-z]{1,8}", pct(), pct()), 0..12).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(name, s, b)| (format!("src/{}.ts", name), s, b))
            .collect()
    })
}

fn snapshot(total: (f64, f64), files: &[(String, f64, f64)]) -> CoverageSnapshot {
    CoverageSnapshot::new(
        FileCoverageRecord::with_pcts(total.0, total.1),
        files
            .iter()
            .map(|(p, s, b)| (p.clone(), FileCoverageRecord::with_pcts(*s, *b))),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_run_is_idempotent(
        base_files in files(),
        candidate_files in files(),
        base_total in (pct(), pct()),
        candidate_total in (pct(), pct()),
    ) {
        let base = snapshot(base_total, &base_files);
        let candidate = snapshot(candidate_total, &candidate_files);
        let config = GateConfig::default();

        prop_assert_eq!(run(&candidate, &base, &config), run(&candidate, &base, &config));
    }

    #[test]
    fn prop_excluded_files_never_report(
        base_files in files(),
        candidate_files in files(),
    ) {
        let base = snapshot((50.0, 50.0), &base_files);
        let candidate = snapshot((50.0, 50.0), &candidate_files);
        let config = GateConfig::default().with_exclusions(ExclusionRules::from_lists("src/", ""));

        let outcome = run(&candidate, &base, &config);
        prop_assert!(outcome.issues.is_empty());
        prop_assert!(!outcome.has_issues);
        prop_assert_eq!(outcome.excluded.len(), candidate.len());
    }

    #[test]
    fn prop_drop_equal_to_tolerance_passes(
        base_pct in 10u32..=100,
        tolerance in 0u32..=10,
    ) {
        let base_pct = f64::from(base_pct);
        let tolerance = f64::from(tolerance);
        let base = FileCoverageRecord::with_pcts(base_pct, base_pct);
        let at_boundary = FileCoverageRecord::with_pcts(base_pct - tolerance, base_pct - tolerance);
        let past_boundary =
            FileCoverageRecord::with_pcts(base_pct - tolerance - 1.0, base_pct - tolerance - 1.0);
        let config = GateConfig {
            single_line_coverage_tolerance: tolerance,
            ..GateConfig::default()
        };

        prop_assert!(compare_file(&at_boundary, Some(&base), "src/a.ts", &config).is_none());
        prop_assert!(compare_file(&past_boundary, Some(&base), "src/a.ts", &config).is_some());
    }

    #[test]
    fn prop_deleted_files_are_silent(base_files in files()) {
        let base = snapshot((50.0, 50.0), &base_files);
        let candidate = snapshot((50.0, 50.0), &[]);

        let outcome = run(&candidate, &base, &GateConfig::default());
        prop_assert!(!outcome.has_issues);
        prop_assert_eq!(outcome.files_checked, 0);
    }

    #[test]
    fn prop_report_empty_iff_no_issues(
        base_files in files(),
        candidate_files in files(),
        base_total in (pct(), pct()),
        candidate_total in (pct(), pct()),
    ) {
        let base = snapshot(base_total, &base_files);
        let candidate = snapshot(candidate_total, &candidate_files);

        let outcome = run(&candidate, &base, &GateConfig::default());
        prop_assert_eq!(outcome.report.is_empty(), !outcome.has_issues);
    }
}
