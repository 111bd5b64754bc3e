// Per-file comparison
//
// Each candidate file is classified on its own:
// - Excluded: matched an ignored path or exclude pattern, nothing else happens
// - New: absent from the base snapshot, checked against an absolute threshold
// - Existing: present in both, statements and branches drops checked against
//   the per-file tolerance

use crate::config::GateConfig;
use crate::gate::report::format_pct;
use crate::snapshot::FileCoverageRecord;
use serde::Serialize;

/// How a candidate file was treated by the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FileClass {
    Excluded,
    /// New or renamed: no base record exists
    New,
    Existing,
}

/// A file that failed its rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileIssue {
    pub file_name: String,
    pub message: String,
}

/// Classification plus the issue it produced, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub class: FileClass,
    pub issue: Option<FileIssue>,
}

/// Classify and check one candidate file
pub fn evaluate_file(
    candidate: &FileCoverageRecord,
    base: Option<&FileCoverageRecord>,
    file_path: &str,
    config: &GateConfig,
) -> FileOutcome {
    if config.exclusions.is_excluded(file_path) {
        return FileOutcome {
            class: FileClass::Excluded,
            issue: None,
        };
    }

    match base {
        None => FileOutcome {
            class: FileClass::New,
            issue: check_new_file(candidate, file_path, config.new_file_coverage_threshold),
        },
        Some(base) => FileOutcome {
            class: FileClass::Existing,
            issue: check_existing_file(
                candidate,
                base,
                file_path,
                config.single_line_coverage_tolerance,
            ),
        },
    }
}

/// Compare one candidate file against its base record
///
/// Returns the issue for a file that fails its rule, `None` otherwise
/// (including every excluded file).
///
/// # Example
/// ```
/// use covgate::config::GateConfig;
/// use covgate::gate::compare_file;
/// use covgate::snapshot::FileCoverageRecord;
///
/// let base = FileCoverageRecord::with_pcts(90.0, 100.0);
/// let candidate = FileCoverageRecord::with_pcts(83.0, 100.0);
///
/// let issue = compare_file(&candidate, Some(&base), "src/a.ts", &GateConfig::default()).unwrap();
/// assert_eq!(issue.message, "Statements Diff: -7.00%");
/// ```
pub fn compare_file(
    candidate: &FileCoverageRecord,
    base: Option<&FileCoverageRecord>,
    file_path: &str,
    config: &GateConfig,
) -> Option<FileIssue> {
    evaluate_file(candidate, base, file_path, config).issue
}

fn check_new_file(
    candidate: &FileCoverageRecord,
    file_path: &str,
    threshold: f64,
) -> Option<FileIssue> {
    let statements = candidate.statements_pct();
    let branches = candidate.branches_pct();

    if statements < threshold || branches < threshold {
        tracing::debug!(
            "New file {} below threshold {} (statements={}, branches={})",
            file_path,
            threshold,
            statements,
            branches
        );
        return Some(FileIssue {
            file_name: file_path.to_string(),
            message: format!(
                "new or renamed file that does not meet the test coverage threshold of {}%! \
                 >>> Statements: {}%, Branches: {}%",
                threshold,
                format_pct(statements),
                format_pct(branches)
            ),
        });
    }

    None
}

fn check_existing_file(
    candidate: &FileCoverageRecord,
    base: &FileCoverageRecord,
    file_path: &str,
    tolerance: f64,
) -> Option<FileIssue> {
    let (candidate_statements, base_statements) = (candidate.statements_pct(), base.statements_pct());
    let (candidate_branches, base_branches) = (candidate.branches_pct(), base.branches_pct());

    let statements_failed = exceeds_tolerance(candidate_statements, base_statements, tolerance);
    let branches_failed = exceeds_tolerance(candidate_branches, base_branches, tolerance);
    if !statements_failed && !branches_failed {
        return None;
    }

    let statements_diff = candidate_statements - base_statements;
    let branches_diff = candidate_branches - base_branches;

    // Only drops are reported, even when the other metric triggered the issue
    let mut parts = Vec::with_capacity(2);
    if statements_diff < 0.0 {
        parts.push(format!("Statements Diff: {}%", format_pct(statements_diff)));
    }
    if branches_diff < 0.0 {
        parts.push(format!("Branches Diff: {}%", format_pct(branches_diff)));
    }

    tracing::debug!(
        "Existing file {} dropped beyond tolerance {} (statements={:+}, branches={:+})",
        file_path,
        tolerance,
        statements_diff,
        branches_diff
    );

    Some(FileIssue {
        file_name: file_path.to_string(),
        message: parts.join(" | "),
    })
}

/// A drop fails only when it is strictly larger than the tolerance
fn exceeds_tolerance(candidate: f64, base: f64, tolerance: f64) -> bool {
    candidate < base && candidate + tolerance < base
}
