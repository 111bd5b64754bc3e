// Coverage Regression Gate
//
// Compares a candidate coverage snapshot (proposed change) against a base
// snapshot (target branch) and decides whether coverage regressed beyond the
// configured tolerances.
//
// Two independent checks feed the verdict:
// - Aggregate: the snapshot totals may not drop by more than the general
//   tolerance (statements or branches)
// - Per file: existing files may not drop by more than the single-file
//   tolerance, new or renamed files must meet an absolute threshold
//
// Excluded files (ignored path substrings, base-name patterns) take no part
// in the per-file check. The aggregate always uses the upstream totals.

mod aggregate;
mod file;
mod report;
mod verdict;

pub use aggregate::{compare_aggregate, AggregateComparison, AggregateDelta};
pub use file::{compare_file, evaluate_file, FileClass, FileIssue, FileOutcome};
pub use report::{build_report, format_pct, format_signed_pct, GENERAL_TOLERANCE_WARNING, REPORT_TITLE};
pub use verdict::{run, GateOutcome};
