// Markdown report rendering
//
// The report is posted verbatim as a pull-request comment, so the literal
// layout below is the contract.

use crate::gate::aggregate::AggregateDelta;
use crate::gate::file::FileIssue;

pub const REPORT_TITLE: &str = "## ⚠️ Coverage Report";
pub const GENERAL_TOLERANCE_WARNING: &str =
    "⚠️ The general coverage is worse than before and above the tolerance. You need to write more tests!";

/// Render the markdown report
///
/// Returns the empty string when there are no issues and the aggregate stayed
/// within tolerance.
pub fn build_report(delta: &AggregateDelta, aggregate_exceeded: bool, issues: &[FileIssue]) -> String {
    if issues.is_empty() && !aggregate_exceeded {
        return String::new();
    }

    let mut report = String::new();

    report.push_str(REPORT_TITLE);
    report.push_str("\n\n");

    report.push_str("### Coverage Difference\n");
    report.push_str("| Metric | Diff |\n");
    report.push_str("|--------|------|\n");
    report.push_str(&format!(
        "| Statements | {} |\n",
        format_signed_pct(delta.statements_pct)
    ));
    report.push_str(&format!(
        "| Branches | {} |\n",
        format_signed_pct(delta.branches_pct)
    ));
    report.push('\n');

    if aggregate_exceeded {
        report.push_str(GENERAL_TOLERANCE_WARNING);
        report.push_str("\n\n");
    }

    if !issues.is_empty() {
        report.push_str("### Files with Coverage Issues\n\n");
        for issue in issues {
            report.push_str(&format!("- `{}` - {}\n", issue.file_name, issue.message));
        }
    }

    report
}

/// Two-decimal percentage with an explicit `+` for non-negative values
///
/// Negative zero renders as `+0.00%`.
pub fn format_signed_pct(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}%", format_pct(value.abs()))
    } else {
        format!("{}%", format_pct(value))
    }
}

/// Two-decimal rendering that rounds exact halves away from zero
///
/// `{:.2}` rounds a value sitting exactly on `.xx5` to even (`0.125` becomes
/// `0.12`). Only odd multiples of 1/8 land exactly on such a tie.
pub fn format_pct(value: f64) -> String {
    let on_tie = (value * 8.0).fract() == 0.0 && (value * 4.0).fract() != 0.0;
    if on_tie {
        format!("{:.2}", value + value.signum() * 0.001)
    } else {
        format!("{:.2}", value)
    }
}
