//! Output emitters for a gate run
//!
//! - GitHub Actions step outputs (`hasIssues`, `coverageReport`) appended to
//!   the file named by `GITHUB_OUTPUT`
//! - Stdout rendering as plain markdown or as a JSON document
//! - An optional standalone markdown report file

use crate::cli::OutputFormat;
use crate::gate::{AggregateComparison, FileIssue, GateOutcome};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub const HAS_ISSUES_OUTPUT: &str = "hasIssues";
pub const COVERAGE_REPORT_OUTPUT: &str = "coverageReport";

const DELIMITER_BASE: &str = "COVGATE_REPORT_EOF";

/// JSON document printed with `--format json`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonGateOutput<'a> {
    pub version: &'static str,
    pub has_issues: bool,
    pub coverage_report: &'a str,
    pub aggregate: &'a AggregateComparison,
    pub issues: &'a [FileIssue],
    /// Excluded candidate files
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub excluded: &'a [String],
}

impl<'a> From<&'a GateOutcome> for JsonGateOutput<'a> {
    fn from(outcome: &'a GateOutcome) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            has_issues: outcome.has_issues,
            coverage_report: &outcome.report,
            aggregate: &outcome.aggregate,
            issues: &outcome.issues,
            excluded: &outcome.excluded,
        }
    }
}

/// Render what goes to stdout for the chosen format
///
/// Text is the report itself, so a clean run prints nothing.
pub fn render(outcome: &GateOutcome, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(outcome.report.clone()),
        OutputFormat::Json => serde_json::to_string_pretty(&JsonGateOutput::from(outcome)),
    }
}

/// Step-output lines in GitHub's `name=value` / `name<<DELIM` syntax
pub fn github_output_block(outcome: &GateOutcome) -> String {
    let delimiter = heredoc_delimiter(&outcome.report);

    let mut block = String::new();
    block.push_str(&format!("{}={}\n", HAS_ISSUES_OUTPUT, outcome.has_issues));
    block.push_str(&format!("{}<<{}\n", COVERAGE_REPORT_OUTPUT, delimiter));
    block.push_str(&outcome.report);
    if !outcome.report.is_empty() && !outcome.report.ends_with('\n') {
        block.push('\n');
    }
    block.push_str(&format!("{}\n", delimiter));
    block
}

/// Append step outputs to a GitHub output file
pub fn write_github_outputs<P: AsRef<Path>>(path: P, outcome: &GateOutcome) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;
    file.write_all(github_output_block(outcome).as_bytes())?;
    tracing::debug!("Wrote step outputs to {}", path.as_ref().display());
    Ok(())
}

/// Write the markdown report to a file, skipped when the report is empty
///
/// Returns whether a file was written.
pub fn write_report_file<P: AsRef<Path>>(path: P, outcome: &GateOutcome) -> io::Result<bool> {
    if outcome.report.is_empty() {
        return Ok(false);
    }
    fs::write(path.as_ref(), &outcome.report)?;
    Ok(true)
}

/// Delimiter that cannot collide with a line of the report
fn heredoc_delimiter(report: &str) -> String {
    let mut delimiter = DELIMITER_BASE.to_string();
    while report.lines().any(|line| line == delimiter) {
        delimiter.push('_');
    }
    delimiter
}
