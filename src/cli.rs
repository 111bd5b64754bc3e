//! CLI argument parsing for covgate
//!
//! Every gate input can also come from the environment, using the names a
//! GitHub Actions step exposes its `with:` inputs under.

use crate::config::RawGateConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_BASE_PATH: &str = "coverage-base/coverage-summary.json";
pub const DEFAULT_CANDIDATE_PATH: &str = "coverage/coverage-summary.json";

/// Output format for the gate result on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown report only (default)
    Text,
    /// JSON document for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "covgate")]
#[command(version)]
#[command(about = "Fail pull requests that regress test coverage beyond tolerance", long_about = None)]
pub struct Cli {
    /// Coverage summary produced on the base branch
    #[arg(
        long,
        value_name = "PATH",
        env = "INPUT_BASE_COVERAGE_PATH",
        default_value = DEFAULT_BASE_PATH
    )]
    pub base: PathBuf,

    /// Coverage summary produced on the proposed change
    #[arg(
        long,
        value_name = "PATH",
        env = "INPUT_CANDIDATE_COVERAGE_PATH",
        default_value = DEFAULT_CANDIDATE_PATH
    )]
    pub candidate: PathBuf,

    /// Allowed drop of total statements/branches coverage in points (default: 0.03)
    #[arg(
        long,
        value_name = "POINTS",
        env = "INPUT_GENERAL_COVERAGE_TOLERANCE",
        allow_hyphen_values = true
    )]
    pub general_coverage_tolerance: Option<String>,

    /// Allowed drop of a single file's statements/branches coverage in points (default: 5)
    #[arg(
        long,
        value_name = "POINTS",
        env = "INPUT_SINGLE_LINE_COVERAGE_TOLERANCE",
        allow_hyphen_values = true
    )]
    pub single_line_coverage_tolerance: Option<String>,

    /// Minimum statements/branches coverage for new or renamed files (default: 40)
    #[arg(
        long,
        value_name = "PCT",
        env = "INPUT_NEW_FILE_COVERAGE_THRESHOLD",
        allow_hyphen_values = true
    )]
    pub new_file_coverage_threshold: Option<String>,

    /// Comma-separated substrings; files whose path contains one are skipped
    #[arg(long, value_name = "LIST", env = "INPUT_IGNORED_PATHS")]
    pub ignored_paths: Option<String>,

    /// Comma-separated regexes matched against file base names; matches are skipped
    #[arg(long, value_name = "LIST", env = "INPUT_EXCLUDE_FILE_PATTERNS")]
    pub exclude_file_patterns: Option<String>,

    /// TOML file with gate settings (overridden by flags and environment)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// File to append step outputs (hasIssues, coverageReport) to
    #[arg(long = "github-output", value_name = "FILE", env = "GITHUB_OUTPUT")]
    pub github_output: Option<PathBuf>,

    /// Also write the markdown report to this file when there are issues
    #[arg(long = "report-file", value_name = "FILE")]
    pub report_file: Option<PathBuf>,

    /// Exit with status 1 when issues are found
    #[arg(long = "fail-on-issues")]
    pub fail_on_issues: bool,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Gate inputs in their unparsed form
    pub fn raw_config(&self) -> RawGateConfig {
        RawGateConfig {
            general_coverage_tolerance: self.general_coverage_tolerance.clone(),
            single_line_coverage_tolerance: self.single_line_coverage_tolerance.clone(),
            new_file_coverage_threshold: self.new_file_coverage_threshold.clone(),
            ignored_paths: self.ignored_paths.clone(),
            exclude_file_patterns: self.exclude_file_patterns.clone(),
        }
    }
}
