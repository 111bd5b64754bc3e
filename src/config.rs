//! Configuration for the coverage gate
//!
//! [`GateConfig`] is the value object handed to [`crate::gate::run`]. It is
//! built once at the boundary from up to three layers, lowest precedence
//! first:
//! 1. Built-in defaults
//! 2. An optional TOML file ([`GateConfigFile`])
//! 3. Raw string inputs from the environment or command line ([`RawGateConfig`])
//!
//! Raw numeric inputs are parsed leniently: anything that is not a finite
//! number is ignored and the lower layer's value stays in effect.

use crate::error::{CoverageError, Result};
use crate::exclusion::{split_list, ExclusionRules};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_GENERAL_COVERAGE_TOLERANCE: f64 = 0.03;
pub const DEFAULT_SINGLE_LINE_COVERAGE_TOLERANCE: f64 = 5.0;
pub const DEFAULT_NEW_FILE_COVERAGE_THRESHOLD: f64 = 40.0;

/// Tolerances, threshold and exclusion rules for one gate run
///
/// # Example
/// ```
/// use covgate::config::GateConfig;
///
/// let config = GateConfig::default();
/// assert_eq!(config.general_coverage_tolerance, 0.03);
/// assert_eq!(config.new_file_coverage_threshold, 40.0);
/// ```
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Largest allowed drop of the aggregate statements/branches percentage,
    /// in percentage points
    pub general_coverage_tolerance: f64,

    /// Largest allowed drop of a single existing file's statements/branches
    /// percentage, in percentage points
    pub single_line_coverage_tolerance: f64,

    /// Minimum statements and branches percentage for new or renamed files
    pub new_file_coverage_threshold: f64,

    /// Files skipped entirely by the comparison
    pub exclusions: ExclusionRules,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            general_coverage_tolerance: DEFAULT_GENERAL_COVERAGE_TOLERANCE,
            single_line_coverage_tolerance: DEFAULT_SINGLE_LINE_COVERAGE_TOLERANCE,
            new_file_coverage_threshold: DEFAULT_NEW_FILE_COVERAGE_THRESHOLD,
            exclusions: ExclusionRules::none(),
        }
    }
}

impl GateConfig {
    /// Build a configuration from raw string inputs over the defaults
    pub fn from_raw(raw: &RawGateConfig) -> Self {
        Self::layered(None, raw)
    }

    /// Build a configuration from an optional file layer and raw inputs
    pub fn layered(file: Option<&GateConfigFile>, raw: &RawGateConfig) -> Self {
        let mut general = DEFAULT_GENERAL_COVERAGE_TOLERANCE;
        let mut single = DEFAULT_SINGLE_LINE_COVERAGE_TOLERANCE;
        let mut threshold = DEFAULT_NEW_FILE_COVERAGE_THRESHOLD;
        let mut ignored_paths = Vec::new();
        let mut patterns = Vec::new();

        if let Some(file) = file {
            general = finite_or(file.general_coverage_tolerance, general);
            single = finite_or(file.single_line_coverage_tolerance, single);
            threshold = finite_or(file.new_file_coverage_threshold, threshold);
            if let Some(list) = &file.ignored_paths {
                ignored_paths = list.items();
            }
            if let Some(list) = &file.exclude_file_patterns {
                patterns = list.items();
            }
        }

        general = parse_number_or(raw.general_coverage_tolerance.as_deref(), general);
        single = parse_number_or(raw.single_line_coverage_tolerance.as_deref(), single);
        threshold = parse_number_or(raw.new_file_coverage_threshold.as_deref(), threshold);
        if let Some(list) = non_blank(raw.ignored_paths.as_deref()) {
            ignored_paths = split_list(list);
        }
        if let Some(list) = non_blank(raw.exclude_file_patterns.as_deref()) {
            patterns = split_list(list);
        }

        Self {
            general_coverage_tolerance: general,
            single_line_coverage_tolerance: single,
            new_file_coverage_threshold: threshold,
            exclusions: ExclusionRules::new(ignored_paths, patterns),
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionRules) -> Self {
        self.exclusions = exclusions;
        self
    }
}

/// Unparsed inputs exactly as the invocation environment supplies them
#[derive(Debug, Clone, Default)]
pub struct RawGateConfig {
    pub general_coverage_tolerance: Option<String>,
    pub single_line_coverage_tolerance: Option<String>,
    pub new_file_coverage_threshold: Option<String>,
    /// Comma-separated substrings
    pub ignored_paths: Option<String>,
    /// Comma-separated regex sources
    pub exclude_file_patterns: Option<String>,
}

/// Optional TOML configuration file
///
/// # Example TOML
/// ```toml
/// general_coverage_tolerance = 0.5
/// single_line_coverage_tolerance = 2
/// new_file_coverage_threshold = 80
/// ignored_paths = ["migrations", "generated"]
/// exclude_file_patterns = "\\.spec\\.ts$,^index\\.ts$"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfigFile {
    pub general_coverage_tolerance: Option<f64>,
    pub single_line_coverage_tolerance: Option<f64>,
    pub new_file_coverage_threshold: Option<f64>,
    pub ignored_paths: Option<ListInput>,
    pub exclude_file_patterns: Option<ListInput>,
}

/// A list given either as a TOML array or as a comma-separated string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListInput {
    Items(Vec<String>),
    Csv(String),
}

impl ListInput {
    fn items(&self) -> Vec<String> {
        match self {
            ListInput::Items(items) => items.clone(),
            ListInput::Csv(csv) => split_list(csv),
        }
    }
}

impl GateConfigFile {
    /// Load the configuration file from disk
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CoverageError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| CoverageError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Parse a numeric input, keeping `fallback` for blank, malformed or
/// non-finite values
pub fn parse_number_or(input: Option<&str>, fallback: f64) -> f64 {
    finite_or(input.and_then(|s| s.trim().parse::<f64>().ok()), fallback)
}

fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

fn non_blank(input: Option<&str>) -> Option<&str> {
    input.filter(|s| !s.trim().is_empty())
}
