//! File exclusion rules for the coverage gate
//!
//! Two independent mechanisms:
//! - Ignored paths: plain substring containment against the full file path
//!   (`migrations` excludes `src/migrations/001.ts` and `src/old_migrations.ts`)
//! - Exclude patterns: regular expressions matched against the base name only
//!   (`\.spec\.ts$` excludes `src/a.spec.ts`)
//!
//! Patterns that fail to compile are logged and dropped; they never match and
//! never abort the run. Patterns use `regex` crate syntax, which has no
//! look-around or backreferences: `^(?!index)` is rejected and dropped.

use regex::Regex;

/// Compiled exclusion rules
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    ignored_paths: Vec<String>,
    patterns: Vec<Regex>,
}

impl ExclusionRules {
    /// Rules that exclude nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// Build rules from ignored-path substrings and regex sources
    ///
    /// Empty entries are skipped: an empty substring would otherwise exclude
    /// every file.
    pub fn new<I, P, S, T>(ignored_paths: I, patterns: P) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        P: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let ignored_paths = ignored_paths
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let patterns = patterns
            .into_iter()
            .filter_map(|source| compile_pattern(source.as_ref()))
            .collect();

        Self {
            ignored_paths,
            patterns,
        }
    }

    /// Build rules from the comma-separated forms supplied by the CI inputs
    pub fn from_lists(ignored_paths: &str, patterns: &str) -> Self {
        Self::new(split_list(ignored_paths), split_list(patterns))
    }

    /// Check if a file is excluded from comparison
    pub fn is_excluded(&self, file_path: &str) -> bool {
        if self
            .ignored_paths
            .iter()
            .any(|ignored| file_path.contains(ignored.as_str()))
        {
            return true;
        }

        let name = base_name(file_path);
        self.patterns.iter().any(|re| re.is_match(name))
    }

    /// Ignored-path substrings in effect
    pub fn ignored_paths(&self) -> &[String] {
        &self.ignored_paths
    }

    /// Sources of the patterns that compiled
    pub fn pattern_sources(&self) -> Vec<&str> {
        self.patterns.iter().map(Regex::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.ignored_paths.is_empty() && self.patterns.is_empty()
    }
}

fn compile_pattern(source: &str) -> Option<Regex> {
    let source = source.trim();
    if source.is_empty() {
        return None;
    }
    match Regex::new(source) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!("Ignoring invalid exclude pattern '{}': {}", source, e);
            None
        }
    }
}

/// Split a comma-separated input, trimming entries and dropping empty ones
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Last path segment, or the whole path when it has no separator
pub fn base_name(file_path: &str) -> &str {
    file_path
        .rsplit_once('/')
        .map_or(file_path, |(_, name)| name)
}
