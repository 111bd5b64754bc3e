//! Coverage snapshots as produced by the test runner's JSON summary reporter
//!
//! A summary file is a JSON object keyed by file path. Each value carries four
//! metrics (`lines`, `functions`, `statements`, `branches`), and the reserved
//! key `"total"` carries the aggregate for the whole run:
//!
//! ```json
//! {
//!   "total": { "statements": { "total": 10, "covered": 8, "skipped": 0, "pct": 80 }, ... },
//!   "src/a.ts": { "statements": { "total": 4, "covered": 3, "skipped": 0, "pct": 75 }, ... }
//! }
//! ```
//!
//! The reserved key is split out on load, so a [`CoverageSnapshot`] holds the
//! aggregate and the per-file records separately. Per-file records keep the
//! key order of the source document.

use crate::error::{CoverageError, Result, SnapshotKind};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Reserved key holding the aggregate record in a summary file
pub const TOTAL_KEY: &str = "total";

/// Placeholder istanbul writes for the percentage of an empty metric
const UNKNOWN_PCT: &str = "Unknown";

/// One coverage dimension for one scope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CoverageMetric {
    pub total: u64,
    pub covered: u64,
    pub skipped: u64,
    /// Percentage as reported by the tool; never recomputed from the counts
    #[serde(deserialize_with = "deserialize_pct")]
    pub pct: f64,
}

impl CoverageMetric {
    pub fn with_pct(pct: f64) -> Self {
        Self {
            pct,
            ..Self::default()
        }
    }
}

/// Istanbul writes `"pct": "Unknown"` for a metric with nothing to cover,
/// which counts as fully covered. Any other non-number (`null` included)
/// reads as 0, the same as a missing `pct`.
fn deserialize_pct<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) if s == UNKNOWN_PCT => 100.0,
        _ => 0.0,
    })
}

/// Per-file (or aggregate) coverage record
///
/// Metrics are optional because some tools omit dimensions they do not
/// measure. Comparisons read a missing metric as `pct = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileCoverageRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<CoverageMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<CoverageMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statements: Option<CoverageMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches: Option<CoverageMetric>,
}

impl FileCoverageRecord {
    /// Record with only the two compared metrics set
    pub fn with_pcts(statements: f64, branches: f64) -> Self {
        Self {
            statements: Some(CoverageMetric::with_pct(statements)),
            branches: Some(CoverageMetric::with_pct(branches)),
            ..Self::default()
        }
    }

    /// Statements percentage, 0 when the metric is absent
    pub fn statements_pct(&self) -> f64 {
        self.statements.map_or(0.0, |m| m.pct)
    }

    /// Branches percentage, 0 when the metric is absent
    pub fn branches_pct(&self) -> f64 {
        self.branches.map_or(0.0, |m| m.pct)
    }
}

/// One decoded coverage summary: the aggregate record plus per-file records
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSnapshot {
    total: FileCoverageRecord,
    files: Vec<(String, FileCoverageRecord)>,
    index: HashMap<String, usize>,
}

impl CoverageSnapshot {
    /// Build a snapshot from an aggregate and ordered per-file records
    ///
    /// A repeated path keeps its first position and its last record, the same
    /// way a JSON object with duplicate keys decodes.
    pub fn new<I>(total: FileCoverageRecord, files: I) -> Self
    where
        I: IntoIterator<Item = (String, FileCoverageRecord)>,
    {
        let mut snapshot = Self {
            total,
            files: Vec::new(),
            index: HashMap::new(),
        };
        for (path, record) in files {
            if path == TOTAL_KEY {
                continue;
            }
            match snapshot.index.get(&path).copied() {
                Some(i) => snapshot.files[i].1 = record,
                None => {
                    snapshot.index.insert(path.clone(), snapshot.files.len());
                    snapshot.files.push((path, record));
                }
            }
        }
        snapshot
    }

    /// Load a snapshot from a summary file on disk
    pub fn from_file<P: AsRef<Path>>(path: P, kind: SnapshotKind) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CoverageError::FileNotFound {
                kind,
                path: path.to_path_buf(),
            });
        }

        let contents = fs::read_to_string(path).map_err(|source| CoverageError::Read {
            kind,
            path: path.to_path_buf(),
            source,
        })?;

        let snapshot = Self::from_json_str(&contents, &path.display().to_string())?;
        tracing::debug!(
            "Loaded {} coverage from {} ({} files)",
            kind,
            path.display(),
            snapshot.len()
        );
        Ok(snapshot)
    }

    /// Parse a snapshot from summary JSON
    ///
    /// `origin` names the document in error messages. A missing, `null`,
    /// `false`, zero, or empty-string `"total"` entry is rejected.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self> {
        let invalid = |source| CoverageError::InvalidJson {
            origin: origin.to_string(),
            source,
        };

        let mut object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).map_err(invalid)?;

        let total_value = object
            .shift_remove(TOTAL_KEY)
            .filter(is_truthy)
            .ok_or(CoverageError::MissingTotal)?;
        let total: FileCoverageRecord = serde_json::from_value(total_value).map_err(invalid)?;

        let mut files = Vec::with_capacity(object.len());
        for (path, value) in object {
            let record: FileCoverageRecord = serde_json::from_value(value).map_err(invalid)?;
            files.push((path, record));
        }

        Ok(Self::new(total, files))
    }

    /// Aggregate record for the whole snapshot
    pub fn total(&self) -> &FileCoverageRecord {
        &self.total
    }

    /// Per-file record for `path`
    pub fn get(&self, path: &str) -> Option<&FileCoverageRecord> {
        self.index.get(path).map(|&i| &self.files[i].1)
    }

    /// Per-file records in source key order, aggregate excluded
    pub fn files(&self) -> impl Iterator<Item = (&str, &FileCoverageRecord)> {
        self.files.iter().map(|(path, record)| (path.as_str(), record))
    }

    /// Number of per-file records
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}
