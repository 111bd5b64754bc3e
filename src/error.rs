//! Fatal errors for a coverage gate run
//!
//! Every variant here aborts the run before any output is emitted. The one
//! recoverable failure (an exclusion pattern that does not compile) is logged
//! and dropped in [`crate::exclusion`] instead of surfacing as an error.

use std::path::PathBuf;
use thiserror::Error;

/// Which of the two coverage snapshots an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    /// Snapshot taken on the base branch
    Base,
    /// Snapshot taken on the proposed change
    Candidate,
}

impl std::fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotKind::Base => write!(f, "Base"),
            SnapshotKind::Candidate => write!(f, "Candidate"),
        }
    }
}

/// Errors that abort a coverage gate run
#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("{kind} coverage file not found: {}", path.display())]
    FileNotFound { kind: SnapshotKind, path: PathBuf },

    #[error("Failed to read {kind} coverage file {}: {source}", path.display())]
    Read {
        kind: SnapshotKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid coverage JSON in {origin}: {source}")]
    InvalidJson {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Coverage files are missing 'total' property")]
    MissingTotal,

    #[error("Invalid gate configuration file {}: {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },
}

/// Result type for coverage gate operations
pub type Result<T> = std::result::Result<T, CoverageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_message_names_kind_and_path() {
        let err = CoverageError::FileNotFound {
            kind: SnapshotKind::Base,
            path: PathBuf::from("coverage-base/coverage-summary.json"),
        };
        assert_eq!(
            err.to_string(),
            "Base coverage file not found: coverage-base/coverage-summary.json"
        );
    }

    #[test]
    fn test_missing_total_message() {
        assert_eq!(
            CoverageError::MissingTotal.to_string(),
            "Coverage files are missing 'total' property"
        );
    }

    #[test]
    fn test_candidate_kind_display() {
        let err = CoverageError::FileNotFound {
            kind: SnapshotKind::Candidate,
            path: PathBuf::from("c.json"),
        };
        assert!(err.to_string().starts_with("Candidate coverage file not found"));
    }
}
