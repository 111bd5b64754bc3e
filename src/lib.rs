//! Covgate - coverage regression gate for pull requests
//!
//! This library compares a candidate coverage summary against a base-branch
//! summary, flags files and totals that regressed beyond configured
//! tolerances, and renders a markdown report for posting as a PR comment.

pub mod cli;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod gate;
pub mod output;
pub mod snapshot;
