//! merge-when-green: merge labeled pull requests once they are green
//!
//! A pull request opts in by carrying the [`MERGE_LABEL`] label. Each
//! evaluation runs a short, strictly ordered gate pipeline (mergeability and
//! label, required check runs, required commit statuses, optionally pending
//! review requests) and, when every gate is satisfied, merges the pull request
//! and deletes its source branch.
//!
//! The pipeline never talks to GitHub directly; it goes through the
//! [`platform::PlatformService`] trait so that tests can substitute a
//! deterministic implementation.

pub mod auth;
pub mod config;
pub mod error;
pub mod merge;
pub mod platform;
pub mod triggers;
pub mod types;

/// Label that opts a pull request into automatic merging
pub const MERGE_LABEL: &str = "merge-when-green";
