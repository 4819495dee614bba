//! Core types for merge-when-green

use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of a pull request, supplied per evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Whether the host considers the PR mergeable
    /// - `Some(true)` = mergeable
    /// - `Some(false)` = has conflicts or is otherwise blocked
    /// - `None` = unknown (GitHub still computing)
    pub mergeable: Option<bool>,
    /// Names of the labels applied to the PR
    pub labels: Vec<String>,
    /// Head branch name
    pub head_ref: String,
    /// Head commit SHA
    pub head_sha: String,
    /// Head branch lives outside the base repository (a fork, or a deleted one)
    pub cross_repository: bool,
    /// Web URL for the PR
    pub html_url: String,
}

impl PullRequest {
    /// Check whether a label with this exact name is applied
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label == name)
    }

    /// Ref to query checks and statuses against
    ///
    /// The branch name only resolves in the base repository when the head
    /// lives there too; fork heads are addressed by commit.
    pub fn status_ref(&self) -> &str {
        if self.cross_repository {
            &self.head_sha
        } else {
            &self.head_ref
        }
    }
}

/// Lifecycle state of a check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Waiting to start
    Queued,
    /// Running
    InProgress,
    /// Finished; see the conclusion
    Completed,
    /// Any other state (waiting, requested, pending, ...)
    #[serde(other)]
    Other,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::InProgress => write!(f, "in progress"),
            Self::Completed => write!(f, "completed"),
            Self::Other => write!(f, "unknown"),
        }
    }
}

/// Outcome of a completed check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    /// Passed
    Success,
    /// Failed
    Failure,
    /// Neither passed nor failed
    Neutral,
    /// Cancelled before finishing
    Cancelled,
    /// Skipped
    Skipped,
    /// Ran out of time
    TimedOut,
    /// Needs a manual action
    ActionRequired,
    /// Superseded
    Stale,
    /// Any conclusion this crate does not know
    #[serde(other)]
    Other,
}

impl fmt::Display for CheckConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Neutral => "neutral",
            Self::Cancelled => "cancelled",
            Self::Skipped => "skipped",
            Self::TimedOut => "timed out",
            Self::ActionRequired => "action required",
            Self::Stale => "stale",
            Self::Other => "unknown",
        };
        f.write_str(text)
    }
}

/// A check run reported against a ref
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check run name (for display only; matching uses `app_login`)
    pub name: String,
    /// Lifecycle state
    pub status: CheckStatus,
    /// Outcome, present once completed
    pub conclusion: Option<CheckConclusion>,
    /// Login of the owner of the app that created the run
    pub app_login: Option<String>,
}

impl CheckRun {
    /// Check if the run completed successfully
    pub fn is_success(&self) -> bool {
        self.status == CheckStatus::Completed && self.conclusion == Some(CheckConclusion::Success)
    }
}

/// State of a commit status context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusState {
    /// Passed
    Success,
    /// Failed
    Failure,
    /// Still running
    Pending,
    /// Errored
    Error,
    /// Any state this crate does not know
    #[serde(other)]
    Other,
}

impl fmt::Display for StatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
            Self::Pending => write!(f, "pending"),
            Self::Error => write!(f, "error"),
            Self::Other => write!(f, "unknown"),
        }
    }
}

/// One entry of a ref's combined status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStatus {
    /// Status context (e.g. `ci/jenkins`)
    pub context: String,
    /// Reported state
    pub state: StatusState,
}

/// Reviewers whose review has been requested but not yet submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequests {
    /// Pending user logins
    pub pending_users: Vec<String>,
    /// Pending team slugs
    pub pending_teams: Vec<String>,
}

impl ReviewRequests {
    /// Check if nobody is left to review
    pub fn is_empty(&self) -> bool {
        self.pending_users.is_empty() && self.pending_teams.is_empty()
    }
}

/// Result of a merge operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Create a merge commit
    #[default]
    Merge,
    /// Squash all commits into one
    Squash,
    /// Rebase commits onto base branch
    Rebase,
}

impl fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}

/// Repository coordinates for the platform service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl fmt::Display for PlatformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
