//! Platform services for GitHub
//!
//! Provides the collaborator interface the merge pipeline consumes.

mod detection;
mod github;

pub use detection::parse_repo_info;
pub use github::GitHubService;
pub(crate) use github::api_base_for;

use crate::config::Policy;
use crate::error::Result;
use crate::types::{
    CheckRun, CommitStatus, MergeMethod, MergeResult, PlatformConfig, PullRequest, ReviewRequests,
};
use async_trait::async_trait;

/// Platform service trait for PR operations
///
/// This trait abstracts every remote call the pipeline makes, allowing the
/// same gate logic to run against GitHub or against a deterministic
/// substitute in tests.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;

    /// Resolve the merge policy of the repository
    ///
    /// Implementations apply defaults when the repository has no policy.
    async fn resolve_policy(&self) -> Result<Policy>;

    /// Fetch a single pull request
    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequest>;

    /// List all open pull requests
    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>>;

    // =========================================================================
    // Gate inputs
    // =========================================================================

    /// List the check runs reported against a ref
    async fn list_check_runs(&self, git_ref: &str) -> Result<Vec<CheckRun>>;

    /// Get the statuses of a ref's combined status
    async fn get_combined_status(&self, git_ref: &str) -> Result<Vec<CommitStatus>>;

    /// List reviewers and teams whose requested review is still outstanding
    async fn list_pending_review_requests(&self, pr_number: u64) -> Result<ReviewRequests>;

    // =========================================================================
    // Side effects
    // =========================================================================

    /// Merge a PR with the specified method
    ///
    /// A response with `merged: false` is not an error; callers must inspect it.
    async fn merge_pull_request(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult>;

    /// Delete a branch
    async fn delete_branch(&self, branch: &str) -> Result<()>;
}
