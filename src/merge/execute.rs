//! Merge execution - effectful operations
//!
//! Performs the merge once every gate is satisfied and, only when the host
//! confirms the merge, deletes the source branch. Branches in forks are
//! never touched.

use crate::error::Result;
use crate::merge::{ProgressCallback, Stage};
use crate::platform::PlatformService;
use crate::types::{MergeMethod, PullRequest};
use tracing::{info, warn};

/// Result of merge execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeExecutionResult {
    /// Merged; the source branch was deleted unless it lives in a fork
    Merged {
        /// SHA of the merge commit, when reported
        sha: Option<String>,
        /// Branch that was deleted
        deleted_branch: Option<String>,
    },
    /// The merge call returned `merged: false`; the branch was left alone
    NotMerged {
        /// Message returned by the host
        message: Option<String>,
    },
}

impl MergeExecutionResult {
    /// Check if the PR was merged
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }
}

/// Merge the PR and clean up its branch (EFFECTFUL)
///
/// Issues exactly one merge call. Branch deletion happens only after the
/// host reports `merged: true`. Errors from either call are returned as-is.
pub async fn execute_merge(
    platform: &dyn PlatformService,
    pr: &PullRequest,
    method: MergeMethod,
    progress: &dyn ProgressCallback,
) -> Result<MergeExecutionResult> {
    progress.on_stage(Stage::Merge).await;
    progress
        .on_message(&format!("Merging PR #{} ({method})", pr.number))
        .await;

    let merge_result = platform.merge_pull_request(pr.number, method).await?;

    if !merge_result.merged {
        warn!(
            pr_number = pr.number,
            message = ?merge_result.message,
            "merge call returned without merging, keeping branch"
        );
        return Ok(MergeExecutionResult::NotMerged {
            message: merge_result.message,
        });
    }

    let sha_display = merge_result.sha.as_deref().unwrap_or("(no sha)");
    progress.on_message(&format!("Merged: {sha_display}")).await;

    if pr.cross_repository {
        info!(
            pr_number = pr.number,
            branch = %pr.head_ref,
            "merged; head branch is outside this repository, leaving it"
        );
        return Ok(MergeExecutionResult::Merged {
            sha: merge_result.sha,
            deleted_branch: None,
        });
    }

    platform.delete_branch(&pr.head_ref).await?;
    progress
        .on_message(&format!("Deleted branch {}", pr.head_ref))
        .await;

    info!(pr_number = pr.number, branch = %pr.head_ref, "merged and deleted branch");
    Ok(MergeExecutionResult::Merged {
        sha: merge_result.sha,
        deleted_branch: Some(pr.head_ref.clone()),
    })
}
