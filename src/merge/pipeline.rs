//! The merge-when-green pipeline
//!
//! Linear chain `Eligible -> ChecksOk -> StatusesOk -> ReviewsOk -> Merged ->
//! BranchDeleted`. Each stage is reachable only from its predecessor, and any
//! unsatisfied gate ends the run in `Skipped` without side effects.
//!
//! Remote calls are strictly sequential: check runs, combined status, review
//! requests (only when the policy asks for them), merge, branch deletion.

use crate::config::Policy;
use crate::error::Result;
use crate::merge::{
    GateResult, MergeExecutionResult, ProgressCallback, SkipReason, Stage, check_eligibility,
    evaluate_check_runs, evaluate_commit_statuses, evaluate_review_requests, execute_merge,
};
use crate::platform::PlatformService;
use crate::types::PullRequest;
use tracing::{debug, info};

/// Options for a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Evaluate every gate but never merge or delete
    pub dry_run: bool,
    /// Use this policy instead of resolving the repository's own
    pub policy: Option<Policy>,
}

/// Terminal state of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// A gate was not satisfied; nothing was changed
    Skipped {
        /// Stage that stopped the run
        stage: Stage,
        /// Why it stopped
        reasons: Vec<SkipReason>,
    },
    /// Dry run: every gate is satisfied
    Ready,
    /// Merged; the source branch was deleted unless it lives in a fork
    Merged {
        /// SHA of the merge commit, when reported
        sha: Option<String>,
        /// Branch that was deleted
        deleted_branch: Option<String>,
    },
}

impl PipelineOutcome {
    /// Check if the run merged the PR
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }

    /// Check if the run stopped at a gate
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// Stage that stopped the run, if any
    #[must_use]
    pub const fn skipped_stage(&self) -> Option<Stage> {
        match self {
            Self::Skipped { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

fn gate(pr: &PullRequest, stage: Stage, result: GateResult) -> Option<PipelineOutcome> {
    match result {
        GateResult::Satisfied => {
            debug!(pr_number = pr.number, %stage, "gate satisfied");
            None
        }
        GateResult::Unsatisfied(reasons) => {
            info!(
                pr_number = pr.number,
                %stage,
                reasons = ?reasons.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "skipping PR"
            );
            Some(PipelineOutcome::Skipped { stage, reasons })
        }
    }
}

/// Decide whether a PR is green and, if so, merge it and delete its branch
///
/// The eligibility gate runs before anything remote, including policy
/// resolution. Unsatisfied gates are `Ok(Skipped)`; collaborator failures are
/// returned as `Err` and stop the run without retry.
pub async fn merge_when_green(
    platform: &dyn PlatformService,
    pr: &PullRequest,
    options: &PipelineOptions,
    progress: &dyn ProgressCallback,
) -> Result<PipelineOutcome> {
    progress.on_stage(Stage::Eligibility).await;
    if let Some(outcome) = gate(pr, Stage::Eligibility, check_eligibility(pr)) {
        return Ok(outcome);
    }

    let policy = match &options.policy {
        Some(policy) => policy.clone(),
        None => platform.resolve_policy().await?,
    };

    progress.on_stage(Stage::CheckRuns).await;
    let runs = platform.list_check_runs(pr.status_ref()).await?;
    let result = evaluate_check_runs(&policy.required_checks, &runs);
    if let Some(outcome) = gate(pr, Stage::CheckRuns, result) {
        return Ok(outcome);
    }

    progress.on_stage(Stage::CommitStatuses).await;
    let statuses = platform.get_combined_status(pr.status_ref()).await?;
    let result = evaluate_commit_statuses(&policy.required_statuses, &statuses);
    if let Some(outcome) = gate(pr, Stage::CommitStatuses, result) {
        return Ok(outcome);
    }

    if policy.require_approval_from_requested_reviewers {
        progress.on_stage(Stage::Reviews).await;
        let requests = platform.list_pending_review_requests(pr.number).await?;
        if let Some(outcome) = gate(pr, Stage::Reviews, evaluate_review_requests(&requests)) {
            return Ok(outcome);
        }
    }

    if options.dry_run {
        info!(pr_number = pr.number, "all gates satisfied (dry run)");
        return Ok(PipelineOutcome::Ready);
    }

    match execute_merge(platform, pr, policy.merge_method, progress).await? {
        MergeExecutionResult::Merged {
            sha,
            deleted_branch,
        } => Ok(PipelineOutcome::Merged {
            sha,
            deleted_branch,
        }),
        MergeExecutionResult::NotMerged { message } => Ok(PipelineOutcome::Skipped {
            stage: Stage::Merge,
            reasons: vec![SkipReason::MergeNotPerformed { message }],
        }),
    }
}
