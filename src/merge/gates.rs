//! Gate evaluation - pure functions deciding each pipeline stage
//!
//! No I/O happens here. The pipeline fetches the inputs and hands them in,
//! which keeps every decision unit-testable on its own.

use crate::MERGE_LABEL;
use crate::types::{
    CheckConclusion, CheckRun, CheckStatus, CommitStatus, PullRequest, ReviewRequests, StatusState,
};
use std::fmt;

/// Pipeline stages, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Mergeable flag and trigger label
    Eligibility,
    /// Required check runs
    CheckRuns,
    /// Required commit statuses
    CommitStatuses,
    /// Outstanding review requests
    Reviews,
    /// The merge call itself
    Merge,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eligibility => write!(f, "eligibility"),
            Self::CheckRuns => write!(f, "check runs"),
            Self::CommitStatuses => write!(f, "commit statuses"),
            Self::Reviews => write!(f, "reviews"),
            Self::Merge => write!(f, "merge"),
        }
    }
}

/// Why a required check run does not count as passed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckFailure {
    /// No run from this app was reported
    Missing,
    /// A run from this app has not finished
    NotCompleted(CheckStatus),
    /// A run from this app finished without success
    Unsuccessful(Option<CheckConclusion>),
}

/// Reason a gate was not satisfied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The host does not report the PR as mergeable (`None` = still computing)
    NotMergeable {
        /// Reported mergeable flag
        mergeable: Option<bool>,
    },
    /// The trigger label is not applied
    MissingLabel,
    /// A required check run has not passed
    CheckNotPassed {
        /// Required app login
        name: String,
        /// What is wrong with it
        failure: CheckFailure,
    },
    /// A required status context has not passed
    StatusNotPassed {
        /// Required context
        context: String,
        /// Offending state, `None` when the context was not reported at all
        state: Option<StatusState>,
    },
    /// Requested reviewers have not reviewed yet
    ReviewsPending {
        /// Pending user logins
        users: Vec<String>,
        /// Pending team slugs
        teams: Vec<String>,
    },
    /// The host answered the merge call without merging
    MergeNotPerformed {
        /// Message returned by the host
        message: Option<String>,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMergeable { mergeable: None } => {
                write!(f, "Merge status unknown (still computing)")
            }
            Self::NotMergeable { .. } => write!(f, "Not mergeable"),
            Self::MissingLabel => write!(f, "Missing label '{MERGE_LABEL}'"),
            Self::CheckNotPassed { name, failure } => match failure {
                CheckFailure::Missing => write!(f, "Check '{name}' has not reported"),
                CheckFailure::NotCompleted(status) => {
                    write!(f, "Check '{name}' is {status}")
                }
                CheckFailure::Unsuccessful(Some(conclusion)) => {
                    write!(f, "Check '{name}' concluded {conclusion}")
                }
                CheckFailure::Unsuccessful(None) => {
                    write!(f, "Check '{name}' completed without a conclusion")
                }
            },
            Self::StatusNotPassed {
                context,
                state: None,
            } => write!(f, "Status '{context}' has not reported"),
            Self::StatusNotPassed {
                context,
                state: Some(state),
            } => write!(f, "Status '{context}' is {state}"),
            Self::ReviewsPending { users, teams } => {
                let mut pending: Vec<String> = users.clone();
                pending.extend(teams.iter().map(|t| format!("team {t}")));
                write!(f, "Waiting for review from {}", pending.join(", "))
            }
            Self::MergeNotPerformed { message: Some(msg) } => {
                write!(f, "Merge not performed: {msg}")
            }
            Self::MergeNotPerformed { message: None } => write!(f, "Merge not performed"),
        }
    }
}

/// Verdict of a single gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateResult {
    /// Continue to the next stage
    Satisfied,
    /// Stop; every failing requirement of the gate is listed
    Unsatisfied(Vec<SkipReason>),
}

impl GateResult {
    fn from_reasons(reasons: Vec<SkipReason>) -> Self {
        if reasons.is_empty() {
            Self::Satisfied
        } else {
            Self::Unsatisfied(reasons)
        }
    }

    /// Check if the gate let the pipeline continue
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }

    /// Reasons the gate stopped the pipeline (empty when satisfied)
    pub fn reasons(&self) -> &[SkipReason] {
        match self {
            Self::Satisfied => &[],
            Self::Unsatisfied(reasons) => reasons,
        }
    }
}

/// Local eligibility: mergeable and labeled
///
/// Only `mergeable == Some(true)` counts; an unknown flag is treated as not
/// ready.
pub fn check_eligibility(pr: &PullRequest) -> GateResult {
    let mut reasons = Vec::new();
    if pr.mergeable != Some(true) {
        reasons.push(SkipReason::NotMergeable {
            mergeable: pr.mergeable,
        });
    }
    if !pr.has_label(MERGE_LABEL) {
        reasons.push(SkipReason::MissingLabel);
    }
    GateResult::from_reasons(reasons)
}

/// Every required app must have at least one check run, and all of its runs
/// must have completed successfully
pub fn evaluate_check_runs(required: &[String], runs: &[CheckRun]) -> GateResult {
    let reasons = required
        .iter()
        .filter_map(|name| {
            check_failure(name, runs).map(|failure| SkipReason::CheckNotPassed {
                name: name.clone(),
                failure,
            })
        })
        .collect();
    GateResult::from_reasons(reasons)
}

fn check_failure(name: &str, runs: &[CheckRun]) -> Option<CheckFailure> {
    let mut matching = runs
        .iter()
        .filter(|run| run.app_login.as_deref() == Some(name))
        .peekable();

    if matching.peek().is_none() {
        return Some(CheckFailure::Missing);
    }

    matching.find(|run| !run.is_success()).map(|run| {
        if run.status == CheckStatus::Completed {
            CheckFailure::Unsuccessful(run.conclusion)
        } else {
            CheckFailure::NotCompleted(run.status)
        }
    })
}

/// Every required context must be reported, and every report of it must be
/// `success`
pub fn evaluate_commit_statuses(required: &[String], statuses: &[CommitStatus]) -> GateResult {
    let reasons = required
        .iter()
        .filter_map(|context| {
            let mut matching = statuses.iter().filter(|s| &s.context == context).peekable();
            if matching.peek().is_none() {
                return Some(SkipReason::StatusNotPassed {
                    context: context.clone(),
                    state: None,
                });
            }
            matching
                .find(|s| s.state != StatusState::Success)
                .map(|s| SkipReason::StatusNotPassed {
                    context: context.clone(),
                    state: Some(s.state),
                })
        })
        .collect();
    GateResult::from_reasons(reasons)
}

/// No user or team may still have an outstanding review request
pub fn evaluate_review_requests(requests: &ReviewRequests) -> GateResult {
    if requests.is_empty() {
        GateResult::Satisfied
    } else {
        GateResult::Unsatisfied(vec![SkipReason::ReviewsPending {
            users: requests.pending_users.clone(),
            teams: requests.pending_teams.clone(),
        }])
    }
}
