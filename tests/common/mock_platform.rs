//! In-memory `PlatformService` that records every call in order

use async_trait::async_trait;
use merge_when_green::config::Policy;
use merge_when_green::error::{Error, Result};
use merge_when_green::platform::PlatformService;
use merge_when_green::types::{
    CheckRun, CommitStatus, MergeMethod, MergeResult, PlatformConfig, PullRequest, ReviewRequests,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Platform operations, for error injection and call filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ResolvePolicy,
    GetPullRequest,
    ListOpenPullRequests,
    ListCheckRuns,
    GetCombinedStatus,
    ListReviewRequests,
    Merge,
    DeleteBranch,
}

/// Recorded call, in the order it was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ResolvePolicy,
    GetPullRequest(u64),
    ListOpenPullRequests,
    ListCheckRuns(String),
    GetCombinedStatus(String),
    ListReviewRequests(u64),
    Merge { pr_number: u64, method: MergeMethod },
    DeleteBranch(String),
}

impl Call {
    /// Operation this call belongs to
    pub const fn op(&self) -> Op {
        match self {
            Self::ResolvePolicy => Op::ResolvePolicy,
            Self::GetPullRequest(_) => Op::GetPullRequest,
            Self::ListOpenPullRequests => Op::ListOpenPullRequests,
            Self::ListCheckRuns(_) => Op::ListCheckRuns,
            Self::GetCombinedStatus(_) => Op::GetCombinedStatus,
            Self::ListReviewRequests(_) => Op::ListReviewRequests,
            Self::Merge { .. } => Op::Merge,
            Self::DeleteBranch(_) => Op::DeleteBranch,
        }
    }
}

/// Simple mock platform service for testing
///
/// Features:
/// - Configurable responses (one repository, many PRs)
/// - Ordered call recording for verification
/// - Error injection per operation
pub struct MockPlatformService {
    config: PlatformConfig,
    policy: Mutex<Policy>,
    pull_requests: Mutex<HashMap<u64, PullRequest>>,
    open_pull_requests: Mutex<Vec<PullRequest>>,
    check_runs: Mutex<Vec<CheckRun>>,
    statuses: Mutex<Vec<CommitStatus>>,
    review_requests: Mutex<ReviewRequests>,
    merge_response: Mutex<MergeResult>,
    calls: Mutex<Vec<Call>>,
    errors: Mutex<HashMap<Op, String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    ///
    /// Defaults: default policy, no check runs, no statuses, no pending
    /// reviewers, merges succeed.
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            policy: Mutex::new(Policy::default()),
            pull_requests: Mutex::new(HashMap::new()),
            open_pull_requests: Mutex::new(Vec::new()),
            check_runs: Mutex::new(Vec::new()),
            statuses: Mutex::new(Vec::new()),
            review_requests: Mutex::new(ReviewRequests::default()),
            merge_response: Mutex::new(MergeResult {
                merged: true,
                sha: Some("merged_sha".to_string()),
                message: Some("Pull Request successfully merged".to_string()),
            }),
            calls: Mutex::new(Vec::new()),
            errors: Mutex::new(HashMap::new()),
        }
    }

    // === Response setup ===

    /// Set the policy returned by `resolve_policy`
    pub fn set_policy(&self, policy: Policy) {
        *self.policy.lock().unwrap() = policy;
    }

    /// Register a PR for `get_pull_request`
    pub fn add_pull_request(&self, pr: PullRequest) {
        self.pull_requests.lock().unwrap().insert(pr.number, pr);
    }

    /// Set the list returned by `list_open_pull_requests`
    pub fn set_open_pull_requests(&self, prs: Vec<PullRequest>) {
        *self.open_pull_requests.lock().unwrap() = prs;
    }

    /// Set the check runs returned for any ref
    pub fn set_check_runs(&self, runs: Vec<CheckRun>) {
        *self.check_runs.lock().unwrap() = runs;
    }

    /// Set the statuses returned for any ref
    pub fn set_statuses(&self, statuses: Vec<CommitStatus>) {
        *self.statuses.lock().unwrap() = statuses;
    }

    /// Set the pending review requests
    pub fn set_review_requests(&self, users: &[&str], teams: &[&str]) {
        *self.review_requests.lock().unwrap() = ReviewRequests {
            pending_users: users.iter().map(ToString::to_string).collect(),
            pending_teams: teams.iter().map(ToString::to_string).collect(),
        };
    }

    /// Set the response of `merge_pull_request`
    pub fn set_merge_response(&self, result: MergeResult) {
        *self.merge_response.lock().unwrap() = result;
    }

    // === Error injection ===

    /// Make an operation return `Error::Platform(msg)`
    pub fn fail(&self, op: Op, msg: &str) {
        self.errors.lock().unwrap().insert(op, msg.to_string());
    }

    // === Call verification ===

    /// All calls, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls of one operation
    pub fn calls_of(&self, op: Op) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.op() == op).collect()
    }

    /// Number of calls of one operation
    pub fn call_count(&self, op: Op) -> usize {
        self.calls_of(op).len()
    }

    /// Assert that nothing remote was called
    pub fn assert_no_calls(&self) {
        let calls = self.calls();
        assert!(calls.is_empty(), "Expected no platform calls but got: {calls:?}");
    }

    /// Assert that the merge was issued for a PR
    pub fn assert_merge_called(&self, pr_number: u64) {
        let calls = self.calls_of(Op::Merge);
        assert!(
            calls
                .iter()
                .any(|c| matches!(c, Call::Merge { pr_number: n, .. } if *n == pr_number)),
            "Expected merge_pull_request({pr_number}) but got: {calls:?}"
        );
    }

    /// Assert that neither merge nor branch deletion happened
    pub fn assert_untouched(&self) {
        let calls = self.calls();
        assert!(
            !calls
                .iter()
                .any(|c| matches!(c.op(), Op::Merge | Op::DeleteBranch)),
            "Expected no merge or delete but got: {calls:?}"
        );
    }

    fn record(&self, call: Call) -> Result<()> {
        let op = call.op();
        self.calls.lock().unwrap().push(call);

        if let Some(msg) = self.errors.lock().unwrap().get(&op) {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    fn config(&self) -> &PlatformConfig {
        &self.config
    }

    async fn resolve_policy(&self) -> Result<Policy> {
        self.record(Call::ResolvePolicy)?;
        Ok(self.policy.lock().unwrap().clone())
    }

    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequest> {
        self.record(Call::GetPullRequest(pr_number))?;
        self.pull_requests
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .ok_or_else(|| {
                Error::Platform(format!(
                    "get_pull_request: no response configured for PR #{pr_number}"
                ))
            })
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>> {
        self.record(Call::ListOpenPullRequests)?;
        Ok(self.open_pull_requests.lock().unwrap().clone())
    }

    async fn list_check_runs(&self, git_ref: &str) -> Result<Vec<CheckRun>> {
        self.record(Call::ListCheckRuns(git_ref.to_string()))?;
        Ok(self.check_runs.lock().unwrap().clone())
    }

    async fn get_combined_status(&self, git_ref: &str) -> Result<Vec<CommitStatus>> {
        self.record(Call::GetCombinedStatus(git_ref.to_string()))?;
        Ok(self.statuses.lock().unwrap().clone())
    }

    async fn list_pending_review_requests(&self, pr_number: u64) -> Result<ReviewRequests> {
        self.record(Call::ListReviewRequests(pr_number))?;
        Ok(self.review_requests.lock().unwrap().clone())
    }

    async fn merge_pull_request(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        self.record(Call::Merge { pr_number, method })?;
        Ok(self.merge_response.lock().unwrap().clone())
    }

    async fn delete_branch(&self, branch: &str) -> Result<()> {
        self.record(Call::DeleteBranch(branch.to_string()))
    }
}
