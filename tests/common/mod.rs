//! Shared test helpers

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{Call, MockPlatformService, Op};

use merge_when_green::MERGE_LABEL;
use merge_when_green::config::Policy;
use merge_when_green::types::{
    CheckConclusion, CheckRun, CheckStatus, CommitStatus, PlatformConfig, PullRequest, StatusState,
};

/// Repository coordinates used by every test
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "owner".to_string(),
        repo: "repo".to_string(),
        host: None,
    }
}

/// A mergeable PR carrying the trigger label
pub fn make_pr(number: u64, head_ref: &str) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR {number}"),
        mergeable: Some(true),
        labels: vec![MERGE_LABEL.to_string()],
        head_ref: head_ref.to_string(),
        head_sha: format!("sha-{head_ref}"),
        cross_repository: false,
        html_url: format!("https://github.com/owner/repo/pull/{number}"),
    }
}

/// Policy requiring the given checks and statuses
pub fn policy(checks: &[&str], statuses: &[&str]) -> Policy {
    Policy {
        required_checks: checks.iter().map(ToString::to_string).collect(),
        required_statuses: statuses.iter().map(ToString::to_string).collect(),
        ..Policy::default()
    }
}

/// A check run from `app` in the given state
pub fn check_run(app: &str, status: CheckStatus, conclusion: Option<CheckConclusion>) -> CheckRun {
    CheckRun {
        name: format!("{app} build"),
        status,
        conclusion,
        app_login: Some(app.to_string()),
    }
}

/// One completed, successful run per app
pub fn success_checks(apps: &[&str]) -> Vec<CheckRun> {
    apps.iter()
        .map(|app| check_run(app, CheckStatus::Completed, Some(CheckConclusion::Success)))
        .collect()
}

/// A status entry
pub fn status(context: &str, state: StatusState) -> CommitStatus {
    CommitStatus {
        context: context.to_string(),
        state,
    }
}

/// One successful status per context
pub fn success_statuses(contexts: &[&str]) -> Vec<CommitStatus> {
    contexts
        .iter()
        .map(|c| status(c, StatusState::Success))
        .collect()
}
