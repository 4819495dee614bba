//! Webhook events that can make a pull request green
//!
//! Parsing is pure: an event name and its JSON payload become a [`Trigger`]
//! naming the pull requests worth evaluating. Resolution then turns the
//! trigger into fresh `PullRequest` snapshots through the platform service.
//! Delivery, signature checks and retries belong to whatever receives the
//! webhook.

use crate::MERGE_LABEL;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{PullRequest, StatusState};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Pull requests an event asks to evaluate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Evaluate these PR numbers
    PullRequests(Vec<u64>),
    /// Evaluate open, labeled PRs whose head is this commit
    HeadSha(String),
    /// Nothing to do
    Ignored(String),
}

#[derive(Deserialize)]
struct PayloadPullRequest {
    number: u64,
}

#[derive(Deserialize)]
struct PayloadLabel {
    name: String,
}

#[derive(Deserialize)]
struct PullRequestEvent {
    action: String,
    pull_request: PayloadPullRequest,
    label: Option<PayloadLabel>,
}

#[derive(Deserialize)]
struct PullRequestReviewEvent {
    action: String,
    pull_request: PayloadPullRequest,
}

#[derive(Deserialize)]
struct CheckPayload {
    #[serde(default)]
    pull_requests: Vec<PayloadPullRequest>,
}

#[derive(Deserialize)]
struct CheckRunEvent {
    action: String,
    check_run: CheckPayload,
}

#[derive(Deserialize)]
struct CheckSuiteEvent {
    action: String,
    check_suite: CheckPayload,
}

#[derive(Deserialize)]
struct StatusEvent {
    sha: String,
    state: StatusState,
}

fn parse_payload<T: DeserializeOwned>(event: &str, payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).map_err(|e| Error::Event(format!("{event}: {e}")))
}

fn numbers(prs: Vec<PayloadPullRequest>) -> Vec<u64> {
    let mut numbers: Vec<u64> = prs.into_iter().map(|pr| pr.number).collect();
    numbers.sort_unstable();
    numbers.dedup();
    numbers
}

/// Map a webhook event (the `X-GitHub-Event` name) and payload to a trigger
pub fn parse_event(event: &str, payload: &[u8]) -> Result<Trigger> {
    let trigger = match event {
        "pull_request" => {
            let ev: PullRequestEvent = parse_payload(event, payload)?;
            match ev.action.as_str() {
                "labeled" => match ev.label {
                    Some(label) if label.name == MERGE_LABEL => {
                        Trigger::PullRequests(vec![ev.pull_request.number])
                    }
                    _ => Trigger::Ignored("label is not the trigger label".to_string()),
                },
                "opened" | "reopened" | "synchronize" | "ready_for_review" => {
                    Trigger::PullRequests(vec![ev.pull_request.number])
                }
                other => Trigger::Ignored(format!("pull_request action '{other}'")),
            }
        }
        "pull_request_review" => {
            let ev: PullRequestReviewEvent = parse_payload(event, payload)?;
            match ev.action.as_str() {
                "submitted" | "dismissed" => Trigger::PullRequests(vec![ev.pull_request.number]),
                other => Trigger::Ignored(format!("pull_request_review action '{other}'")),
            }
        }
        "check_run" => {
            let ev: CheckRunEvent = parse_payload(event, payload)?;
            if ev.action == "completed" {
                Trigger::PullRequests(numbers(ev.check_run.pull_requests))
            } else {
                Trigger::Ignored(format!("check_run action '{}'", ev.action))
            }
        }
        "check_suite" => {
            let ev: CheckSuiteEvent = parse_payload(event, payload)?;
            if ev.action == "completed" {
                Trigger::PullRequests(numbers(ev.check_suite.pull_requests))
            } else {
                Trigger::Ignored(format!("check_suite action '{}'", ev.action))
            }
        }
        "status" => {
            let ev: StatusEvent = parse_payload(event, payload)?;
            if ev.state == StatusState::Success {
                Trigger::HeadSha(ev.sha)
            } else {
                Trigger::Ignored(format!("status is {}", ev.state))
            }
        }
        other => Trigger::Ignored(format!("event '{other}'")),
    };

    debug!(event, ?trigger, "parsed event");
    Ok(trigger)
}

/// Fetch fresh snapshots of the pull requests a trigger names
///
/// Each PR is fetched individually because list responses do not carry the
/// mergeable flag.
pub async fn resolve_trigger(
    platform: &dyn PlatformService,
    trigger: &Trigger,
) -> Result<Vec<PullRequest>> {
    let numbers: Vec<u64> = match trigger {
        Trigger::Ignored(_) => return Ok(Vec::new()),
        Trigger::PullRequests(numbers) => numbers.clone(),
        Trigger::HeadSha(sha) => platform
            .list_open_pull_requests()
            .await?
            .into_iter()
            .filter(|pr| &pr.head_sha == sha && pr.has_label(MERGE_LABEL))
            .map(|pr| pr.number)
            .collect(),
    };

    let mut prs = Vec::with_capacity(numbers.len());
    for number in numbers {
        prs.push(platform.get_pull_request(number).await?);
    }
    Ok(prs)
}

/// Fetch fresh snapshots of every open PR carrying the trigger label
pub async fn labeled_pull_requests(platform: &dyn PlatformService) -> Result<Vec<PullRequest>> {
    let numbers: Vec<u64> = platform
        .list_open_pull_requests()
        .await?
        .into_iter()
        .filter(|pr| pr.has_label(MERGE_LABEL))
        .map(|pr| pr.number)
        .collect();

    resolve_trigger(platform, &Trigger::PullRequests(numbers)).await
}
