//! GitHub platform service implementation

use crate::config::{LEGACY_POLICY_FILE_PATH, POLICY_FILE_PATH, Policy};
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    CheckConclusion, CheckRun, CheckStatus, CommitStatus, MergeMethod, MergeResult,
    PlatformConfig, PullRequest, ReviewRequests, StatusState,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use octocrab::Octocrab;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

const PUBLIC_API_BASE: &str = "https://api.github.com";

/// Page size for paginated raw requests (GitHub's maximum)
const PER_PAGE: usize = 100;

// REST response types for endpoints fetched with raw requests

#[derive(Deserialize)]
struct CheckRunsResponse {
    total_count: usize,
    check_runs: Vec<ApiCheckRun>,
}

#[derive(Deserialize)]
struct ApiCheckRun {
    name: String,
    status: CheckStatus,
    conclusion: Option<CheckConclusion>,
    app: Option<ApiApp>,
}

#[derive(Deserialize)]
struct ApiApp {
    owner: Option<ApiAccount>,
}

#[derive(Deserialize)]
struct ApiAccount {
    login: String,
}

impl From<ApiCheckRun> for CheckRun {
    fn from(run: ApiCheckRun) -> Self {
        Self {
            name: run.name,
            status: run.status,
            conclusion: run.conclusion,
            app_login: run.app.and_then(|app| app.owner).map(|owner| owner.login),
        }
    }
}

#[derive(Deserialize)]
struct CombinedStatusResponse {
    state: StatusState,
    total_count: usize,
    statuses: Vec<ApiStatus>,
}

#[derive(Deserialize)]
struct ApiStatus {
    context: String,
    state: StatusState,
}

#[derive(Deserialize)]
struct RequestedReviewersResponse {
    users: Vec<ApiAccount>,
    teams: Vec<ApiTeam>,
}

#[derive(Deserialize)]
struct ApiTeam {
    slug: String,
}

#[derive(Deserialize)]
struct ContentResponse {
    content: String,
    encoding: String,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests (checks, statuses, reviewers, contents)
    http_client: Client,
    /// API base URL without trailing slash
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `config.host` selects GitHub Enterprise (`https://{host}/api/v3`);
    /// `None` targets api.github.com.
    pub fn new(token: &str, config: PlatformConfig) -> Result<Self> {
        let api_base = api_base_for(config.host.as_deref());
        Self::with_api_base(token, config, &api_base)
    }

    /// Create a GitHub service against an explicit API base URL
    pub fn with_api_base(token: &str, config: PlatformConfig, api_base: &str) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(&api_base)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("merge-when-green")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.config.owner, self.config.repo, path
        )
    }

    async fn send_get(&self, url: &str) -> Result<reqwest::Response> {
        self.http_client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("GET {url} failed: {e}")))
    }

    /// Fail when only the YAML policy exists, so its gates are not silently dropped
    async fn reject_legacy_policy(&self) -> Result<()> {
        let url = self.repo_url(&format!("contents/{LEGACY_POLICY_FILE_PATH}"));
        let status = self.send_get(&url).await?.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        if status.is_success() {
            return Err(Error::Config(format!(
                "found {LEGACY_POLICY_FILE_PATH}; move its settings to {POLICY_FILE_PATH}"
            )));
        }
        Err(Error::GitHubApi(format!(
            "Failed to fetch {LEGACY_POLICY_FILE_PATH}: HTTP {status}"
        )))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let response = self.send_get(url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::GitHubApi(format!(
                "Failed to fetch {what}: HTTP {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse {what}: {e}")))
    }
}

/// REST API base URL for github.com or a GitHub Enterprise host
pub(crate) fn api_base_for(host: Option<&str>) -> String {
    host.map_or_else(
        || PUBLIC_API_BASE.to_string(),
        |h| format!("https://{h}/api/v3"),
    )
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        mergeable: pr.mergeable,
        labels: pr
            .labels
            .as_ref()
            .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default(),
        head_ref: pr.head.ref_field.clone(),
        head_sha: pr.head.sha.clone(),
        cross_repository: is_cross_repository(pr),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
    }
}

/// A missing head repository means the fork was deleted
fn is_cross_repository(pr: &octocrab::models::pulls::PullRequest) -> bool {
    match (&pr.head.repo, &pr.base.repo) {
        (None, _) => true,
        (Some(head), Some(base)) => head.id != base.id,
        (Some(_), None) => false,
    }
}

fn decode_content(body: &ContentResponse) -> Result<String> {
    if body.encoding != "base64" {
        return Err(Error::Config(format!(
            "{POLICY_FILE_PATH}: unsupported content encoding {}",
            body.encoding
        )));
    }

    let compact: String = body.content.split_whitespace().collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| Error::Config(format!("{POLICY_FILE_PATH}: invalid base64: {e}")))?;

    String::from_utf8(bytes)
        .map_err(|e| Error::Config(format!("{POLICY_FILE_PATH}: not UTF-8: {e}")))
}

#[async_trait]
impl PlatformService for GitHubService {
    fn config(&self) -> &PlatformConfig {
        &self.config
    }

    async fn resolve_policy(&self) -> Result<Policy> {
        debug!(path = POLICY_FILE_PATH, "resolving policy");
        let url = self.repo_url(&format!("contents/{POLICY_FILE_PATH}"));
        let response = self.send_get(&url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            self.reject_legacy_policy().await?;
            info!(repo = %self.config, "no policy file, using defaults");
            return Ok(Policy::default());
        }

        let status = response.status();
        if !status.is_success() {
            return Err(Error::GitHubApi(format!(
                "Failed to fetch {POLICY_FILE_PATH}: HTTP {status}"
            )));
        }

        let body: ContentResponse = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse contents response: {e}")))?;

        let policy = Policy::from_toml_str(&decode_content(&body)?)?;
        debug!(?policy, "resolved policy");
        Ok(policy)
    }

    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequest> {
        debug!(pr_number, "getting PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr_number)
            .await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number, mergeable = ?result.mergeable, "got PR");
        Ok(result)
    }

    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>> {
        debug!("listing open PRs");
        let page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Open)
            .per_page(100)
            .send()
            .await?;

        let prs = self.client.all_pages(page).await?;
        let result: Vec<PullRequest> = prs.iter().map(pr_from_octocrab).collect();
        debug!(count = result.len(), "listed open PRs");
        Ok(result)
    }

    async fn list_check_runs(&self, git_ref: &str) -> Result<Vec<CheckRun>> {
        debug!(git_ref, "listing check runs");
        let base = self.repo_url(&format!(
            "commits/{}/check-runs",
            urlencoding::encode(git_ref)
        ));

        let mut runs: Vec<CheckRun> = Vec::new();
        for page in 1.. {
            let url = format!("{base}?per_page={PER_PAGE}&page={page}");
            let response: CheckRunsResponse = self.get_json(&url, "check runs").await?;
            let fetched = response.check_runs.len();
            runs.extend(response.check_runs.into_iter().map(CheckRun::from));

            if fetched < PER_PAGE || runs.len() >= response.total_count {
                break;
            }
        }

        debug!(git_ref, count = runs.len(), "listed check runs");
        Ok(runs)
    }

    async fn get_combined_status(&self, git_ref: &str) -> Result<Vec<CommitStatus>> {
        debug!(git_ref, "getting combined status");
        let base = self.repo_url(&format!("commits/{}/status", urlencoding::encode(git_ref)));

        let mut statuses: Vec<CommitStatus> = Vec::new();
        for page in 1.. {
            let url = format!("{base}?per_page={PER_PAGE}&page={page}");
            let response: CombinedStatusResponse =
                self.get_json(&url, "combined status").await?;
            let fetched = response.statuses.len();
            if page == 1 {
                debug!(git_ref, state = %response.state, "combined state");
            }
            statuses.extend(response.statuses.into_iter().map(|s| CommitStatus {
                context: s.context,
                state: s.state,
            }));

            if fetched < PER_PAGE || statuses.len() >= response.total_count {
                break;
            }
        }

        debug!(git_ref, count = statuses.len(), "got combined status");
        Ok(statuses)
    }

    async fn list_pending_review_requests(&self, pr_number: u64) -> Result<ReviewRequests> {
        debug!(pr_number, "listing review requests");
        let url = self.repo_url(&format!("pulls/{pr_number}/requested_reviewers"));

        let response: RequestedReviewersResponse =
            self.get_json(&url, "requested reviewers").await?;
        let requests = ReviewRequests {
            pending_users: response.users.into_iter().map(|u| u.login).collect(),
            pending_teams: response.teams.into_iter().map(|t| t.slug).collect(),
        };

        debug!(
            pr_number,
            users = requests.pending_users.len(),
            teams = requests.pending_teams.len(),
            "listed review requests"
        );
        Ok(requests)
    }

    async fn merge_pull_request(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        debug!(pr_number, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .merge(pr_number)
            .method(octocrab_method)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    async fn delete_branch(&self, branch: &str) -> Result<()> {
        debug!(branch, "deleting branch");
        self.client
            .repos(&self.config.owner, &self.config.repo)
            .delete_ref(&octocrab::params::repos::Reference::Branch(
                branch.to_string(),
            ))
            .await?;
        debug!(branch, "deleted branch");
        Ok(())
    }
}
