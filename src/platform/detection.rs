//! Repository detection from `owner/name` shorthands and remote URLs

use crate::error::{Error, Result};
use crate::types::PlatformConfig;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static SSH_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[\w.-]+@)?(?P<host>[\w.-]+):(?P<path>[^/].*)$").expect("valid regex")
});

static SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<owner>[\w.-]+)/(?P<repo>[\w.-]+)$").expect("valid regex")
});

/// Parse a repository reference into a `PlatformConfig`
///
/// Accepts:
/// - `owner/repo`
/// - `https://github.com/owner/repo(.git)`
/// - `git@github.com:owner/repo(.git)`
/// - `ssh://git@github.example.com/owner/repo(.git)`
///
/// `github.com` maps to `host: None`; any other host is kept for
/// GitHub Enterprise.
pub fn parse_repo_info(input: &str) -> Result<PlatformConfig> {
    let input = input.trim();

    if let Some(caps) = SHORTHAND.captures(input) {
        return Ok(PlatformConfig {
            owner: caps["owner"].to_string(),
            repo: strip_git_suffix(&caps["repo"]).to_string(),
            host: None,
        });
    }

    let (host, path) = if input.contains("://") {
        let url = Url::parse(input).map_err(|e| Error::InvalidRepo(format!("{input}: {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidRepo(format!("{input}: missing host")))?
            .to_string();
        (host, url.path().to_string())
    } else if let Some(caps) = SSH_REMOTE.captures(input) {
        (caps["host"].to_string(), caps["path"].to_string())
    } else {
        return Err(Error::InvalidRepo(format!(
            "{input}: expected owner/name or a GitHub remote URL"
        )));
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let [owner, repo] = segments.as_slice() else {
        return Err(Error::InvalidRepo(format!(
            "{input}: expected exactly owner and repository in the path"
        )));
    };

    let repo = strip_git_suffix(repo);
    if repo.is_empty() {
        return Err(Error::InvalidRepo(format!("{input}: empty repository name")));
    }

    Ok(PlatformConfig {
        owner: (*owner).to_string(),
        repo: repo.to_string(),
        host: (host != "github.com").then_some(host),
    })
}

fn strip_git_suffix(repo: &str) -> &str {
    repo.strip_suffix(".git").unwrap_or(repo)
}
