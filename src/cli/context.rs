//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by check, merge, sweep and event.

use merge_when_green::auth::get_github_auth;
use merge_when_green::config::{Policy, load_policy};
use merge_when_green::error::{Error, Result};
use merge_when_green::merge::PipelineOptions;
use merge_when_green::platform::{GitHubService, PlatformService, parse_repo_info};
use std::path::Path;
use tracing::debug;

/// Shared context for CLI commands that interact with the platform
pub struct CommandContext {
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
    /// Local policy override, if `--policy` was given
    pub policy: Option<Policy>,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// - Parse the repository argument
    /// - Load the local policy override
    /// - Find a token and create the service
    pub async fn new(repo: Option<&str>, host: Option<&str>, policy: Option<&Path>) -> Result<Self> {
        let repo = repo.ok_or_else(|| {
            Error::InvalidRepo(
                "no repository given; pass --repo owner/name or set GITHUB_REPOSITORY".to_string(),
            )
        })?;

        let mut config = parse_repo_info(repo)?;
        if let Some(h) = host {
            config.host = Some(h.to_string());
        }

        let policy = policy.map(load_policy).transpose()?;
        if let Some(ref p) = policy {
            debug!(?p, "using local policy override");
        }

        let auth = get_github_auth(config.host.as_deref()).await?;
        debug!(repo = %config, source = ?auth.source, "creating GitHub service");
        let platform = Box::new(GitHubService::new(&auth.token, config)?);

        Ok(Self { platform, policy })
    }

    /// Pipeline options for this invocation
    pub fn pipeline_options(&self, dry_run: bool) -> PipelineOptions {
        PipelineOptions {
            dry_run,
            policy: self.policy.clone(),
        }
    }
}
