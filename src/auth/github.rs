//! GitHub token discovery

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use crate::platform::api_base_for;
use octocrab::Octocrab;
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_ENV_VARS: [&str; 2] = ["GH_TOKEN", "GITHUB_TOKEN"];

/// GitHub authentication configuration
#[derive(Clone)]
pub struct GitHubAuthConfig {
    /// API token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
    /// Enterprise host the token is for (None for github.com)
    pub host: Option<String>,
}

impl std::fmt::Debug for GitHubAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthConfig")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .field("host", &self.host)
            .finish()
    }
}

/// Find a GitHub token
///
/// Checks `GH_TOKEN` and `GITHUB_TOKEN`, then falls back to `gh auth token`.
pub async fn get_github_auth(host: Option<&str>) -> Result<GitHubAuthConfig> {
    for var in TOKEN_ENV_VARS {
        if let Ok(token) = std::env::var(var) {
            let token = token.trim().to_string();
            if !token.is_empty() {
                debug!(var, "using token from environment");
                return Ok(GitHubAuthConfig {
                    token,
                    source: AuthSource::EnvVar,
                    host: host.map(String::from),
                });
            }
        }
    }

    let mut cmd = Command::new("gh");
    cmd.args(["auth", "token"]);
    if let Some(h) = host {
        cmd.args(["--hostname", h]);
    }

    let output = cmd.output().await.map_err(|e| {
        Error::Auth(format!(
            "no token in GH_TOKEN/GITHUB_TOKEN and failed to run gh: {e}"
        ))
    })?;

    if !output.status.success() {
        return Err(Error::Auth(format!(
            "no token in GH_TOKEN/GITHUB_TOKEN and `gh auth token` failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(Error::Auth("`gh auth token` returned nothing".to_string()));
    }

    debug!("using token from gh CLI");
    Ok(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
        host: host.map(String::from),
    })
}

/// Verify a token by fetching the authenticated user's login
pub async fn test_github_auth(config: &GitHubAuthConfig) -> Result<String> {
    let api_base = api_base_for(config.host.as_deref());
    let client = Octocrab::builder()
        .personal_token(config.token.clone())
        .base_uri(&api_base)
        .map_err(|e| Error::Auth(e.to_string()))?
        .build()
        .map_err(|e| Error::Auth(e.to_string()))?;

    let user = client
        .current()
        .user()
        .await
        .map_err(|e| Error::Auth(format!("token rejected: {e}")))?;

    debug!(login = %user.login, "authenticated");
    Ok(user.login)
}
