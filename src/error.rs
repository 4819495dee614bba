//! Error types for merge-when-green

use thiserror::Error;

/// Errors surfaced by the library
///
/// Gate failures are never errors; they are reported as
/// [`PipelineOutcome::Skipped`](crate::merge::PipelineOutcome::Skipped).
/// Everything here is a fault of a collaborator or of the local setup.
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub API returned an error or an unexpected response
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform failure (used by alternate `PlatformService` implementations)
    #[error("platform error: {0}")]
    Platform(String),

    /// Policy file could not be read, parsed or validated
    #[error("invalid policy: {0}")]
    Config(String),

    /// No usable credentials
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Repository argument or remote URL could not be understood
    #[error("invalid repository: {0}")]
    InvalidRepo(String),

    /// Webhook payload could not be interpreted
    #[error("invalid event payload: {0}")]
    Event(String),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
