//! Merge policy: which checks, statuses and reviews gate a merge
//!
//! Policies are TOML documents with camelCase keys, for example:
//!
//! ```toml
//! requiredChecks = ["circleci"]
//! requiredStatuses = ["ci/jenkins"]
//! requireApprovalFromRequestedReviewers = true
//! mergeMethod = "squash"
//! ```
//!
//! Every key is optional; unknown keys are rejected. A repository without a policy file gets
//! [`Policy::default`], which only requires the label and mergeability.

use crate::error::{Error, Result};
use crate::types::MergeMethod;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Location of the policy file inside a repository
pub const POLICY_FILE_PATH: &str = ".github/merge-when-green.toml";

/// YAML policy location used by earlier deployments; its presence is an error
pub const LEGACY_POLICY_FILE_PATH: &str = ".github/merge-when-green.yml";

/// Resolved merge policy for one repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Policy {
    /// Logins of the apps whose check runs must all succeed
    pub required_checks: Vec<String>,
    /// Commit status contexts that must report success
    pub required_statuses: Vec<String>,
    /// Block while any requested reviewer or team has not reviewed yet
    pub require_approval_from_requested_reviewers: bool,
    /// How the pull request is merged
    pub merge_method: MergeMethod,
}

impl Policy {
    /// Parse and validate a policy from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let policy: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        policy.validated()
    }

    /// Reject blank names and drop duplicates, keeping first occurrences
    pub fn validated(mut self) -> Result<Self> {
        self.required_checks = normalize_names("requiredChecks", self.required_checks)?;
        self.required_statuses = normalize_names("requiredStatuses", self.required_statuses)?;
        Ok(self)
    }
}

fn normalize_names(key: &str, names: Vec<String>) -> Result<Vec<String>> {
    let mut result: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::Config(format!("{key} contains an empty name")));
        }
        if !result.contains(&name) {
            result.push(name);
        }
    }
    Ok(result)
}

/// Load a policy from a local TOML file
pub fn load_policy(path: &Path) -> Result<Policy> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    Policy::from_toml_str(&content).map_err(|e| match e {
        Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
        other => other,
    })
}
