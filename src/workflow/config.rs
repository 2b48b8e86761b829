//! Workflow configuration.

use std::path::PathBuf;

use crate::git::GitUser;

/// Default title of the version pull request.
pub const DEFAULT_PR_TITLE: &str = "Version Packages";

/// Default commit message of the version commit.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Version Packages";

/// Default character budget of the pull request body.
pub const DEFAULT_PR_BODY_MAX_CHARACTERS: usize = 32768;

/// Default prefix of the version branch, followed by the base branch name.
pub const DEFAULT_RELEASE_BRANCH_PREFIX: &str = "release/";

/// Settings for one release run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Directory inside the repository to operate on.
    pub cwd: PathBuf,
    /// Script that bumps versions. Defaults to the changesets CLI.
    pub version_script: Option<String>,
    /// Script that publishes packages. Without one, nothing is published.
    pub publish_script: Option<String>,
    /// Run `changeset status` before versioning.
    pub run_status: bool,
    /// Ref passed to `changeset status --since`.
    pub status_since: Option<String>,
    /// Branch releases target. Defaults to the checked-out branch.
    pub base_branch: Option<String>,
    pub release_branch_prefix: String,
    /// Commit the version branch is reset to before versioning.
    pub reset_to: Option<String>,
    pub pr_title: String,
    pub commit_message: String,
    pub pr_body_max_characters: usize,
    /// Create a GitHub release for every published package.
    pub create_github_releases: bool,
    /// Identity for the version commit. Defaults to the repository config.
    pub git_user: Option<GitUser>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            cwd: PathBuf::from("."),
            version_script: None,
            publish_script: None,
            run_status: false,
            status_since: None,
            base_branch: None,
            release_branch_prefix: DEFAULT_RELEASE_BRANCH_PREFIX.to_string(),
            reset_to: None,
            pr_title: DEFAULT_PR_TITLE.to_string(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            pr_body_max_characters: DEFAULT_PR_BODY_MAX_CHARACTERS,
            create_github_releases: false,
            git_user: None,
        }
    }
}

impl WorkflowConfig {
    /// Name of the version branch for `base_branch`.
    pub fn version_branch(&self, base_branch: &str) -> String {
        format!("{}{}", self.release_branch_prefix, base_branch)
    }

    pub fn has_publish_script(&self) -> bool {
        self.publish_script
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkflowConfig::default();

        assert_eq!(config.pr_title, "Version Packages");
        assert_eq!(config.commit_message, "Version Packages");
        assert_eq!(config.pr_body_max_characters, 32768);
        assert!(!config.create_github_releases);
        assert!(!config.has_publish_script());
    }

    #[test]
    fn test_version_branch() {
        let config = WorkflowConfig::default();
        assert_eq!(config.version_branch("main"), "release/main");

        let config = WorkflowConfig {
            release_branch_prefix: "changeset-release/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.version_branch("next"), "changeset-release/next");
    }

    #[test]
    fn test_blank_publish_script_counts_as_none() {
        let config = WorkflowConfig {
            publish_script: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(!config.has_publish_script());
    }
}
