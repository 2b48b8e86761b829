//! Version control collaborator.
//!
//! Branch, commit and push operations shell out to the system `git` binary
//! so the CI runner's credentials and config apply. Read-only queries go
//! through git2.

pub mod cli;
pub mod repo;

use async_trait::async_trait;

use crate::error::GitError;

pub use cli::GitCli;
pub use repo::{current_branch, origin_url};

/// Identity used for release commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitUser {
    pub name: String,
    pub email: String,
}

/// Git operations needed by the release workflow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitOps: Send + Sync {
    /// Set `user.name` and `user.email` for the repository.
    async fn configure_user(&self, user: &GitUser) -> Result<(), GitError>;

    /// Check out `branch`, creating it from HEAD when it does not exist.
    async fn switch_to_maybe_existing_branch(&self, branch: &str) -> Result<(), GitError>;

    /// `git reset --hard <target>`.
    async fn reset_hard(&self, target: &str) -> Result<(), GitError>;

    /// Whether the working tree has no changes, untracked files included.
    async fn is_clean(&self) -> Result<bool, GitError>;

    /// Stage everything and commit with `message`.
    async fn commit_all(&self, message: &str) -> Result<(), GitError>;

    /// Push `branch` to origin.
    async fn push(&self, branch: &str, force: bool) -> Result<(), GitError>;

    /// Push HEAD to `branch` on origin along with annotated tags.
    async fn push_tags(&self, branch: &str) -> Result<(), GitError>;
}
