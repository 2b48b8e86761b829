//! [`GitOps`] backed by the `git` command line.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::GitError;

use super::{GitOps, GitUser};

const REMOTE: &str = "origin";

/// Runs git commands inside a working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    cwd: PathBuf,
}

impl GitCli {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Run a git command and return its stdout.
    async fn run_git(&self, args: &[&str], operation: &str) -> Result<String, GitError> {
        debug!("git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.cwd)
            .output()
            .await
            .map_err(|e| GitError::CommandFailed {
                operation: operation.to_string(),
                reason: format!("failed to run git: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed {
                operation: operation.to_string(),
                reason: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl GitOps for GitCli {
    async fn configure_user(&self, user: &GitUser) -> Result<(), GitError> {
        self.run_git(&["config", "user.name", &user.name], "set user name")
            .await?;
        self.run_git(&["config", "user.email", &user.email], "set user email")
            .await?;
        Ok(())
    }

    async fn switch_to_maybe_existing_branch(&self, branch: &str) -> Result<(), GitError> {
        if self.run_git(&["checkout", branch], "checkout").await.is_ok() {
            return Ok(());
        }

        info!("Switching to a new branch {}", branch);
        self.run_git(&["checkout", "-b", branch], "create branch")
            .await?;
        Ok(())
    }

    async fn reset_hard(&self, target: &str) -> Result<(), GitError> {
        self.run_git(&["reset", "--hard", target], "reset").await?;
        Ok(())
    }

    async fn is_clean(&self) -> Result<bool, GitError> {
        let status = self.run_git(&["status", "--porcelain"], "status").await?;
        Ok(status.trim().is_empty())
    }

    async fn commit_all(&self, message: &str) -> Result<(), GitError> {
        self.run_git(&["add", "-A"], "stage files").await?;
        self.run_git(&["commit", "-m", message], "commit").await?;
        Ok(())
    }

    async fn push(&self, branch: &str, force: bool) -> Result<(), GitError> {
        let mut args = vec!["push", REMOTE, branch];
        if force {
            args.push("--force");
        }
        self.run_git(&args, "push").await?;
        Ok(())
    }

    async fn push_tags(&self, branch: &str) -> Result<(), GitError> {
        let refspec = format!("HEAD:{}", branch);
        self.run_git(&["push", REMOTE, &refspec, "--follow-tags"], "push tags")
            .await?;
        Ok(())
    }
}
