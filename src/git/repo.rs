//! Read-only repository queries using git2.

use std::path::Path;

use git2::Repository;

use crate::error::GitError;

/// Name of the branch checked out in the repository containing `cwd`.
pub fn current_branch(cwd: &Path) -> Result<String, GitError> {
    let repo = Repository::discover(cwd).map_err(GitError::OpenRepository)?;
    let head = repo.head().map_err(|_| GitError::NoCurrentBranch)?;

    if !head.is_branch() {
        return Err(GitError::NoCurrentBranch);
    }

    head.shorthand()
        .map(String::from)
        .ok_or(GitError::NoCurrentBranch)
}

/// URL of the `origin` remote of the repository containing `cwd`.
pub fn origin_url(cwd: &Path) -> Result<String, GitError> {
    let repo = Repository::discover(cwd).map_err(GitError::OpenRepository)?;
    let remote = repo
        .find_remote("origin")
        .map_err(|_| GitError::RemoteNotFound("origin".to_string()))?;

    remote
        .url()
        .map(String::from)
        .ok_or_else(|| GitError::RemoteNotFound("origin".to_string()))
}
