//! Error types for changeset-release modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from changelog operations.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to read changelog {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not find changelog entry for {name}@{version}")]
    EntryNotFound { name: String, version: String },

    #[error("Changelog read task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// Errors from reading or writing changeset files and pre-release state.
#[derive(Error, Debug)]
pub enum ChangesetError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write changeset: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Invalid changeset {id}: {reason}")]
    InvalidChangeset { id: String, reason: String },

    #[error("Invalid pre-release state in {path}: {source}")]
    InvalidPreState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from package discovery.
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid package.json at {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("Invalid workspace pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("No package.json found in {0} or any parent directory")]
    RootNotFound(PathBuf),
}

/// Errors from running external commands.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("Empty command: nothing to run")]
    EmptyCommand,

    #[error("Failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with code {code}: {stderr}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Remote '{0}' not found or has no URL")]
    RemoteNotFound(String),

    #[error("Repository has no current branch (detached HEAD?)")]
    NoCurrentBranch,

    #[error("git {operation} failed: {reason}")]
    CommandFailed { operation: String, reason: String },
}

/// Errors from GitHub API operations.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error(
        "GitHub authentication failed: no valid auth found. Set GITHUB_TOKEN or GH_TOKEN, or run 'gh auth login'"
    )]
    AuthenticationFailed,

    #[error("GitHub API request failed: {0}")]
    Api(#[source] Box<octocrab::Error>),

    #[error("Rate limited by GitHub API")]
    RateLimited,

    #[error("Repository not found: {owner}/{repo}")]
    RepositoryNotFound { owner: String, repo: String },

    #[error("Failed to parse repository URL")]
    InvalidRepositoryUrl,

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<GitHubError>),
}

/// Errors from interpreting publish tool output.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error(
        "Package \"{0}\" not found. This is probably a bug in changeset-release, please open an issue"
    )]
    PackageNotFound(String),

    #[error("No package found. This is probably a bug in changeset-release, please open an issue")]
    NoPackages,
}

/// Errors from the release workflow.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Have you forgotten to install `@changesets/cli` in \"{0}\"?")]
    ChangesetsCliNotFound(PathBuf),

    #[error("Invalid @changesets/cli manifest at {path}: {reason}")]
    InvalidChangesetsCli { path: PathBuf, reason: String },

    #[error("No publish script configured")]
    MissingPublishScript,

    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    #[error(transparent)]
    Changeset(#[from] ChangesetError),

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}
