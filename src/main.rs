//! changeset-release - CLI entry point.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use changeset_release::error::WorkflowError;
use changeset_release::exec::TokioCommandRunner;
use changeset_release::git::{GitCli, GitUser, origin_url};
use changeset_release::github::{GitHubHost, ReleaseHost, get_github_token, parse_github_remote};
use changeset_release::packages::NodeWorkspaceDiscovery;
use changeset_release::workflow::config::{
    DEFAULT_COMMIT_MESSAGE, DEFAULT_PR_BODY_MAX_CHARACTERS, DEFAULT_PR_TITLE,
    DEFAULT_RELEASE_BRANCH_PREFIX,
};
use changeset_release::workflow::{self, Collaborators, WorkflowConfig};

/// Open version pull requests and publish packages from pending changesets.
#[derive(Parser, Debug)]
#[command(name = "changeset-release")]
#[command(about = "Open version pull requests and publish packages from pending changesets")]
#[command(version)]
struct Cli {
    /// Directory inside the repository to operate on
    #[arg(long, env = "CHANGESET_RELEASE_CWD", default_value = ".")]
    cwd: PathBuf,

    /// Script that bumps versions (defaults to `changeset version`)
    #[arg(long = "version-script", env = "CHANGESET_RELEASE_VERSION")]
    version_script: Option<String>,

    /// Script that publishes packages; without it nothing is published
    #[arg(long = "publish-script", env = "CHANGESET_RELEASE_PUBLISH")]
    publish_script: Option<String>,

    /// Run `changeset status` before versioning or publishing
    #[arg(long, env = "CHANGESET_RELEASE_STATUS")]
    status: bool,

    /// Ref passed to `changeset status --since`
    #[arg(long, env = "CHANGESET_RELEASE_SINCE", requires = "status")]
    since: Option<String>,

    /// Branch releases target (defaults to the checked-out branch)
    #[arg(long, env = "CHANGESET_RELEASE_BASE_BRANCH")]
    base_branch: Option<String>,

    /// Prefix of the version branch
    #[arg(long, env = "CHANGESET_RELEASE_BRANCH_PREFIX", default_value = DEFAULT_RELEASE_BRANCH_PREFIX)]
    branch_prefix: String,

    /// Commit to hard-reset the version branch to before versioning
    #[arg(long, env = "CHANGESET_RELEASE_RESET_TO")]
    reset_to: Option<String>,

    /// Title of the version pull request
    #[arg(long, env = "CHANGESET_RELEASE_TITLE", default_value = DEFAULT_PR_TITLE)]
    title: String,

    /// Message of the version commit
    #[arg(long, env = "CHANGESET_RELEASE_COMMIT", default_value = DEFAULT_COMMIT_MESSAGE)]
    commit: String,

    /// Character budget of the pull request body
    #[arg(long, env = "CHANGESET_RELEASE_MAX_BODY_CHARS", default_value_t = DEFAULT_PR_BODY_MAX_CHARACTERS)]
    max_body_chars: usize,

    /// Create a GitHub release for every published package
    #[arg(long, env = "CHANGESET_RELEASE_GITHUB_RELEASES")]
    github_releases: bool,

    /// Name used for the version commit
    #[arg(long, env = "CHANGESET_RELEASE_GIT_USER_NAME", requires = "git_user_email")]
    git_user_name: Option<String>,

    /// Email used for the version commit
    #[arg(long, env = "CHANGESET_RELEASE_GIT_USER_EMAIL", requires = "git_user_name")]
    git_user_email: Option<String>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> WorkflowConfig {
        let git_user = match (self.git_user_name, self.git_user_email) {
            (Some(name), Some(email)) => Some(GitUser { name, email }),
            _ => None,
        };

        WorkflowConfig {
            cwd: self.cwd,
            version_script: self.version_script,
            publish_script: self.publish_script,
            run_status: self.status,
            status_since: self.since,
            base_branch: self.base_branch,
            release_branch_prefix: self.branch_prefix,
            reset_to: self.reset_to,
            pr_title: self.title,
            commit_message: self.commit,
            pr_body_max_characters: self.max_body_chars,
            create_github_releases: self.github_releases,
            git_user,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = cli.into_config();
    let git = GitCli::new(&config.cwd);
    let runner = TokioCommandRunner;
    let discovery = NodeWorkspaceDiscovery;
    let collaborators = Collaborators {
        git: &git,
        runner: &runner,
        discovery: &discovery,
    };

    let cwd = config.cwd.clone();
    let outcome = workflow::run(&config, &collaborators, move || connect(&cwd))
        .await
        .context("Release run failed")?;

    let json = serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?;
    println!("{}", json);

    Ok(())
}

/// Connect to the GitHub repository behind the `origin` remote.
fn connect(cwd: &std::path::Path) -> Result<Box<dyn ReleaseHost>, WorkflowError> {
    let token = get_github_token()?;
    let url = origin_url(cwd)?;
    let (owner, repo) = parse_github_remote(&url)?;
    let host = GitHubHost::new(&token, &owner, &repo)?;
    Ok(Box::new(host))
}

/// Log to stderr; stdout carries the run outcome.
fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("changeset_release={}", default_level)))
        .context("Failed to create tracing filter")?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();

    Ok(())
}
