//! Release workflow: read pending changesets, decide the phase, and run it.
//!
//! A run does one of:
//! - nothing, when there is nothing to release
//! - versioning, when changesets are pending
//! - publishing, when no changesets are pending and a publish script is set

pub mod changesets_cli;
pub mod config;
pub mod phase;
pub mod publish;
pub mod status;
pub mod version;

use serde::Serialize;
use tracing::info;

use crate::changeset::read_changeset_state;
use crate::error::WorkflowError;
use crate::exec::CommandRunner;
use crate::git::{GitOps, current_branch};
use crate::github::ReleaseHost;
use crate::packages::PackageDiscovery;
use crate::publish::PublishResult;

pub use changesets_cli::ChangesetsCli;
pub use config::WorkflowConfig;
pub use phase::{Phase, decide_phase};
pub use publish::run_publish;
pub use status::run_status;
pub use version::run_version;

/// External collaborators a run drives.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub git: &'a dyn GitOps,
    pub runner: &'a dyn CommandRunner,
    pub discovery: &'a dyn PackageDiscovery,
}

/// Result of a run, printed as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub phase: Phase,
    pub has_changesets: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request_number: Option<u64>,
    #[serde(flatten)]
    pub publish: Option<PublishResult>,
}

/// Run the release workflow for `config`.
///
/// `connect` builds the release host. It is only called when the run needs
/// one: always for versioning, and for publishing when GitHub releases are
/// enabled.
pub async fn run<F>(
    config: &WorkflowConfig,
    collaborators: &Collaborators<'_>,
    connect: F,
) -> Result<RunOutcome, WorkflowError>
where
    F: FnOnce() -> Result<Box<dyn ReleaseHost>, WorkflowError>,
{
    let packages = collaborators.discovery.discover(&config.cwd)?;
    let state = read_changeset_state(&packages.root_dir)?;
    let has_changesets = state.has_changesets();
    info!(
        "{} pending changesets in {}",
        state.changesets.len(),
        packages.root_dir.display()
    );

    if config.run_status && has_changesets {
        run_status(config, collaborators.runner).await?;
    }

    let phase = decide_phase(&state, config.has_publish_script());
    let mut outcome = RunOutcome {
        phase,
        has_changesets,
        pull_request_number: None,
        publish: None,
    };
    if phase == Phase::Idle {
        return Ok(outcome);
    }

    let base_branch = match &config.base_branch {
        Some(branch) => branch.clone(),
        None => current_branch(&config.cwd)?,
    };
    if let Some(user) = &config.git_user {
        collaborators.git.configure_user(user).await?;
    }

    match phase {
        Phase::Version => {
            let host = connect()?;
            let number = run_version(config, &base_branch, collaborators, &*host).await?;
            outcome.pull_request_number = Some(number);
        }
        Phase::Publish => {
            let host = if config.create_github_releases {
                Some(connect()?)
            } else {
                None
            };
            let result = run_publish(config, &base_branch, collaborators, host.as_deref()).await?;
            outcome.publish = Some(result);
        }
        Phase::Idle => {}
    }

    Ok(outcome)
}
