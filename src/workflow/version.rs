//! Version phase: bump packages and open or update the version pull request.

use tracing::info;

use crate::changeset::read_changeset_state;
use crate::error::WorkflowError;
use crate::exec::run_script;
use crate::github::ReleaseHost;
use crate::packages::{VersionSnapshot, changed_packages};
use crate::release::{changed_packages_info, sort_release_notes, version_pr_body};

use super::Collaborators;
use super::changesets_cli::{ChangesetsCli, NODE};
use super::config::WorkflowConfig;

/// Apply pending changesets on the version branch and open or update its
/// pull request into `base_branch`. Returns the pull request number.
pub async fn run_version(
    config: &WorkflowConfig,
    base_branch: &str,
    collaborators: &Collaborators<'_>,
    host: &dyn ReleaseHost,
) -> Result<u64, WorkflowError> {
    let Collaborators {
        git,
        runner,
        discovery,
    } = *collaborators;
    let version_branch = config.version_branch(base_branch);

    let root_dir = discovery.discover(&config.cwd)?.root_dir;
    let pre_state = read_changeset_state(&root_dir)?.pre_state;

    git.switch_to_maybe_existing_branch(&version_branch).await?;
    if let Some(target) = &config.reset_to {
        git.reset_hard(target).await?;
    }

    // Versions as checked out on the version branch
    let before = discovery.discover(&config.cwd)?;
    let snapshot = VersionSnapshot::capture(&before.packages);

    match &config.version_script {
        Some(script) => {
            run_script(runner, script, &config.cwd).await?;
        }
        None => {
            let cli = ChangesetsCli::resolve(&config.cwd)?;
            runner
                .run(NODE, &cli.node_args(cli.version_command(), &[]), &config.cwd)
                .await?;
        }
    }

    let after = discovery.discover(&config.cwd)?;
    let changed = changed_packages(&after.packages, &snapshot);
    info!("{} packages changed versions", changed.len());
    let mut infos = changed_packages_info(&changed).await?;

    let suffix = pre_state
        .as_ref()
        .map(|pre| format!(" ({})", pre.tag))
        .unwrap_or_default();
    let title = format!("{}{}", config.pr_title, suffix);

    // The version script may have committed already
    if !git.is_clean().await? {
        git.commit_all(&format!("{}{}", config.commit_message, suffix))
            .await?;
    }
    git.push(&version_branch, true).await?;

    sort_release_notes(&mut infos);
    let body = version_pr_body(
        base_branch,
        config.has_publish_script(),
        pre_state.is_some(),
        &infos,
        config.pr_body_max_characters,
    );

    match host
        .find_open_pull_request(&version_branch, base_branch)
        .await?
    {
        Some(number) => {
            info!("Updating found pull request #{}", number);
            host.update_pull_request(number, &title, &body).await?;
            Ok(number)
        }
        None => {
            let number = host
                .create_pull_request(&version_branch, base_branch, &title, &body)
                .await?;
            info!("Created pull request #{}", number);
            Ok(number)
        }
    }
}
