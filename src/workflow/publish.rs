//! Publish phase: run the publish script and report what it released.

use tracing::{debug, info};

use crate::changelog::{extract, read_changelog};
use crate::error::{ChangelogError, WorkflowError};
use crate::exec::run_script;
use crate::github::{NewRelease, ReleaseHost};
use crate::packages::{Package, Tool};
use crate::publish::{PublishResult, scan_published_packages};

use super::Collaborators;
use super::config::WorkflowConfig;

/// Run the publish script, push the tags it created to `base_branch`, and
/// collect the released packages.
///
/// With a `host`, a GitHub release is created for every released package.
pub async fn run_publish(
    config: &WorkflowConfig,
    base_branch: &str,
    collaborators: &Collaborators<'_>,
    host: Option<&dyn ReleaseHost>,
) -> Result<PublishResult, WorkflowError> {
    let script = config
        .publish_script
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(WorkflowError::MissingPublishScript)?;

    let output = run_script(collaborators.runner, script, &config.cwd).await?;
    collaborators.git.push_tags(base_branch).await?;

    let packages = collaborators.discovery.discover(&config.cwd)?;
    let released = scan_published_packages(&output.stdout, &packages)?;
    info!("Published {} packages", released.len());

    if let Some(host) = host {
        for package in &released {
            let tag = release_tag(package, packages.tool);
            create_github_release(host, package, &tag).await?;
        }
    }

    Ok(PublishResult::from_released(&released))
}

/// Tag created by the publish tool for `package`.
fn release_tag(package: &Package, tool: Tool) -> String {
    match tool {
        Tool::Root => format!("v{}", package.version),
        Tool::Npm | Tool::Pnpm => format!("{}@{}", package.name, package.version),
    }
}

/// Create a GitHub release whose notes are the package's changelog entry.
///
/// Packages without a changelog get no release. A changelog without an
/// entry for the released version is an error.
async fn create_github_release(
    host: &dyn ReleaseHost,
    package: &Package,
    tag: &str,
) -> Result<(), WorkflowError> {
    let Some(changelog) = read_changelog(&package.dir).await? else {
        debug!("{} has no changelog, skipping GitHub release", package.name);
        return Ok(());
    };

    let section = extract(&changelog, &package.version);
    if !section.matched {
        return Err(ChangelogError::EntryNotFound {
            name: package.name.clone(),
            version: package.version.clone(),
        }
        .into());
    }

    let release = NewRelease {
        tag_name: tag.to_string(),
        name: tag.to_string(),
        body: section.content,
        prerelease: package.version.contains('-'),
    };
    host.create_release(&release).await?;
    Ok(())
}
