//! `changeset status` check.

use tracing::info;

use crate::error::WorkflowError;
use crate::exec::CommandRunner;

use super::changesets_cli::{ChangesetsCli, NODE};
use super::config::WorkflowConfig;

/// Run `changeset status`, failing the run when it exits non-zero.
pub async fn run_status(
    config: &WorkflowConfig,
    runner: &dyn CommandRunner,
) -> Result<(), WorkflowError> {
    let cli = ChangesetsCli::resolve(&config.cwd)?;
    let extra: Vec<String> = config
        .status_since
        .iter()
        .map(|since| format!("--since={}", since))
        .collect();

    info!("Checking changeset status");
    runner
        .run(NODE, &cli.node_args("status", &extra), &config.cwd)
        .await?;
    Ok(())
}
