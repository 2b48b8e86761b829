//! Which phase a run performs.

use serde::Serialize;
use tracing::info;

use crate::changeset::ChangesetState;

/// The work a release run does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing to version or publish.
    Idle,
    /// Bump versions and open or update the version pull request.
    Version,
    /// Publish unpublished packages.
    Publish,
}

/// Decide the phase from the pending changesets.
///
/// Pending changesets mean versioning, unless none of them releases
/// anything. Without changesets the run publishes when a publish script is
/// configured.
pub fn decide_phase(state: &ChangesetState, has_publish_script: bool) -> Phase {
    match (state.has_changesets(), has_publish_script) {
        (false, false) => {
            info!("No changesets found");
            Phase::Idle
        }
        (false, true) => {
            info!("No changesets found, attempting to publish any unpublished packages");
            Phase::Publish
        }
        (true, _) if !state.has_non_empty_changesets() => {
            info!("All changesets are empty; not creating PR");
            Phase::Idle
        }
        (true, _) => Phase::Version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changeset::{BumpType, Changeset, Release};

    fn state(changesets: Vec<Vec<Release>>) -> ChangesetState {
        ChangesetState {
            pre_state: None,
            changesets: changesets
                .into_iter()
                .enumerate()
                .map(|(i, releases)| Changeset {
                    id: format!("change-{}", i),
                    summary: String::new(),
                    releases,
                })
                .collect(),
        }
    }

    #[test]
    fn test_no_changesets_no_publish_script() {
        assert_eq!(decide_phase(&state(vec![]), false), Phase::Idle);
    }

    #[test]
    fn test_no_changesets_with_publish_script() {
        assert_eq!(decide_phase(&state(vec![]), true), Phase::Publish);
    }

    #[test]
    fn test_only_empty_changesets() {
        let state = state(vec![vec![], vec![]]);
        assert_eq!(decide_phase(&state, false), Phase::Idle);
        assert_eq!(decide_phase(&state, true), Phase::Idle);
    }

    #[test]
    fn test_changesets_mean_version() {
        let state = state(vec![vec![], vec![Release::new("a", BumpType::Patch)]]);
        assert_eq!(decide_phase(&state, true), Phase::Version);
    }
}
