//! Read the pending changesets of a repository.

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::ChangesetError;

use super::pre::{PreState, read_pre_state};
use super::{CHANGESET_DIR, Changeset};

/// Pending changesets, plus the pre-release state when pre mode is active.
#[derive(Debug, Clone, Default)]
pub struct ChangesetState {
    pub pre_state: Option<PreState>,
    pub changesets: Vec<Changeset>,
}

impl ChangesetState {
    pub fn has_changesets(&self) -> bool {
        !self.changesets.is_empty()
    }

    /// Whether at least one changeset releases a package.
    pub fn has_non_empty_changesets(&self) -> bool {
        self.changesets.iter().any(|c| !c.is_empty())
    }
}

/// Read every changeset file in `.changeset/`, ordered by id.
///
/// `README.md` is not a changeset. A missing directory yields no changesets.
pub fn read_changesets(root: &Path) -> Result<Vec<Changeset>, ChangesetError> {
    let dir = root.join(CHANGESET_DIR);

    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No {} directory in {}", CHANGESET_DIR, root.display());
            return Ok(Vec::new());
        }
        Err(source) => return Err(ChangesetError::ReadFailed { path: dir, source }),
    };

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| ChangesetError::ReadFailed {
                path: dir.clone(),
                source,
            })?
            .path();
        let is_changeset = path.extension().is_some_and(|ext| ext == "md")
            && path.file_name().is_some_and(|name| name != "README.md");
        if is_changeset && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .iter()
        .map(|path| {
            let id = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let content =
                std::fs::read_to_string(path).map_err(|source| ChangesetError::ReadFailed {
                    path: path.clone(),
                    source,
                })?;
            Changeset::parse(&id, &content)
        })
        .collect()
}

/// Read pending changesets, filtered by pre-release state.
///
/// In active pre mode, changesets already consumed by a prerelease are
/// dropped and the pre state is returned. Otherwise all changesets are
/// returned and the pre state is `None`.
pub fn read_changeset_state(root: &Path) -> Result<ChangesetState, ChangesetError> {
    let pre_state = read_pre_state(root)?;
    let changesets = read_changesets(root)?;

    match pre_state {
        Some(pre_state) if pre_state.is_active() => {
            let consumed = pre_state.consumed();
            let changesets: Vec<Changeset> = changesets
                .into_iter()
                .filter(|c| !consumed.contains(c.id.as_str()))
                .collect();
            debug!(
                "Pre mode ({}): {} changesets pending after filtering",
                pre_state.tag,
                changesets.len()
            );

            Ok(ChangesetState {
                pre_state: Some(pre_state),
                changesets,
            })
        }
        _ => Ok(ChangesetState {
            pre_state: None,
            changesets,
        }),
    }
}
